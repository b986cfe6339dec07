//! Outbound mail - invitation delivery over SMTP.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

use service_core::error::AppError;

use crate::config::SmtpConfig;

#[async_trait]
pub trait InviteMailer: Send + Sync {
    /// Deliver the acceptance link for a pending invitation.
    async fn send_invitation(&self, to_email: &str, link: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    mailer: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let mut builder = if config.tls {
            SmtpTransport::relay(&config.host).map_err(|e| AppError::Email(e.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(config.host.as_str())
        };
        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config.from.parse().map_err(|e: lettre::address::AddressError| {
            AppError::Config(anyhow::anyhow!("invalid SMTP from address: {}", e))
        })?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            tls = config.tls,
            "SMTP mailer initialized"
        );

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl InviteMailer for SmtpMailer {
    async fn send_invitation(&self, to_email: &str, link: &str) -> Result<(), AppError> {
        let html_body = format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>You have been invited</h2>
    <p>An account has been prepared for you. Use the link below to choose a username and password:</p>
    <p><a href="{link}">Accept invitation</a></p>
    <p style="color: #666; font-size: 12px;">
      The link is valid for a limited time and can be used once. If you were not expecting this, ignore this email.
    </p>
  </body>
</html>
"#
        );

        let plain_body = format!(
            "You have been invited\n\nAn account has been prepared for you. Visit the following link to choose a username and password:\n\n{link}\n\nThe link is valid for a limited time and can be used once. If you were not expecting this, ignore this email.\n"
        );

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| AppError::Email(e.to_string()))?)
            .subject("You have been invited")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AppError::Email(e.to_string()))?;

        // lettre's SmtpTransport is blocking; keep it off the async runtime
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, "invitation email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(to = %to_email, error = %e, "failed to send invitation email");
                Err(AppError::Email(e.to_string()))
            }
        }
    }
}

/// Test double that records deliveries instead of talking SMTP.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockMailer {
    /// Pairs of (recipient, link) captured so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl InviteMailer for MockMailer {
    async fn send_invitation(&self, to_email: &str, link: &str) -> Result<(), AppError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push((to_email.to_string(), link.to_string()));
        Ok(())
    }
}
