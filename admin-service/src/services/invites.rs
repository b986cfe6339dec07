//! Invitation workflow - issue, look up and accept signup tokens.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{Invitation, UserRecord, DEFAULT_GROUP};
use crate::services::{HashProvider, InviteMailer};
use crate::store::{CredentialStore, InviteStore};

/// A freshly issued invitation: the token plus the acceptance link built
/// from the public base URL.
#[derive(Debug, Clone)]
pub struct IssuedInvite {
    pub token: String,
    pub link: String,
}

enum TokenState {
    Missing,
    Expired,
    Valid(Invitation),
}

#[derive(Clone)]
pub struct InviteService {
    invites: Arc<InviteStore>,
    credentials: Arc<CredentialStore>,
    hasher: Arc<dyn HashProvider>,
    mailer: Arc<dyn InviteMailer>,
    public_url: String,
    default_ttl_minutes: i64,
    // acceptance must be exactly-once: the whole check-create-consume
    // sequence runs under this lock so a token can never be redeemed twice
    accept_serial: Arc<Mutex<()>>,
}

impl InviteService {
    pub fn new(
        invites: Arc<InviteStore>,
        credentials: Arc<CredentialStore>,
        hasher: Arc<dyn HashProvider>,
        mailer: Arc<dyn InviteMailer>,
        public_url: String,
        default_ttl_minutes: i64,
    ) -> Self {
        Self {
            invites,
            credentials,
            hasher,
            mailer,
            public_url,
            default_ttl_minutes,
            accept_serial: Arc::new(Mutex::new(())),
        }
    }

    /// Issue a new invitation and kick off best-effort mail delivery.
    ///
    /// The token and link are returned even when delivery fails so an admin
    /// can hand the link over out of band.
    pub async fn invite(
        &self,
        email: &str,
        groups: Option<Vec<String>>,
        displayname: Option<String>,
        expires_minutes: Option<i64>,
    ) -> Result<IssuedInvite, AppError> {
        if email.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("email is required")));
        }
        if matches!(&groups, Some(g) if g.is_empty()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "groups must not be empty"
            )));
        }
        let ttl = expires_minutes.unwrap_or(self.default_ttl_minutes);
        if ttl <= 0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "expiresMinutes must be positive"
            )));
        }

        let token = Uuid::new_v4().simple().to_string();
        let invitation = Invitation::new(
            email.to_string(),
            groups.unwrap_or_else(|| vec![DEFAULT_GROUP.to_string()]),
            displayname,
            ttl,
        );

        self.invites
            .mutate(|invites| {
                invites.retain(|_, pending| !pending.is_expired());
                invites.insert(token.clone(), invitation);
                Ok(())
            })
            .await?;

        let link = format!(
            "{}/invite/accept?token={}",
            self.public_url.trim_end_matches('/'),
            token
        );

        let mailer = self.mailer.clone();
        let recipient = email.to_string();
        let mail_link = link.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_invitation(&recipient, &mail_link).await {
                tracing::warn!(to = %recipient, error = %e, "invitation email delivery failed");
            }
        });

        tracing::info!(email = %email, expires_minutes = ttl, "invitation issued");
        Ok(IssuedInvite { token, link })
    }

    /// Resolve a token to its pending invitation.
    ///
    /// Expired entries are removed on access; a removed or unknown token is
    /// indistinguishable from one that never existed.
    pub async fn lookup(&self, token: &str) -> Result<Invitation, AppError> {
        let state = self
            .invites
            .mutate(|invites| {
                let Some(invitation) = invites.get(token).cloned() else {
                    return Ok(TokenState::Missing);
                };
                if invitation.is_expired() {
                    invites.remove(token);
                    return Ok(TokenState::Expired);
                }
                Ok(TokenState::Valid(invitation))
            })
            .await?;

        match state {
            TokenState::Missing => Err(AppError::InvalidToken),
            TokenState::Expired => Err(AppError::ExpiredToken),
            TokenState::Valid(invitation) => Ok(invitation),
        }
    }

    /// Redeem a token: create the invited account, then consume the token.
    ///
    /// A username conflict leaves the invitation in place so the invitee can
    /// retry with a different name.
    pub async fn accept(
        &self,
        token: &str,
        username: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if username.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("username is required")));
        }
        if password.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("password is required")));
        }

        let _serial = self.accept_serial.lock().await;

        let invitation = self.lookup(token).await?;
        let hash = self.hasher.hash(password).await?;
        let record = UserRecord::new(
            username,
            hash,
            Some(invitation.email),
            Some(invitation.groups),
            invitation.displayname,
        );

        self.credentials
            .mutate(|users| {
                if users.contains_key(username) {
                    return Err(AppError::Conflict(anyhow::anyhow!(
                        "user {} already exists",
                        username
                    )));
                }
                users.insert(username.to_string(), record);
                Ok(())
            })
            .await?;

        let consumed = self
            .invites
            .mutate(|invites| Ok(invites.remove(token).is_some()))
            .await?;
        if !consumed {
            // the account exists either way; only the bookkeeping slipped
            tracing::warn!(token = %token, "accepted invitation was already gone from the store");
        }

        tracing::info!(user = %username, "invitation accepted, user created");
        Ok(())
    }
}
