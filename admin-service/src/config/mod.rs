use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::observability::LogFormat;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Credential store document, shared with the identity gateway.
    pub users_file: PathBuf,
    /// Pending invitations, owned by this service alone.
    pub invites_file: PathBuf,
    /// Base URL embedded in invitation links.
    pub public_url: String,
    /// Forwarded group that grants access to the admin API.
    pub admin_group: String,
    pub invite_ttl_minutes: i64,
    pub hash_timeout_seconds: u64,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::Config(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AdminConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("admin-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            log_format: get_env("LOG_FORMAT", Some("plain"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::Config(anyhow::anyhow!(e)))?,
            users_file: get_env("USERS_FILE", Some("users.json"), is_prod)?.into(),
            invites_file: get_env("INVITES_FILE", Some("invites.json"), is_prod)?.into(),
            public_url: get_env("PUBLIC_URL", Some("http://localhost:8080"), is_prod)?,
            admin_group: get_env("ADMIN_GROUP", Some("admins"), is_prod)?,
            invite_ttl_minutes: get_env("INVITE_TTL_MINUTES", Some("60"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::Config(anyhow::anyhow!(e.to_string()))
                })?,
            hash_timeout_seconds: get_env("HASH_TIMEOUT_SECONDS", Some("10"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::Config(anyhow::anyhow!(e.to_string()))
                })?,
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("localhost"), is_prod)?,
                port: get_env("SMTP_PORT", Some("25"), is_prod)?
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        AppError::Config(anyhow::anyhow!(e.to_string()))
                    })?,
                tls: get_env("SMTP_TLS", Some("false"), is_prod)?
                    .parse()
                    .unwrap_or(false),
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                from: get_env("SMTP_FROM", Some("admin@localhost"), is_prod)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "APP__PORT must be greater than 0"
            )));
        }

        if self.invite_ttl_minutes <= 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "INVITE_TTL_MINUTES must be positive"
            )));
        }

        if self.hash_timeout_seconds == 0 {
            return Err(AppError::Config(anyhow::anyhow!(
                "HASH_TIMEOUT_SECONDS must be positive"
            )));
        }

        if self.admin_group.trim().is_empty() {
            return Err(AppError::Config(anyhow::anyhow!(
                "ADMIN_GROUP must not be empty"
            )));
        }

        if self.users_file == self.invites_file {
            return Err(AppError::Config(anyhow::anyhow!(
                "USERS_FILE and INVITES_FILE must not point at the same document"
            )));
        }

        if self.environment == Environment::Prod {
            if !self.smtp.tls {
                tracing::warn!(
                    "SMTP_TLS is disabled in production - invitation links travel in the clear"
                );
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
