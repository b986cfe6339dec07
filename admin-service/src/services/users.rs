//! User management - CRUD over the gateway credential store.

use std::collections::BTreeMap;
use std::sync::Arc;

use service_core::error::AppError;

use crate::models::{UserRecord, UserView};
use crate::services::HashProvider;
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct UserService {
    store: Arc<CredentialStore>,
    hasher: Arc<dyn HashProvider>,
}

impl UserService {
    pub fn new(store: Arc<CredentialStore>, hasher: Arc<dyn HashProvider>) -> Self {
        Self { store, hasher }
    }

    /// All records with the password hash stripped.
    pub async fn list(&self) -> Result<BTreeMap<String, UserView>, AppError> {
        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .map(|(username, record)| (username, record.sanitized()))
            .collect())
    }

    pub async fn create(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
        groups: Option<Vec<String>>,
        displayname: Option<String>,
    ) -> Result<(), AppError> {
        if username.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("username is required")));
        }
        if password.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("password is required")));
        }
        if matches!(&groups, Some(g) if g.is_empty()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "groups must not be empty"
            )));
        }

        let hash = self.hasher.hash(password).await?;
        let record = UserRecord::new(username, hash, email, groups, displayname);

        self.store
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

        tracing::info!(user = %username, "user created");
        Ok(())
    }

    /// Merge only the provided fields into an existing record.
    pub async fn update(
        &self,
        username: &str,
        email: Option<String>,
        displayname: Option<String>,
        groups: Option<Vec<String>>,
    ) -> Result<(), AppError> {
        if matches!(&groups, Some(g) if g.is_empty()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "groups must not be empty"
            )));
        }

        self.store
            .mutate(|users| {
                let record = users.get_mut(username).ok_or_else(|| {
                    AppError::NotFound(anyhow::anyhow!("user {} not found", username))
                })?;
                if let Some(email) = email {
                    record.email = email;
                }
                if let Some(displayname) = displayname {
                    record.displayname = displayname;
                }
                if let Some(groups) = groups {
                    record.groups = groups;
                }
                Ok(())
            })
            .await?;

        tracing::info!(user = %username, "user updated");
        Ok(())
    }

    pub async fn change_password(&self, username: &str, new_password: &str) -> Result<(), AppError> {
        if new_password.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("password is required")));
        }
        // cheap existence check before burning an argon2 round
        if !self.store.load().await?.contains_key(username) {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "user {} not found",
                username
            )));
        }

        let hash = self.hasher.hash(new_password).await?;

        self.store
            .mutate(|users| {
                let record = users.get_mut(username).ok_or_else(|| {
                    AppError::NotFound(anyhow::anyhow!("user {} not found", username))
                })?;
                record.password = hash;
                Ok(())
            })
            .await?;

        tracing::info!(user = %username, "password changed");
        Ok(())
    }

    pub async fn delete(&self, username: &str) -> Result<(), AppError> {
        self.store
            .mutate(|users| {
                users.remove(username).map(|_| ()).ok_or_else(|| {
                    AppError::NotFound(anyhow::anyhow!("user {} not found", username))
                })
            })
            .await?;

        tracing::info!(user = %username, "user deleted");
        Ok(())
    }
}
