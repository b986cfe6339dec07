//! Invite store adapter - pending invitations owned by this service alone.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use service_core::error::AppError;

use crate::models::Invitation;

/// Adapter over the invite file, a bare token→invitation mapping.
///
/// Unlike the credential store this file is not safety-critical: losing
/// pending invitations only means re-inviting, so malformed content heals
/// to an empty mapping instead of failing requests.
pub struct InviteStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl InviteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all pending invitations; absent file means none.
    pub async fn load(&self) -> Result<BTreeMap<String, Invitation>, AppError> {
        let _guard = self.write_lock.lock().await;
        self.load_unlocked().await
    }

    /// Serialize the full mapping and atomically replace the store file.
    pub async fn save(&self, invites: &BTreeMap<String, Invitation>) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save_unlocked(invites).await
    }

    /// Run one serialized load→modify→save cycle.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut BTreeMap<String, Invitation>) -> Result<T, AppError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut invites = self.load_unlocked().await?;
        let out = f(&mut invites)?;
        self.save_unlocked(&invites).await?;
        Ok(out)
    }

    async fn load_unlocked(&self) -> Result<BTreeMap<String, Invitation>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(invites) => Ok(invites),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "invite store malformed, resetting to empty"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Storage(anyhow::anyhow!(
                "cannot read invite store {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save_unlocked(&self, invites: &BTreeMap<String, Invitation>) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(invites).map_err(|e| {
            AppError::Storage(anyhow::anyhow!("cannot serialize invite store: {}", e))
        })?;
        super::persist_atomic(&self.path, &bytes).await.map_err(|e| {
            AppError::Storage(anyhow::anyhow!(
                "cannot write invite store {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
