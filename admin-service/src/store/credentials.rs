//! Credential store adapter - the user database file the gateway reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use service_core::error::AppError;

use crate::models::UserRecord;

/// On-disk shape: a single document with a `users` mapping, exactly what
/// the identity gateway parses on its side.
#[derive(Debug, Default, Deserialize)]
struct CredentialDocument {
    #[serde(default)]
    users: BTreeMap<String, UserRecord>,
}

#[derive(Serialize)]
struct CredentialDocumentRef<'a> {
    users: &'a BTreeMap<String, UserRecord>,
}

/// Adapter over the shared user database file.
///
/// The mutex serializes load→modify→save cycles: two concurrent admin
/// requests must not clobber each other's writes to the live user database.
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full username→record mapping.
    ///
    /// A missing file is bootstrapped with an empty skeleton so the gateway
    /// always finds a parseable document. Corrupt or unreadable content is an
    /// error: silently resetting the live credential database would lock
    /// every user out.
    pub async fn load(&self) -> Result<BTreeMap<String, UserRecord>, AppError> {
        let _guard = self.write_lock.lock().await;
        self.load_unlocked().await
    }

    /// Serialize the full mapping and atomically replace the store file.
    pub async fn save(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save_unlocked(users).await
    }

    /// Run one serialized load→modify→save cycle.
    ///
    /// The file is rewritten only when the closure succeeds; a domain error
    /// (conflict, not-found) leaves the document untouched.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut BTreeMap<String, UserRecord>) -> Result<T, AppError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_unlocked().await?;
        let out = f(&mut users)?;
        self.save_unlocked(&users).await?;
        Ok(out)
    }

    async fn load_unlocked(&self) -> Result<BTreeMap<String, UserRecord>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let doc: CredentialDocument = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::Storage(anyhow::anyhow!(
                        "credential store {} is not a valid users document: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                Ok(doc.users)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "credential store missing, creating empty users file"
                );
                let empty = BTreeMap::new();
                self.save_unlocked(&empty).await?;
                Ok(empty)
            }
            Err(e) => Err(AppError::Storage(anyhow::anyhow!(
                "cannot read credential store {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save_unlocked(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), AppError> {
        let doc = CredentialDocumentRef { users };
        let bytes = serde_json::to_vec_pretty(&doc).map_err(|e| {
            AppError::Storage(anyhow::anyhow!("cannot serialize credential store: {}", e))
        })?;
        super::persist_atomic(&self.path, &bytes).await.map_err(|e| {
            AppError::Storage(anyhow::anyhow!(
                "cannot write credential store {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn missing_file_is_bootstrapped_with_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let users = store.load().await.unwrap();
        assert!(users.is_empty());

        // the gateway must now find a parseable document on disk
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["users"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut users = BTreeMap::new();
        users.insert(
            "alice".to_string(),
            UserRecord::new("alice", "$argon2id$stub".to_string(), None, None, None),
        );
        store.save(&users).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, users);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"{ not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_the_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let result: Result<(), AppError> = store
            .mutate(|users| {
                users.insert(
                    "mallory".to_string(),
                    UserRecord::new("mallory", "$argon2id$stub".to_string(), None, None, None),
                );
                Err(AppError::Conflict(anyhow::anyhow!("rejected")))
            })
            .await;
        assert!(result.is_err());

        let after = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);
    }
}
