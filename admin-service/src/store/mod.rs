//! Durable JSON-document stores.
//!
//! The credential store file is shared with the identity gateway's read
//! path, so every write below goes through a temp-file-plus-rename cycle:
//! the gateway must never observe a half-written document.

mod credentials;
mod invites;

pub use credentials::CredentialStore;
pub use invites::InviteStore;

use std::path::Path;

/// Replace `path` atomically with `contents`.
async fn persist_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}
