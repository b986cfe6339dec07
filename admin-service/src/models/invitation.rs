//! Invitation model - single-use, time-boxed tokens for self-service signup.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A pending invitation, keyed externally by its opaque token.
///
/// Once accepted or expired the entry is deleted; there is no state field
/// because absence from the store is the terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub email: String,
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        email: String,
        groups: Vec<String>,
        displayname: Option<String>,
        expires_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            email,
            groups,
            displayname,
            created_at: now,
            expires_at: now + Duration::minutes(expires_minutes),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
