//! User record model - entries in the gateway credential store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Group every new account belongs to unless told otherwise.
pub const DEFAULT_GROUP: &str = "users";

/// A single entry in the credential store, keyed externally by username.
///
/// The `password` field always holds a self-describing PHC hash string;
/// plaintext must never be written here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub displayname: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub groups: Vec<String>,
}

impl UserRecord {
    /// Create a record with the defaults the admin UI expects: display name
    /// falls back to the username, group membership to [`DEFAULT_GROUP`].
    pub fn new(
        username: &str,
        password_hash: String,
        email: Option<String>,
        groups: Option<Vec<String>>,
        displayname: Option<String>,
    ) -> Self {
        Self {
            displayname: displayname.unwrap_or_else(|| username.to_string()),
            email: email.unwrap_or_default(),
            password: password_hash,
            groups: groups.unwrap_or_else(|| vec![DEFAULT_GROUP.to_string()]),
        }
    }

    /// Strip the hash before the record crosses the API boundary.
    pub fn sanitized(&self) -> UserView {
        UserView {
            displayname: self.displayname.clone(),
            email: self.email.clone(),
            groups: self.groups.clone(),
        }
    }
}

/// User record as exposed over the API - never carries the password field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub displayname: String,
    pub email: String,
    pub groups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_on_create() {
        let record = UserRecord::new("alice", "$argon2id$stub".to_string(), None, None, None);
        assert_eq!(record.displayname, "alice");
        assert_eq!(record.email, "");
        assert_eq!(record.groups, vec![DEFAULT_GROUP.to_string()]);
    }

    #[test]
    fn explicit_fields_win_over_defaults() {
        let record = UserRecord::new(
            "alice",
            "$argon2id$stub".to_string(),
            Some("alice@example.com".to_string()),
            Some(vec!["users".to_string(), "dev".to_string()]),
            Some("Alice".to_string()),
        );
        assert_eq!(record.displayname, "Alice");
        assert_eq!(record.email, "alice@example.com");
        assert_eq!(record.groups.len(), 2);
    }

    #[test]
    fn sanitized_view_has_no_password_key() {
        let record = UserRecord::new("alice", "$argon2id$stub".to_string(), None, None, None);
        let value = serde_json::to_value(record.sanitized()).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("displayname").is_some());
    }
}
