//! Request and response bodies for the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Invitation;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "user alice already exists")]
    pub error: String,
}

/// Plain `{"ok": true}` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub groups: Option<Vec<String>>,
    pub displayname: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub displayname: Option<String>,
    pub groups: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub groups: Option<Vec<String>>,
    pub displayname: Option<String>,
    pub expires_minutes: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateInviteResponse {
    pub ok: bool,
    pub token: String,
    pub link: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptInviteRequest {
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// What an acceptance page may show before the invitee commits.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteDetailsResponse {
    pub email: String,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<Invitation> for InviteDetailsResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            email: invitation.email,
            groups: invitation.groups,
            displayname: invitation.displayname,
            expires_at: invitation.expires_at,
        }
    }
}
