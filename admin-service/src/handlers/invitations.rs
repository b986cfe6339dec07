//! Invitation endpoints. Issuing requires the access guard; lookup and
//! acceptance are the unauthenticated self-service path.

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use service_core::error::AppError;

use crate::dtos::{
    AcceptInviteRequest, CreateInviteRequest, CreateInviteResponse, InviteDetailsResponse,
    OkResponse,
};
use crate::AppState;

/// Issue an invitation and mail the acceptance link.
#[utoipa::path(
    post,
    path = "/api/invite",
    request_body = CreateInviteRequest,
    responses(
        (status = 200, description = "Invitation issued", body = CreateInviteResponse),
        (status = 400, description = "Missing or invalid field", body = crate::dtos::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Invitations"
)]
#[axum::debug_handler]
pub async fn create_invite(
    State(state): State<AppState>,
    Json(req): Json<CreateInviteRequest>,
) -> Result<Json<CreateInviteResponse>, AppError> {
    req.validate()?;
    let issued = state
        .invites
        .invite(
            req.email.as_deref().unwrap_or(""),
            req.groups,
            req.displayname,
            req.expires_minutes,
        )
        .await?;
    Ok(Json(CreateInviteResponse {
        ok: true,
        token: issued.token,
        link: issued.link,
    }))
}

/// Show what a pending invitation grants, for the acceptance page.
#[utoipa::path(
    get,
    path = "/api/invite/{token}",
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Pending invitation", body = InviteDetailsResponse),
        (status = 400, description = "Unknown or expired token", body = crate::dtos::ErrorResponse)
    ),
    tag = "Invitations"
)]
pub async fn invite_details(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InviteDetailsResponse>, AppError> {
    let invitation = state.invites.lookup(&token).await?;
    Ok(Json(invitation.into()))
}

/// Redeem an invitation token and create the account.
#[utoipa::path(
    post,
    path = "/api/invite/accept",
    request_body = AcceptInviteRequest,
    responses(
        (status = 200, description = "Account created", body = OkResponse),
        (status = 400, description = "Invalid or expired token, or username taken", body = crate::dtos::ErrorResponse)
    ),
    tag = "Invitations"
)]
pub async fn accept_invite(
    State(state): State<AppState>,
    Json(req): Json<AcceptInviteRequest>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .invites
        .accept(
            req.token.as_deref().unwrap_or(""),
            req.username.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(Json(OkResponse::ok()))
}
