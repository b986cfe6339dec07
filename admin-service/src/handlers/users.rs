//! User management endpoints. All of these sit behind the access guard.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use service_core::error::AppError;

use crate::dtos::{ChangePasswordRequest, CreateUserRequest, OkResponse, UpdateUserRequest};
use crate::models::UserView;
use crate::AppState;

/// List every user record, password hashes stripped.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Map of username to record, password hashes stripped"),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, UserView>>, AppError> {
    Ok(Json(state.users.list().await?))
}

/// Create a user with an already-hashed password.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = OkResponse),
        (status = 400, description = "Missing field or username taken", body = crate::dtos::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<OkResponse>, AppError> {
    req.validate()?;
    state
        .users
        .create(
            req.username.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
            req.email,
            req.groups,
            req.displayname,
        )
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Merge the provided fields into an existing user.
#[utoipa::path(
    put,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username to update")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = OkResponse),
        (status = 404, description = "Unknown username", body = crate::dtos::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<OkResponse>, AppError> {
    req.validate()?;
    state
        .users
        .update(&username, req.email, req.displayname, req.groups)
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Replace a user's password hash.
#[utoipa::path(
    post,
    path = "/api/users/{username}/password",
    params(("username" = String, Path, description = "Username to update")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = OkResponse),
        (status = 400, description = "Missing password", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Unknown username", body = crate::dtos::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .users
        .change_password(&username, req.password.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Remove a user record.
#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username to delete")),
    responses(
        (status = 200, description = "User deleted", body = OkResponse),
        (status = 404, description = "Unknown username", body = crate::dtos::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::dtos::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    state.users.delete(&username).await?;
    Ok(Json(OkResponse::ok()))
}
