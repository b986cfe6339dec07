pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};

use crate::config::AdminConfig;
use crate::services::{InviteService, UserService};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::change_password,
        handlers::users::delete_user,
        handlers::invitations::create_invite,
        handlers::invitations::invite_details,
        handlers::invitations::accept_invite,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::OkResponse,
            dtos::CreateUserRequest,
            dtos::UpdateUserRequest,
            dtos::ChangePasswordRequest,
            dtos::CreateInviteRequest,
            dtos::CreateInviteResponse,
            dtos::AcceptInviteRequest,
            dtos::InviteDetailsResponse,
            models::UserView,
        )
    ),
    tags(
        (name = "Users", description = "User records in the gateway credential store"),
        (name = "Invitations", description = "Single-use signup invitations"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: AdminConfig,
    pub users: UserService,
    pub invites: InviteService,
}

pub fn build_router(state: AppState) -> Router {
    // every /api/users* route plus invitation issuance requires the
    // forwarded admin group; lookup and acceptance are the invitee's path
    let admin_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/:username",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route(
            "/api/users/:username/password",
            post(handlers::users::change_password),
        )
        .route("/api/invite", post(handlers::invitations::create_invite))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::admin_guard_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route(
            "/api/invite/:token",
            get(handlers::invitations::invite_details),
        )
        .route(
            "/api/invite/accept",
            post(handlers::invitations::accept_invite),
        )
        .merge(admin_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(service_core::middleware::tracing::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

/// Service liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = dtos::OkResponse)),
    tag = "Observability"
)]
pub async fn health_check() -> Json<dtos::OkResponse> {
    Json(dtos::OkResponse::ok())
}
