//! Access guard - trusts group headers injected by the upstream proxy.
//!
//! The reverse proxy in front of this service must strip any client-supplied
//! copy of these headers before forwarding. This guard performs no signature
//! verification of its own; header authenticity is the proxy's contract.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use service_core::error::AppError;

use crate::AppState;

/// Trusted group headers in priority order; the first one present wins.
/// Covers the canonical forward-auth header plus the aliases other proxy
/// stacks emit.
pub const GROUP_HEADERS: [&str; 3] = [
    "remote-groups",
    "x-forwarded-groups",
    "x-auth-request-groups",
];

/// Username header, used for log context only.
const USER_HEADER: &str = "remote-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminDecision {
    Authorized,
    MissingGroupsHeader,
    NotAdmin,
}

/// Split the first present group header into individual group names.
pub fn resolve_groups(headers: &HeaderMap) -> Option<Vec<String>> {
    let raw = GROUP_HEADERS
        .iter()
        .find_map(|name| headers.get(*name).and_then(|value| value.to_str().ok()))?;

    Some(
        raw.split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|group| !group.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

pub fn check_admin(headers: &HeaderMap, admin_group: &str) -> AdminDecision {
    match resolve_groups(headers) {
        None => AdminDecision::MissingGroupsHeader,
        Some(groups) if groups.iter().any(|g| g == admin_group) => AdminDecision::Authorized,
        Some(_) => AdminDecision::NotAdmin,
    }
}

pub async fn admin_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    match check_admin(request.headers(), &state.config.admin_group) {
        AdminDecision::Authorized => Ok(next.run(request).await),
        AdminDecision::MissingGroupsHeader => {
            tracing::warn!(
                path = %request.uri().path(),
                user = %user,
                "admin request without forwarded group headers"
            );
            Err(AppError::Forbidden(anyhow::anyhow!(
                "administrator privileges required"
            )))
        }
        AdminDecision::NotAdmin => {
            tracing::warn!(
                path = %request.uri().path(),
                user = %user,
                "admin request from non-admin identity"
            );
            Err(AppError::Forbidden(anyhow::anyhow!(
                "administrator privileges required"
            )))
        }
    }
}
