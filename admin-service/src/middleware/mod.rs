pub mod admin;

pub use admin::{admin_guard_middleware, check_admin, resolve_groups, AdminDecision, GROUP_HEADERS};
