//! HTTP handlers for the admin API.

pub mod invitations;
pub mod users;
