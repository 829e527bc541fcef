//! HTTP routes for Registrar

pub mod api;
pub mod health;

pub use api::handle_resource_request;
pub use health::{health_check, readiness_check, version_info};
