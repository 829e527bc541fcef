//! Shared error and result types for Registrar

use thiserror::Error;

/// Internal service errors
///
/// Client-facing failures (not found, forbidden, bad input) are a separate
/// taxonomy in [`crate::resource::ApiError`]; this enum covers faults inside
/// the service and its collaborators.
#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RegistrarError>;
