//! Authentication and authorization for Registrar
//!
//! Provides:
//! - JWT token verification
//! - Role levels for operation authorization

pub mod jwt;
pub mod roles;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenValidationResult};
pub use roles::{is_allowed, Operation, Role};
