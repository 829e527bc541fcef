//! Registrar - role-gated CRUD REST service for campus records
//!
//! Six kinds of flat campus records sit behind one generic CRUD resource:
//! articles, help requests, menu item reviews, recommendation requests,
//! dining commons menu items, and student organizations. Reads require the
//! USER role, writes require ADMIN, and lookups that miss translate to a
//! fixed not-found payload.
//!
//! ## Layout
//!
//! - **resource**: the generic resource abstraction (trait, store seam,
//!   operations, error taxonomy)
//! - **db**: MongoDB client and the per-kind record schemas
//! - **auth**: JWT verification and the role gate
//! - **routes / server**: hyper endpoints and the accept loop

pub mod auth;
pub mod config;
pub mod db;
pub mod resource;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{RegistrarError, Result};
