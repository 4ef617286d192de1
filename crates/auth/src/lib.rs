//! Bearer token authentication for liftlog.
//!
//! This crate provides:
//! - Auth configuration loaded from the environment
//! - Shared auth state holding the credential verifier
//! - An axum extractor and middleware that admit or deny requests

mod config;
mod error;
mod extractors;
mod middleware;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::Authenticated;
pub use middleware::require_bearer;
pub use state::AuthState;
