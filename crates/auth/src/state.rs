//! Application state for auth.

use std::sync::Arc;

use liftlog_core::auth::TokenVerifier;

use crate::config::AuthConfig;

/// Shared state for the auth middleware.
///
/// Built once at startup; the secret inside the verifier never changes
/// for the life of the process.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub verifier: Arc<TokenVerifier>,
    pub config: AuthConfig,
}

impl AuthState {
    /// Creates the auth state from configuration.
    pub fn new(config: AuthConfig) -> Self {
        let mut verifier = TokenVerifier::new(config.secret.as_bytes());
        if config.require_expiry {
            verifier = verifier.with_required_expiry();
        }

        Self {
            verifier: Arc::new(verifier),
            config,
        }
    }

    /// Whether `GET` routes skip the bearer check.
    pub fn public_reads(&self) -> bool {
        self.config.public_reads
    }
}
