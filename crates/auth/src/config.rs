use std::fmt;

use crate::error::AuthError;

/// Complete auth configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    pub secret: String,
    /// Reject tokens without a valid `exp` claim.
    pub require_expiry: bool,
    /// Serve `GET` routes without a bearer check.
    pub public_reads: bool,
}

impl AuthConfig {
    /// Creates a configuration that only checks signatures.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            require_expiry: false,
            public_reads: false,
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: Shared token signing secret (required)
    /// - `AUTH_REQUIRE_EXPIRY`: Enforce the `exp` claim (default: false)
    /// - `AUTH_PUBLIC_READS`: Leave `GET` routes unauthenticated (default: false)
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset or empty.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::Config("JWT_SECRET must be set".to_string()))?;

        Ok(Self {
            secret,
            require_expiry: parse_flag(lookup("AUTH_REQUIRE_EXPIRY")),
            public_reads: parse_flag(lookup("AUTH_PUBLIC_READS")),
        })
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("require_expiry", &self.require_expiry)
            .field("public_reads", &self.public_reads)
            .finish()
    }
}

fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
