//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use liftlog_core::auth::{AuthRejection, Claims};

use crate::{AuthError, AuthState};

/// Extractor for a verified bearer credential. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already admitted by the middleware
        if let Some(authenticated) = parts.extensions.get::<Authenticated>() {
            return Ok(authenticated.clone());
        }

        let auth_state = AuthState::from_ref(state);

        let result = match parts.headers.get(AUTHORIZATION).map(|v| v.to_str()) {
            None => auth_state.verifier.authorize(None),
            Some(Ok(value)) => auth_state.verifier.authorize(Some(value)),
            Some(Err(_)) => Err(AuthRejection::MalformedHeader),
        };

        match result {
            Ok(claims) => {
                tracing::debug!(path = %parts.uri.path(), "bearer credential accepted");
                Ok(Authenticated(claims))
            }
            Err(rejection) => {
                tracing::warn!(
                    reason = rejection.reason(),
                    method = %parts.method,
                    path = %parts.uri.path(),
                    "Rejected unauthenticated request"
                );
                Err(AuthError::Unauthenticated(rejection))
            }
        }
    }
}
