use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use liftlog_core::{auth::AuthRejection, envelope::ApiMessage};
use thiserror::Error;

/// Auth errors for the liftlog_auth crate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request did not carry a verifiable bearer credential.
    #[error(transparent)]
    Unauthenticated(#[from] AuthRejection),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthError::Unauthenticated(rejection) => (
                StatusCode::UNAUTHORIZED,
                ApiMessage::error("not authorized", rejection),
            ),
            AuthError::Config(_) => {
                tracing::error!("Config error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiMessage::error("Server configuration error", &self),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
