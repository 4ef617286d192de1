use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use liftlog_core::envelope::ApiMessage;
use liftlog_core::storage::{repository_error_to_status_code, RepositoryError};

/// Handler error. The outermost context becomes the envelope `Message`, the
/// root cause becomes `Error`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Status derived from the typed error inside the chain.
    pub fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if self.0.downcast_ref::<JsonRejection>().is_some()
            || self.0.downcast_ref::<PathRejection>().is_some()
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// True when the backend or the server failed, as opposed to a request
    /// about a missing, duplicate or invalid record.
    pub fn is_server_fault(&self) -> bool {
        match self.0.downcast_ref::<RepositoryError>() {
            Some(repo_error) => repo_error.is_storage_failure(),
            None => self.status_code().is_server_error(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.0.to_string();
        let cause = self.0.root_cause().to_string();

        if self.is_server_fault() {
            tracing::error!(status = status.as_u16(), context = %message, error = %cause, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), context = %message, error = %cause, "Request failed");
        }

        (status, Json(ApiMessage::error(message, cause))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
