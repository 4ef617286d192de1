//! Unauthenticated liveness endpoint.

use axum::Json;
use liftlog_core::envelope::ApiMessage;

/// GET /api/health - Returns 200 whenever the server is accepting requests.
#[axum::debug_handler]
pub async fn health() -> Json<ApiMessage> {
    Json(ApiMessage::ok("Hooray for me!"))
}
