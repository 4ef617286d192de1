//! JSON message body shared by health, delete and error responses.

use serde::{Deserialize, Serialize};

/// `{"Message": ..., "Error": ...}` body returned for non-record responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Error")]
    pub error: String,
}

impl ApiMessage {
    /// A success message with an empty error field.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: String::new(),
        }
    }

    /// A failure message carrying the cause.
    pub fn error(message: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            message: message.into(),
            error: cause.to_string(),
        }
    }
}
