use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::LarderError;

impl LarderError {
    pub fn status(&self) -> StatusCode {
        match self {
            LarderError::Validation(_) => StatusCode::BAD_REQUEST,
            LarderError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LarderError::NotFound(_) => StatusCode::NOT_FOUND,
            LarderError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LarderError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            LarderError::Speech(msg) => msg.clone(),
            // Storage and transport details stay in the log
            err if status.is_server_error() => {
                error!("❌ Request failed: {}", err);
                "Internal server error".to_string()
            }
            err => err.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
