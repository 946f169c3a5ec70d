//! Error envelope
//!
//! Catalog failures are reported as `500` with a small JSON body
//! `{"kind": ..., "message": ...}` so clients can branch on `kind`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::inspector::InspectorError;

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub kind: String,
    pub message: String,
}

impl From<&InspectorError> for ErrorEnvelope {
    fn from(e: &InspectorError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for InspectorError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorEnvelope::from(&self)),
        )
            .into_response()
    }
}
