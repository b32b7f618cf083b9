//! HTTP mapping for `VisitError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use visitd_core::error::VisitError;

/// Wrapper so core errors can be returned from axum handlers.
#[derive(Debug)]
pub struct ApiError(pub VisitError);

impl From<VisitError> for ApiError {
    fn from(e: VisitError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            VisitError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            VisitError::InvalidCounter { .. }
            | VisitError::BadConfig(_)
            | VisitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.0.client_code(),
            "msg": self.0.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
