//! Error surface of the gateway.
//!
//! Remote-call failures are forwarded unchanged; the only translation is
//! status-code mapping: a backend `NotFound` becomes HTTP 404, anything
//! else becomes HTTP 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tonic::{Code, Status};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A failed remote call, carried as the raw gRPC status.
#[derive(Debug)]
pub struct GatewayError(Status);

impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        Self(status)
    }
}

impl GatewayError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self(Status::internal(message.into()))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self.0.code() {
            Code::NotFound => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("remote call failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.0.message(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
