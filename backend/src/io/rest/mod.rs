//! # REST API Interface Layer
//!
//! HTTP endpoints for the clientes backend. Handlers translate requests into
//! `ClienteService` calls and storage errors into status codes; no business
//! logic lives here.

pub mod cliente_apis;
pub mod health_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::storage::StoreError;

/// HTTP status for each kind of storage failure
pub fn status_for(e: &StoreError) -> StatusCode {
    match e {
        StoreError::Validation(_) | StoreError::Rejected(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        StoreError::Io(_) | StoreError::Serialization(_) | StoreError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Log a failed operation and turn it into a plain-text error response
pub fn error_response(action: &str, e: StoreError) -> Response {
    error!("Failed {}: {}", action, e);
    (status_for(&e), e.to_string()).into_response()
}
