// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paystream_kernel::error::KernelError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Ledger error: {0}")]
    Ledger(String),
    #[error("Ledger read timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::Kernel(KernelError::EmptyStreamId) => StatusCode::BAD_REQUEST,
            EngineError::Kernel(KernelError::Decode(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Ledger(_) => StatusCode::BAD_GATEWAY,
            EngineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Io(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
