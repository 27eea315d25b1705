// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! API error taxonomy
//!
//! Explicit result types replace exception-style signaling: handlers thread
//! `Result<_, ApiError>` through the pipeline and the error is mapped to a
//! transport status code exactly once, at the response boundary. Nothing is
//! retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use super::detect::response::Envelope;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Wrong content type, empty payload, or undecodable bytes. The client
    /// must resubmit; the message passes through to the client verbatim.
    #[error("{0}")]
    InvalidInput(String),

    /// Zero faces detected. Informational, not a failure.
    #[error("No face detected")]
    NoFaceFound,

    /// Any other failure during decode/detect/encode, surfaced with the
    /// underlying message.
    #[error("Detection failed: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 400,
            ApiError::NoFaceFound => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(Envelope::error(&self))).into_response()
    }
}
