// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection request extraction and validation

use axum::extract::multipart::Multipart;
use serde::Deserialize;

use crate::api::errors::ApiError;

/// Content types accepted for the uploaded file.
const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Multipart field name carrying the image.
const FILE_FIELD: &str = "file";

fn default_return_image() -> bool {
    true
}

/// Query parameters for `/detect`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectQuery {
    /// Whether to echo the annotated image back in the response.
    #[serde(default = "default_return_image")]
    pub return_image: bool,
}

impl Default for DetectQuery {
    fn default() -> Self {
        Self { return_image: true }
    }
}

/// The uploaded file, as extracted from the multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Reject non-image content types and empty payloads before any
    /// decoding happens.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.content_type.as_deref() {
            Some(ct) if SUPPORTED_CONTENT_TYPES.contains(&ct.to_lowercase().as_str()) => {}
            _ => {
                return Err(ApiError::InvalidInput("Unsupported file type".to_string()));
            }
        }
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidInput("Empty file".to_string()));
        }
        Ok(())
    }
}

/// Pull the `file` field out of the multipart form.
pub async fn extract_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("Failed to read upload: {}", e)))?;
        return Ok(Upload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::InvalidInput("Missing 'file' field".to_string()))
}
