// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handler

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info, warn};

use super::request::{extract_upload, DetectQuery};
use super::response::{DetectionData, Envelope};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::{decode_image_bytes, encode_jpeg_base64};

/// POST /detect - Detect faces (and eyes, or glasses) in an uploaded image
///
/// Accepts a multipart form with a `file` field holding a JPEG or PNG, and a
/// `return_image` query parameter (default true) controlling whether the
/// annotated image is echoed back as base64 JPEG.
///
/// # Response
/// JSON envelope `{status_code, message, data}`; the body's `status_code`
/// mirrors the HTTP status.
/// - 200: at least one face found, full data payload
/// - 400: wrong content type, empty payload, or undecodable bytes; null data
/// - 404: no face found; empty-but-valid data payload
/// - 500: unexpected decode/detect/encode failure; null data
pub async fn detect_handler(
    State(state): State<AppState>,
    Query(query): Query<DetectQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    let upload = extract_upload(multipart).await?;
    upload.validate()?;

    debug!(
        "Detect request: {} bytes, content type {:?}, return_image={}",
        upload.bytes.len(),
        upload.content_type,
        query.return_image
    );

    let (image, image_info) = decode_image_bytes(&upload.bytes).map_err(|e| {
        warn!("Failed to decode upload: {}", e);
        ApiError::InvalidInput("Failed to decode image".to_string())
    })?;

    // One deterministic pass; annotation only when the caller wants the
    // image back.
    let report = state.pipeline.run(&image, query.return_image);

    let encoded = match &report.annotated {
        Some(annotated) => Some(encode_jpeg_base64(annotated).map_err(|e| {
            warn!("Failed to encode annotated image: {}", e);
            ApiError::Internal(e.to_string())
        })?),
        None => None,
    };

    info!(
        "Detection complete: {} face(s), {} eye(s) in {}x{} image",
        report.faces.len(),
        report.eyes.len(),
        image_info.width,
        image_info.height
    );

    let data = DetectionData::from_report(&report, state.pipeline.mode(), encoded);
    let envelope = if report.face_detected() {
        Envelope::success(data)
    } else {
        Envelope::no_face(data)
    };
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok((status, Json(envelope)))
}
