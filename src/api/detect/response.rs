// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response envelope
//!
//! Every `/detect` exchange returns `{status_code, message, data}` where the
//! body's `status_code` mirrors the HTTP status. `data` is null on client
//! and server errors; on 200 and 404 it is a fully populated payload.

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::{DetectionMode, DetectionReport};

/// Box lists in `[x, y, w, h]` wire form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Boxes {
    pub faces: Vec<[u32; 4]>,
    pub eyes: Vec<[u32; 4]>,
}

/// Detection results for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionData {
    pub faces_count: usize,
    /// Present in eye mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eyes_count: Option<usize>,
    /// Present in glasses mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wearing_glasses: Option<bool>,
    pub boxes: Boxes,
    pub face_detected: bool,
    /// Base64-encoded JPEG of the annotated image, when requested.
    pub image: Option<String>,
}

impl DetectionData {
    /// Shape a pipeline report into the response payload. The mode decides
    /// whether `eyes_count` or `wearing_glasses` is populated.
    pub fn from_report(report: &DetectionReport, mode: DetectionMode, image: Option<String>) -> Self {
        let (eyes_count, wearing_glasses) = match mode {
            DetectionMode::Glasses => (None, report.wearing_glasses.or(Some(false))),
            _ => (Some(report.eyes.len()), None),
        };
        Self {
            faces_count: report.faces.len(),
            eyes_count,
            wearing_glasses,
            boxes: Boxes {
                faces: report.faces.iter().map(|r| r.to_array()).collect(),
                eyes: report.eyes.iter().map(|r| r.to_array()).collect(),
            },
            face_detected: report.face_detected(),
            image,
        }
    }
}

/// Response envelope shared by every outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status_code: u16,
    pub message: String,
    pub data: Option<DetectionData>,
}

impl Envelope {
    /// Face(s) found.
    pub fn success(data: DetectionData) -> Self {
        Self {
            status_code: 200,
            message: "Detection success".to_string(),
            data: Some(data),
        }
    }

    /// Zero faces: a 404 that still carries an empty-but-valid payload.
    pub fn no_face(data: DetectionData) -> Self {
        Self {
            status_code: ApiError::NoFaceFound.status_code(),
            message: ApiError::NoFaceFound.to_string(),
            data: Some(data),
        }
    }

    /// Client or server error: null data, message surfaced to the caller.
    pub fn error(err: &ApiError) -> Self {
        Self {
            status_code: err.status_code(),
            message: err.to_string(),
            data: None,
        }
    }
}
