// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cascade-backed detection using the SeetaFace funnel cascade engine
//!
//! The model data is loaded once at startup and is read-only afterwards.
//! `rustface` scanners carry mutable scan state, so a fresh scanner is
//! built from the shared model for every call; concurrent requests never
//! touch each other.

use std::io::Cursor;
use std::path::Path;

use image::GrayImage;
use thiserror::Error;
use tracing::debug;

use super::detector::{DetectorParams, Region, RegionDetector};

/// Step size of the sliding window, in pixels.
const SLIDE_WINDOW_STEP: u32 = 4;

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("Failed to read cascade model file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse cascade model '{path}': {message}")]
    Parse { path: String, message: String },
}

/// A pretrained cascade classifier loaded from a SeetaFace model file.
pub struct CascadeModel {
    model: rustface::Model,
    path: String,
}

impl std::fmt::Debug for CascadeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadeModel")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CascadeModel {
    /// Load a cascade model from disk. Failures here are startup errors;
    /// the process refuses to start rather than failing per request.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CascadeError> {
        let path_str = path.as_ref().display().to_string();
        let bytes = std::fs::read(&path).map_err(|source| CascadeError::Io {
            path: path_str.clone(),
            source,
        })?;
        let model = rustface::read_model(Cursor::new(bytes)).map_err(|e| CascadeError::Parse {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        debug!("Loaded cascade model from {}", path_str);
        Ok(Self {
            model,
            path: path_str,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Smallest window the engine accepts; it panics below this.
const MIN_ENGINE_WINDOW: u32 = 20;

/// Map the caller-facing scale factor (>1, step between pyramid levels)
/// onto the engine's pyramid scale (<1, shrink ratio per level). The
/// engine only accepts values in (0.01, 0.99).
pub(crate) fn pyramid_scale(scale_factor: f32) -> f32 {
    let factor = if scale_factor > 1.0 { scale_factor } else { 1.1 };
    (1.0 / factor).clamp(0.01, 0.99)
}

impl RegionDetector for CascadeModel {
    fn detect(&self, gray: &GrayImage, params: &DetectorParams) -> Vec<Region> {
        let (width, height) = gray.dimensions();
        // The engine scans a 40px window; smaller grids cannot contain a
        // detection and some make the pyramid degenerate.
        if width.min(height) < (MIN_ENGINE_WINDOW * 2).max(params.min_size) {
            return Vec::new();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        // The engine refuses windows under 20px and non-positive thresholds
        detector.set_min_face_size(params.min_size.max(MIN_ENGINE_WINDOW));
        detector.set_score_thresh(f64::from(params.min_neighbors.max(1)));
        detector.set_pyramid_scale_factor(pyramid_scale(params.scale_factor));
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                clamp_to_grid(
                    bbox.x(),
                    bbox.y(),
                    bbox.width(),
                    bbox.height(),
                    width,
                    height,
                )
            })
            .collect()
    }
}

/// Clamp an engine box (which may overhang the grid) to image bounds.
/// Boxes that end up empty are dropped.
fn clamp_to_grid(x: i32, y: i32, w: u32, h: u32, img_w: u32, img_h: u32) -> Option<Region> {
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    if x0 >= img_w || y0 >= img_h {
        return None;
    }
    // Shrink by however much the origin was clamped
    let lost_x = (x0 as i64 - x as i64) as u32;
    let lost_y = (y0 as i64 - y as i64) as u32;
    let w = w.saturating_sub(lost_x).min(img_w - x0);
    let h = h.saturating_sub(lost_y).min(img_h - y0);
    if w == 0 || h == 0 {
        return None;
    }
    Some(Region::new(x0, y0, w, h))
}
