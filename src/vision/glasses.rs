// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Edge-density "wearing glasses" heuristic
//!
//! Glasses frames add strong edges across the face region, so a face whose
//! edge density exceeds a fixed threshold is flagged as wearing glasses.
//! The threshold of 5 is a magic number with no calibration behind it.

use image::GrayImage;
use imageproc::edges::canny;

/// Tunables for the glasses heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassesParams {
    /// Canny low threshold.
    pub low_threshold: f32,
    /// Canny high threshold.
    pub high_threshold: f32,
    /// Edge density (percent of region pixels) above which a face is
    /// classified as wearing glasses.
    pub density_threshold: f32,
}

impl Default for GlassesParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 100.0,
            density_threshold: 5.0,
        }
    }
}

/// Edge pixels divided by region area, as a percentage of the region.
pub fn edge_density(face_roi: &GrayImage, params: &GlassesParams) -> f32 {
    let (width, height) = face_roi.dimensions();
    let area = width as u64 * height as u64;
    if area == 0 {
        return 0.0;
    }
    let edges = canny(face_roi, params.low_threshold, params.high_threshold);
    let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count() as u64;
    edge_pixels as f32 / area as f32 * 100.0
}

/// Classify one face region.
pub fn is_wearing_glasses(face_roi: &GrayImage, params: &GlassesParams) -> bool {
    edge_density(face_roi, params) > params.density_threshold
}
