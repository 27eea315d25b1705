// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for cascade-based face analysis
//!
//! This module provides:
//! - The detector contract (`RegionDetector`) and its cascade-backed implementation
//! - The unified detection pipeline (faces, then eyes or the glasses heuristic)
//! - Image decode/encode helpers and box annotation
//!
//! Everything runs on CPU; the shared cascade model data is read-only after
//! startup, so many requests can run detection concurrently.

pub mod annotate;
pub mod cascade;
pub mod detector;
pub mod glasses;
pub mod image_utils;
pub mod pipeline;

pub use cascade::CascadeModel;
pub use detector::{DetectorParams, Region, RegionDetector};
pub use glasses::{edge_density, GlassesParams};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg_base64, ImageError, ImageInfo,
};
pub use pipeline::{DetectionMode, DetectionPipeline, DetectionReport, FaceAnalysis};
