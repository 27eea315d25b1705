// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{detect_handler, ApiError, Boxes, DetectionData, Envelope};
pub use config::NodeConfig;
pub use vision::{
    CascadeModel, DetectionMode, DetectionPipeline, DetectionReport, DetectorParams, FaceAnalysis,
    GlassesParams, Region, RegionDetector,
};
