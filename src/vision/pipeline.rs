// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Unified detection pipeline
//!
//! The per-face analysis (eye detection, glasses heuristic, or nothing)
//! is a selectable strategy; grayscale conversion, the single
//! face-detection pass, coordinate translation and annotation are shared
//! across all modes.

use std::sync::Arc;

use image::{imageops, GrayImage, RgbImage};
use tracing::debug;

use super::annotate::{draw_region, EYE_COLOR, FACE_COLOR};
use super::detector::{DetectorParams, Region, RegionDetector};
use super::glasses::{is_wearing_glasses, GlassesParams};

/// Which per-face analysis the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    Eyes,
    Glasses,
    FacesOnly,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Eyes => "eyes",
            DetectionMode::Glasses => "glasses",
            DetectionMode::FacesOnly => "faces-only",
        }
    }
}

/// Per-face analysis strategy.
pub enum FaceAnalysis {
    /// Run an eye detector restricted to each face sub-region and translate
    /// the resulting boxes back into full-image coordinates.
    Eyes {
        detector: Arc<dyn RegionDetector>,
        params: DetectorParams,
    },
    /// Score edge density within each face region against a fixed threshold.
    Glasses { params: GlassesParams },
    /// Faces only (the viewer's default when no eye model is loaded).
    None,
}

/// What one deterministic pipeline pass produced.
///
/// A mid-pipeline failure discards everything; there are no partial
/// results, so a report always reflects a fully completed pass.
pub struct DetectionReport {
    /// Face boxes in full-image coordinates.
    pub faces: Vec<Region>,
    /// Eye boxes in full-image coordinates, each within its parent face.
    pub eyes: Vec<Region>,
    /// Set in glasses mode: whether any detected face crossed the
    /// edge-density threshold.
    pub wearing_glasses: Option<bool>,
    /// The annotated copy of the input, when requested.
    pub annotated: Option<RgbImage>,
}

impl DetectionReport {
    pub fn face_detected(&self) -> bool {
        !self.faces.is_empty()
    }
}

/// The detection request pipeline.
///
/// Holds the injected detector handles for the process lifetime; requests
/// share it behind `Arc` and never mutate it.
pub struct DetectionPipeline {
    face_detector: Arc<dyn RegionDetector>,
    face_params: DetectorParams,
    analysis: FaceAnalysis,
}

impl DetectionPipeline {
    pub fn new(
        face_detector: Arc<dyn RegionDetector>,
        face_params: DetectorParams,
        analysis: FaceAnalysis,
    ) -> Self {
        Self {
            face_detector,
            face_params,
            analysis,
        }
    }

    pub fn mode(&self) -> DetectionMode {
        match self.analysis {
            FaceAnalysis::Eyes { .. } => DetectionMode::Eyes,
            FaceAnalysis::Glasses { .. } => DetectionMode::Glasses,
            FaceAnalysis::None => DetectionMode::FacesOnly,
        }
    }

    /// Run one deterministic detection pass over an image.
    ///
    /// When `annotate` is set the report carries a copy of the input with
    /// all boxes drawn onto it.
    pub fn run(&self, image: &RgbImage, annotate: bool) -> DetectionReport {
        let gray: GrayImage = imageops::grayscale(image);
        let (img_w, img_h) = gray.dimensions();
        let bounds = Region::new(0, 0, img_w, img_h);

        let faces: Vec<Region> = self
            .face_detector
            .detect(&gray, &self.face_params)
            .into_iter()
            .filter_map(|f| f.intersect(&bounds))
            .collect();

        debug!("Detected {} face(s) in {}x{} image", faces.len(), img_w, img_h);

        let mut eyes = Vec::new();
        let mut wearing_glasses = None;

        match &self.analysis {
            FaceAnalysis::Eyes { detector, params } => {
                for face in &faces {
                    let roi = face_roi(&gray, face);
                    for eye in detector.detect(&roi, params) {
                        // Translate back into the full-image frame; clamp so
                        // every eye box stays within its parent face box.
                        let translated = eye.offset(face.x, face.y);
                        if let Some(clamped) = translated.intersect(face) {
                            eyes.push(clamped);
                        }
                    }
                }
            }
            FaceAnalysis::Glasses { params } => {
                let any = faces
                    .iter()
                    .any(|face| is_wearing_glasses(&face_roi(&gray, face), params));
                wearing_glasses = Some(any);
            }
            FaceAnalysis::None => {}
        }

        let annotated = annotate.then(|| {
            let mut copy = image.clone();
            for face in &faces {
                draw_region(&mut copy, face, FACE_COLOR);
            }
            for eye in &eyes {
                draw_region(&mut copy, eye, EYE_COLOR);
            }
            copy
        });

        DetectionReport {
            faces,
            eyes,
            wearing_glasses,
            annotated,
        }
    }
}

/// Crop the face sub-region out of the grayscale grid. Faces are clamped
/// to image bounds before this is called.
fn face_roi(gray: &GrayImage, face: &Region) -> GrayImage {
    imageops::crop_imm(gray, face.x, face.y, face.width, face.height).to_image()
}
