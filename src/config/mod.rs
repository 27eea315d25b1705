// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven node configuration
//!
//! Every knob has a documented default; parse failures fall back to the
//! default rather than aborting. A missing face model file is the one
//! startup error, raised when the model is loaded, not here.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::vision::{DetectionMode, DetectorParams, GlassesParams};

/// Default SeetaFace model shipped alongside the node.
pub const DEFAULT_FACE_MODEL: &str = "./models/seeta_fd_frontal_v1.0.bin";
/// Default eye cascade model (same SeetaFace container format).
pub const DEFAULT_EYE_MODEL: &str = "./models/seeta_eye_v1.0.bin";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub api_addr: SocketAddr,
    pub face_model_path: PathBuf,
    pub eye_model_path: PathBuf,
    pub mode: DetectionMode,
    pub face_params: DetectorParams,
    pub eye_params: DetectorParams,
    pub glasses_params: GlassesParams,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080),
            face_model_path: PathBuf::from(DEFAULT_FACE_MODEL),
            eye_model_path: PathBuf::from(DEFAULT_EYE_MODEL),
            mode: DetectionMode::Eyes,
            face_params: DetectorParams::api_face(),
            eye_params: DetectorParams::api_eye(),
            glasses_params: GlassesParams::default(),
        }
    }
}

impl NodeConfig {
    /// Read configuration from environment variables, falling back to the
    /// defaults above.
    ///
    /// Recognized variables: `API_HOST`, `API_PORT`, `FACE_MODEL_PATH`,
    /// `EYE_MODEL_PATH`, `DETECTION_MODE` (`eyes` | `glasses`),
    /// `FACE_SCALE_FACTOR`, `FACE_MIN_NEIGHBORS`, `FACE_MIN_SIZE`,
    /// `EYE_SCALE_FACTOR`, `EYE_MIN_NEIGHBORS`, `EYE_MIN_SIZE`,
    /// `GLASSES_EDGE_THRESHOLD`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env_parse("API_HOST", defaults.api_addr.ip());
        let port = env_parse("API_PORT", defaults.api_addr.port());

        Self {
            api_addr: SocketAddr::new(host, port),
            face_model_path: env::var("FACE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.face_model_path),
            eye_model_path: env::var("EYE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.eye_model_path),
            mode: env::var("DETECTION_MODE")
                .map(|v| parse_mode(&v))
                .unwrap_or(defaults.mode),
            face_params: DetectorParams {
                scale_factor: env_parse("FACE_SCALE_FACTOR", defaults.face_params.scale_factor),
                min_neighbors: env_parse("FACE_MIN_NEIGHBORS", defaults.face_params.min_neighbors),
                min_size: env_parse("FACE_MIN_SIZE", defaults.face_params.min_size),
            },
            eye_params: DetectorParams {
                scale_factor: env_parse("EYE_SCALE_FACTOR", defaults.eye_params.scale_factor),
                min_neighbors: env_parse("EYE_MIN_NEIGHBORS", defaults.eye_params.min_neighbors),
                min_size: env_parse("EYE_MIN_SIZE", defaults.eye_params.min_size),
            },
            glasses_params: GlassesParams {
                density_threshold: env_parse(
                    "GLASSES_EDGE_THRESHOLD",
                    defaults.glasses_params.density_threshold,
                ),
                ..defaults.glasses_params
            },
        }
    }
}

/// Parse a detection mode name; unknown values fall back to eye detection.
pub fn parse_mode(value: &str) -> DetectionMode {
    match value.to_lowercase().as_str() {
        "eyes" => DetectionMode::Eyes,
        "glasses" => DetectionMode::Glasses,
        other => {
            warn!("Unknown DETECTION_MODE '{}', defaulting to 'eyes'", other);
            DetectionMode::Eyes
        }
    }
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
