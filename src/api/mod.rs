// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod errors;
pub mod http_server;

pub use detect::{detect_handler, Boxes, DetectQuery, DetectionData, Envelope, Upload};
pub use errors::ApiError;
pub use http_server::{build_router, start_server, AppState};
