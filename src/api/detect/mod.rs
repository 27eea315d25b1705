// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint: request extraction, handler, response envelope

pub mod handler;
pub mod request;
pub mod response;

pub use handler::detect_handler;
pub use request::{DetectQuery, Upload};
pub use response::{Boxes, DetectionData, Envelope};
