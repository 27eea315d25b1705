// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector contract shared by all detection backends

use image::GrayImage;

/// An axis-aligned detection box in pixel coordinates.
///
/// Immutable once emitted by a detector. Eye boxes are produced in
/// face-local coordinates and translated back into the full-image frame
/// with [`Region::offset`] before they leave the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the box in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether `other` lies entirely within this region.
    pub fn contains(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Translate the box by `(dx, dy)`.
    pub fn offset(&self, dx: u32, dy: u32) -> Region {
        Region::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Intersection with another region, or `None` when they do not overlap.
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);
        if x1 < x2 && y1 < y2 {
            Some(Region::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Flatten to the `[x, y, w, h]` wire form used in responses.
    pub fn to_array(&self) -> [u32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Fixed tuning parameters for one detection pass.
///
/// There is no adaptive retry: a detector runs exactly one deterministic
/// pass with these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Scale step between pyramid levels (e.g. 1.2 means each level is
    /// ~83% the size of the previous one).
    pub scale_factor: f32,
    /// Minimum neighbor count a candidate window needs to survive.
    pub min_neighbors: u32,
    /// Minimum box edge length in pixels.
    pub min_size: u32,
}

impl DetectorParams {
    /// Default face-detection tuning for the API path.
    pub fn api_face() -> Self {
        Self {
            scale_factor: 1.2,
            min_neighbors: 5,
            min_size: 80,
        }
    }

    /// Default eye-detection tuning (run within a face sub-region).
    pub fn api_eye() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            min_size: 10,
        }
    }

    /// Default face-detection tuning for the webcam viewer.
    pub fn viewer_face() -> Self {
        Self {
            scale_factor: 1.3,
            min_neighbors: 5,
            min_size: 30,
        }
    }
}

/// Pluggable detection backend.
///
/// Takes a grayscale grid plus tuning parameters and returns a list of
/// axis-aligned boxes. Implementations must be safe to call from many
/// request tasks at once; the pipeline owns them behind `Arc` and never
/// reloads them after startup.
pub trait RegionDetector: Send + Sync {
    fn detect(&self, gray: &GrayImage, params: &DetectorParams) -> Vec<Region>;
}
