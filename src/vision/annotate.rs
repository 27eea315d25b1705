// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounding-box and label drawing

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use super::detector::Region;

/// Face boxes are drawn green.
pub const FACE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Eye boxes are drawn blue.
pub const EYE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Viewer label text is drawn red.
pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Stroke width in pixels.
const STROKE: u32 = 2;

/// Draw a hollow rectangle with a 2px stroke. Regions are already clamped
/// to image bounds by the pipeline, so nested strokes only need to stay
/// inside the region itself.
pub fn draw_region(img: &mut RgbImage, region: &Region, color: Rgb<u8>) {
    for inset in 0..STROKE {
        if region.width <= inset * 2 || region.height <= inset * 2 {
            break;
        }
        let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
            .of_size(region.width - inset * 2, region.height - inset * 2);
        draw_hollow_rect_mut(img, rect, color);
    }
}

/// Draw a label just above a region, the way the viewer tags faces.
/// Skipped when the label would start above the top edge.
pub fn draw_label(img: &mut RgbImage, region: &Region, text: &str, font: &FontVec) {
    let scale = PxScale::from(16.0);
    if region.y < 18 {
        return;
    }
    draw_text_mut(
        img,
        LABEL_COLOR,
        region.x as i32,
        (region.y - 18) as i32,
        scale,
        font,
        text,
    );
}
