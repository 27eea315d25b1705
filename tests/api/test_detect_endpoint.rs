// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /detect
//!
//! These tests drive the full router in-process with `tower::ServiceExt`
//! and stub detectors injected through the `RegionDetector` seam, so no
//! cascade model file is needed. They verify:
//! - The envelope's `status_code` mirrors the HTTP status in every outcome
//! - Input validation (content type, empty payload, corrupt bytes) → 400
//! - Zero faces → 404 with an empty-but-valid payload
//! - Eye boxes returned in full-image coordinates, within their face
//! - The echoed base64 image decodes to a JPEG with the upload's dimensions

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use image::{GrayImage, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use face_detect_node::{
    api::{build_router, AppState},
    vision::{
        DetectionPipeline, DetectorParams, FaceAnalysis, GlassesParams, Region, RegionDetector,
    },
};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Detector stub returning a fixed set of boxes.
struct StubDetector {
    regions: Vec<Region>,
}

impl RegionDetector for StubDetector {
    fn detect(&self, _gray: &GrayImage, _params: &DetectorParams) -> Vec<Region> {
        self.regions.clone()
    }
}

fn stub(regions: Vec<Region>) -> Arc<StubDetector> {
    Arc::new(StubDetector { regions })
}

fn eyes_state(faces: Vec<Region>, eyes: Vec<Region>) -> AppState {
    AppState::new(Arc::new(DetectionPipeline::new(
        stub(faces),
        DetectorParams::api_face(),
        FaceAnalysis::Eyes {
            detector: stub(eyes),
            params: DetectorParams::api_eye(),
        },
    )))
}

fn glasses_state(faces: Vec<Region>) -> AppState {
    AppState::new(Arc::new(DetectionPipeline::new(
        stub(faces),
        DetectorParams::api_face(),
        FaceAnalysis::Glasses {
            params: GlassesParams::default(),
        },
    )))
}

/// A solid-color PNG with no facial features.
fn solid_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 120, 150]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn multipart_body(content_type: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"upload.png\"\r\n",
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_detect(
    state: AppState,
    uri: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> (StatusCode, serde_json::Value) {
    let app = build_router(state);
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(content_type, bytes)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_no_face_returns_404_with_empty_payload() {
    let state = eyes_state(vec![], vec![]);
    let (status, json) = post_detect(
        state,
        "/detect?return_image=false",
        Some("image/png"),
        &solid_png(120, 90),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status_code"], 404);
    assert_eq!(json["message"], "No face detected");
    assert_eq!(json["data"]["faces_count"], 0);
    assert_eq!(json["data"]["eyes_count"], 0);
    assert_eq!(json["data"]["face_detected"], false);
    assert_eq!(json["data"]["boxes"]["faces"], serde_json::json!([]));
    assert_eq!(json["data"]["boxes"]["eyes"], serde_json::json!([]));
    assert_eq!(json["data"]["image"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_face_found_returns_200_with_translated_boxes() {
    // One stub face; one stub eye in face-local coordinates
    let state = eyes_state(
        vec![Region::new(30, 40, 50, 50)],
        vec![Region::new(10, 10, 12, 6)],
    );
    let (status, json) = post_detect(
        state,
        "/detect?return_image=false",
        Some("image/jpeg"),
        &solid_png(200, 200),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status_code"], 200);
    assert_eq!(json["message"], "Detection success");
    assert_eq!(json["data"]["faces_count"], 1);
    assert_eq!(json["data"]["eyes_count"], 1);
    assert_eq!(json["data"]["face_detected"], true);
    assert_eq!(json["data"]["boxes"]["faces"][0], serde_json::json!([30, 40, 50, 50]));
    // Eye translated into the full-image frame
    assert_eq!(json["data"]["boxes"]["eyes"][0], serde_json::json!([40, 50, 12, 6]));

    // Containment property: every eye box within its parent face box
    let face = Region::new(30, 40, 50, 50);
    let eye = Region::new(40, 50, 12, 6);
    assert!(face.contains(&eye));
}

#[tokio::test]
async fn test_unsupported_content_type_returns_400_null_data() {
    // Payload content is a perfectly valid PNG: the content type alone
    // must reject it
    let state = eyes_state(vec![Region::new(0, 0, 10, 10)], vec![]);
    let (status, json) = post_detect(
        state,
        "/detect",
        Some("text/plain"),
        &solid_png(64, 64),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status_code"], 400);
    assert_eq!(json["message"], "Unsupported file type");
    assert_eq!(json["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_empty_payload_returns_400() {
    let state = eyes_state(vec![], vec![]);
    let (status, json) = post_detect(state, "/detect", Some("image/png"), &[]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status_code"], 400);
    assert_eq!(json["message"], "Empty file");
    assert_eq!(json["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_corrupt_image_returns_400_not_500() {
    // PNG magic bytes followed by garbage: decode failure is a client
    // error, not an internal one
    let corrupt = [0x89, 0x50, 0x4E, 0x47, 0xDE, 0xAD, 0xBE, 0xEF];
    let state = eyes_state(vec![], vec![]);
    let (status, json) = post_detect(state, "/detect", Some("image/png"), &corrupt).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status_code"], 400);
    assert_eq!(json["message"], "Failed to decode image");
    assert_eq!(json["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_non_image_bytes_with_image_content_type_returns_400() {
    let state = eyes_state(vec![], vec![]);
    let (status, json) =
        post_detect(state, "/detect", Some("image/jpeg"), b"definitely not a JPEG").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Failed to decode image");
    assert_eq!(json["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_missing_file_field_returns_400() {
    let state = eyes_state(vec![], vec![]);
    let app = build_router(state);

    // A multipart body with an unrelated field and no 'file'
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_returned_image_round_trips_with_upload_dimensions() {
    let state = eyes_state(vec![Region::new(5, 5, 20, 20)], vec![]);
    // return_image defaults to true
    let (status, json) = post_detect(
        state,
        "/detect",
        Some("image/png"),
        &solid_png(64, 48),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let encoded = json["data"]["image"]
        .as_str()
        .expect("image field should be populated by default");

    let jpeg_bytes = STANDARD.decode(encoded).unwrap();
    // JPEG magic
    assert_eq!(&jpeg_bytes[..3], &[0xFF, 0xD8, 0xFF]);

    let annotated = image::load_from_memory_with_format(&jpeg_bytes, ImageFormat::Jpeg).unwrap();
    assert_eq!(annotated.width(), 64);
    assert_eq!(annotated.height(), 48);
}

#[tokio::test]
async fn test_return_image_false_omits_image() {
    let state = eyes_state(vec![Region::new(5, 5, 20, 20)], vec![]);
    let (status, json) = post_detect(
        state,
        "/detect?return_image=false",
        Some("image/png"),
        &solid_png(64, 48),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["image"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_glasses_mode_response_shape() {
    let state = glasses_state(vec![Region::new(10, 10, 40, 40)]);
    let (status, json) = post_detect(
        state,
        "/detect?return_image=false",
        Some("image/png"),
        &solid_png(100, 100),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // A featureless face region has zero edge density
    assert_eq!(json["data"]["wearing_glasses"], false);
    assert!(
        json["data"].get("eyes_count").is_none(),
        "glasses mode must not report eyes_count"
    );
    assert_eq!(json["data"]["boxes"]["eyes"], serde_json::json!([]));
}

#[tokio::test]
async fn test_glasses_mode_no_face_is_404() {
    let state = glasses_state(vec![]);
    let (status, json) = post_detect(
        state,
        "/detect?return_image=false",
        Some("image/png"),
        &solid_png(100, 100),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status_code"], 404);
    assert_eq!(json["data"]["wearing_glasses"], false);
    assert_eq!(json["data"]["faces_count"], 0);
}
