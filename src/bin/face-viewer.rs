// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Standalone webcam viewer
//!
//! Non-networked counterpart of the detection API: reads frames from a
//! local camera, runs the same pipeline, and displays annotated frames in
//! a window. Press `q` or Escape to exit.

use std::path::PathBuf;
use std::sync::Arc;

use ab_glyph::FontVec;
use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use show_image::event::{VirtualKeyCode, WindowEvent};
use show_image::{create_window, WindowOptions};
use tracing::{error, info};

use face_detect_node::config::{DEFAULT_FACE_MODEL, NodeConfig};
use face_detect_node::vision::annotate::draw_label;
use face_detect_node::vision::{
    CascadeModel, DetectionPipeline, DetectorParams, FaceAnalysis,
};

#[derive(Parser, Debug)]
#[command(name = "face-viewer", about = "Webcam face detection viewer")]
struct Args {
    /// Camera device index (0 is usually the default webcam)
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Path to the SeetaFace face cascade model
    #[arg(long, env = "FACE_MODEL_PATH", default_value = DEFAULT_FACE_MODEL)]
    face_model: PathBuf,

    /// Optional eye cascade model; enables eye boxes per face
    #[arg(long, env = "EYE_MODEL_PATH")]
    eye_model: Option<PathBuf>,

    /// Run the edge-density glasses heuristic instead of eye detection
    #[arg(long)]
    glasses: bool,

    /// TTF/OTF font for face labels; labels are skipped without one
    #[arg(long)]
    font: Option<PathBuf>,
}

#[show_image::main]
fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = NodeConfig::from_env();

    let face_model = CascadeModel::from_file(&args.face_model)
        .with_context(|| format!("Face cascade model not found at {}", args.face_model.display()))?;

    let analysis = if args.glasses {
        FaceAnalysis::Glasses {
            params: config.glasses_params,
        }
    } else if let Some(eye_path) = &args.eye_model {
        let eye_model = CascadeModel::from_file(eye_path)
            .with_context(|| format!("Eye cascade model not found at {}", eye_path.display()))?;
        FaceAnalysis::Eyes {
            detector: Arc::new(eye_model),
            params: config.eye_params,
        }
    } else {
        FaceAnalysis::None
    };

    let pipeline = DetectionPipeline::new(
        Arc::new(face_model),
        DetectorParams::viewer_face(),
        analysis,
    );

    let font = match &args.font {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Font not found at {}", path.display()))?;
            Some(FontVec::try_from_vec(bytes).context("Failed to parse label font")?)
        }
        None => None,
    };

    let mut camera = Camera::new(
        CameraIndex::Index(args.camera),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    )
    .context("Cannot open camera")?;
    camera.open_stream().context("Cannot start camera stream")?;
    info!("Capturing from camera {}", args.camera);

    let window = create_window("Webcam Face Detection", WindowOptions::default())?;
    let events = window.event_channel()?;

    // Running counter, incremented once per labelled face.
    let mut face_counter: u32 = 0;
    'capture: loop {
        let frame = match camera.frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to read frame: {}", e);
                break;
            }
        };
        let rgb = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode camera frame")?;

        let report = pipeline.run(&rgb, true);
        let mut annotated = report.annotated.unwrap_or(rgb);

        if let Some(font) = &font {
            for face in &report.faces {
                face_counter += 1;
                draw_label(
                    &mut annotated,
                    face,
                    &format!("Face_{:03}", face_counter),
                    font,
                );
            }
        }

        window.set_image("frame", DynamicImage::ImageRgb8(annotated))?;

        for event in events.try_iter() {
            match event {
                WindowEvent::KeyboardInput(event) => {
                    if event.input.state.is_pressed()
                        && matches!(
                            event.input.key_code,
                            Some(VirtualKeyCode::Q) | Some(VirtualKeyCode::Escape)
                        )
                    {
                        break 'capture;
                    }
                }
                WindowEvent::CloseRequested(_) | WindowEvent::Destroyed(_) => break 'capture,
                _ => {}
            }
        }
    }

    camera.stop_stream().ok();
    Ok(())
}
