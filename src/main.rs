// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use face_detect_node::{
    api::start_server,
    config::NodeConfig,
    vision::{CascadeModel, DetectionMode, DetectionPipeline, FaceAnalysis},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Face Detect Node...\n");
    println!("📦 BUILD VERSION: {}", face_detect_node::version::VERSION);
    println!("📅 Build Date: {}", face_detect_node::version::BUILD_DATE);
    println!();

    let config = NodeConfig::from_env();

    println!("🧠 Loading cascade models...");
    let face_model = CascadeModel::from_file(&config.face_model_path).with_context(|| {
        format!(
            "Face cascade model not found at {}",
            config.face_model_path.display()
        )
    })?;
    println!("✅ Face cascade loaded from {}", face_model.path());

    let analysis = match config.mode {
        DetectionMode::Eyes => {
            let eye_model = CascadeModel::from_file(&config.eye_model_path).with_context(|| {
                format!(
                    "Eye cascade model not found at {}",
                    config.eye_model_path.display()
                )
            })?;
            println!("✅ Eye cascade loaded from {}", eye_model.path());
            FaceAnalysis::Eyes {
                detector: Arc::new(eye_model),
                params: config.eye_params,
            }
        }
        DetectionMode::Glasses => FaceAnalysis::Glasses {
            params: config.glasses_params,
        },
        DetectionMode::FacesOnly => FaceAnalysis::None,
    };

    let pipeline = Arc::new(DetectionPipeline::new(
        Arc::new(face_model),
        config.face_params,
        analysis,
    ));

    println!(
        "🔍 Detection mode: {} (scale {}, min_neighbors {}, min_size {})",
        config.mode.as_str(),
        config.face_params.scale_factor,
        config.face_params.min_neighbors,
        config.face_params.min_size
    );

    start_server(config.api_addr, pipeline)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    Ok(())
}
