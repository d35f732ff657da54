//! Lane Pilot - Replay Entry Point
//!
//! Replays a directory of encoded frames through the drive pipeline at the
//! configured frame rate and prints one JSON report per frame.
//!
//! Usage: `lane-pilot [config.toml]`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use command_gate::LogTransport;
use pilot::{init_logging, DrivePipeline, PilotConfig};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

const FRAME_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    info!("=== Lane Pilot v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = PilotConfig::load(config_path.as_deref()).context("loading configuration")?;

    let frames = list_frames(&config.frames_dir)
        .await
        .with_context(|| format!("reading frame directory {}", config.frames_dir.display()))?;
    info!("Replaying {} frames from {} at {} fps", frames.len(), config.frames_dir.display(), config.target_fps);

    let mut pipeline = DrivePipeline::new(&config, LogTransport)?;
    let mut ticker = interval(Duration::from_secs_f64(1.0 / config.target_fps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    for (sequence, path) in frames.iter().enumerate() {
        ticker.tick().await;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let report = pipeline.process_encoded(&bytes, sequence as u32);
        println!("{}", serde_json::to_string(&report)?);
    }

    info!("Replay finished: {}", serde_json::to_string(&pipeline.status())?);
    Ok(())
}

/// Image files in `dir`, sorted by name
async fn list_frames(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut frames = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_frame {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}
