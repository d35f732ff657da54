//! Lane Pilot
//!
//! Wires the vision, segmentation, histogram, steering and gate crates into
//! one frame-to-command pipeline and hosts the `lane-pilot` replay binary.

pub mod config;
pub mod pipeline;

pub use config::PilotConfig;
pub use pipeline::{DrivePipeline, FrameReport, PipelineStatus};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pilot error types
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Segmentation error: {0}")]
    Segmentation(#[from] segmentation::SegmentationError),

    #[error("Steering error: {0}")]
    Steering(#[from] steering::SteeringError),

    #[error("Gate error: {0}")]
    Gate(#[from] command_gate::GateError),

    #[error("Logging already initialized: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize logging
pub fn init_logging() -> Result<(), PilotError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
