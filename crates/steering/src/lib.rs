//! Steering Decision Core
//!
//! Turns one segmented frame into one discrete motion command:
//! - Histogram judge: coarse command and confidence from column masses
//! - Corner state machine: perpendicular lane crossings and turn direction
//! - Hybrid arbiter: ordered rule cascade (corner, lane centroid, obstacle
//!   avoidance, weighted histogram, hold previous, uncertain stop)
//! - Temporal filters: 3-frame histogram moving average, command hold counter

pub mod arbiter;
pub mod config;
pub mod corner;
pub mod decision;
pub mod judge;
mod rules;
pub mod temporal;

pub use arbiter::{FrameEvidence, SteeringArbiter};
pub use config::{ArbiterConfig, CornerConfig, CrossingSignal, JudgeConfig};
pub use corner::{CornerStateMachine, CornerStep, CornerVerdict, DriveState};
pub use decision::{Command, DecisionResult, Method};
pub use judge::{HistogramJudge, Judgement};
pub use temporal::{CommandMemory, SmoothedHistogram, TemporalFilters};

use ring_buffer::RingBufferError;
use thiserror::Error;

/// Steering error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SteeringError {
    #[error("Invalid steering configuration: {0}")]
    InvalidConfig(String),

    #[error("History buffer: {0}")]
    History(#[from] RingBufferError),
}
