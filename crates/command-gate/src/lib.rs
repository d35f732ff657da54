//! Command Gate
//!
//! Final confidence check between the steering arbiter and the motor
//! transport. Low-confidence turns are suppressed; stop always goes out.

mod gate;
mod stats;
mod transport;

pub use gate::{CommandGate, GateConfig, GateVerdict};
pub use stats::DispatchStats;
pub use transport::{CommandTransport, LogTransport, RecordingTransport};

use thiserror::Error;

/// Gate error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("min_confidence must be in [0, 1], got {0}")]
    InvalidThreshold(f32),
}
