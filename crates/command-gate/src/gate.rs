//! Command gate implementation

use metrics::counter;
use serde::{Deserialize, Serialize};
use steering::{Command, DecisionResult};
use tracing::{debug, info, warn};

use crate::{CommandTransport, DispatchStats, GateError};

/// Gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Confidence below which non-stop commands are dropped (default: 0.3)
    pub min_confidence: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { min_confidence: 0.3 }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), GateError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(GateError::InvalidThreshold(self.min_confidence));
        }
        Ok(())
    }
}

/// What happened to one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVerdict {
    /// Sent and acknowledged by the transport
    Dispatched,
    /// Dropped for low confidence
    Suppressed,
    /// Passed the gate but the transport reported failure
    TransportFailed,
}

/// Confidence gate in front of the motor transport
///
/// Suppressed commands are never retried; the next frame brings a fresh
/// decision.
#[derive(Debug)]
pub struct CommandGate {
    config: GateConfig,
    stats: DispatchStats,
}

impl CommandGate {
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        config.validate()?;
        info!("Creating command gate with config: {:?}", config);
        Ok(Self {
            config,
            stats: DispatchStats::default(),
        })
    }

    /// Whether `decision` passes the confidence check
    pub fn admits(&self, decision: &DecisionResult) -> bool {
        decision.command == Command::Stop || decision.confidence >= self.config.min_confidence
    }

    /// Gate `decision` and hand it to `transport` if it passes
    pub fn dispatch(&mut self, decision: &DecisionResult, transport: &mut dyn CommandTransport) -> GateVerdict {
        if !self.admits(decision) {
            debug!(
                "Command suppressed: {} confidence {} < threshold {}",
                decision.command, decision.confidence, self.config.min_confidence
            );
            self.stats.record_suppressed();
            counter!("lane_pilot_commands_suppressed_total").increment(1);
            return GateVerdict::Suppressed;
        }

        if !transport.send_command(decision.command) {
            warn!("Transport rejected command {}", decision.command);
            self.stats.record_transport_failure();
            return GateVerdict::TransportFailed;
        }

        self.stats.record_dispatch(decision.command);
        counter!("lane_pilot_commands_dispatched_total", "command" => decision.command.as_str()).increment(1);
        GateVerdict::Dispatched
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self {
            config: GateConfig::default(),
            stats: DispatchStats::default(),
        }
    }
}
