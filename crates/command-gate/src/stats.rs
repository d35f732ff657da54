//! Dispatch statistics

use std::collections::HashMap;

use serde::Serialize;
use steering::Command;

/// Running totals kept by the gate
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchStats {
    per_command: HashMap<Command, u64>,
    suppressed: u64,
    transport_failures: u64,
}

impl DispatchStats {
    pub(crate) fn record_dispatch(&mut self, command: Command) {
        *self.per_command.entry(command).or_insert(0) += 1;
    }

    pub(crate) fn record_suppressed(&mut self) {
        self.suppressed += 1;
    }

    pub(crate) fn record_transport_failure(&mut self) {
        self.transport_failures += 1;
    }

    pub fn total_dispatched(&self) -> u64 {
        self.per_command.values().sum()
    }

    pub fn count(&self, command: Command) -> u64 {
        self.per_command.get(&command).copied().unwrap_or(0)
    }

    /// Share of dispatched commands that were `command`, 0 before any dispatch
    pub fn ratio(&self, command: Command) -> f64 {
        let total = self.total_dispatched();
        if total == 0 {
            return 0.0;
        }
        self.count(command) as f64 / total as f64
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn transport_failures(&self) -> u64 {
        self.transport_failures
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
