//! Temporal filters: histogram moving average and command hold counter

use histogram::Histogram;
use ring_buffer::RingBuffer;
use serde::Serialize;

use crate::{Command, SteeringError};

/// Mean column masses over the history window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SmoothedHistogram {
    pub left: f64,
    pub center: f64,
    pub right: f64,
}

/// Last resolved command and how many times in a row it repeated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommandMemory {
    last_command: Option<Command>,
    hold_count: u32,
}

impl CommandMemory {
    /// Same command bumps the hold count; a new one resets it
    pub fn record(&mut self, command: Command) {
        if self.last_command == Some(command) {
            self.hold_count = self.hold_count.saturating_add(1);
        } else {
            self.last_command = Some(command);
            self.hold_count = 0;
        }
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    pub fn hold_count(&self) -> u32 {
        self.hold_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State carried between frames by the arbiter
#[derive(Debug, Clone)]
pub struct TemporalFilters {
    history: RingBuffer<Histogram>,
    memory: CommandMemory,
}

impl TemporalFilters {
    pub fn new(history_capacity: usize) -> Result<Self, SteeringError> {
        Ok(Self {
            history: RingBuffer::new(history_capacity)?,
            memory: CommandMemory::default(),
        })
    }

    /// Push `histogram` and return the mean over the retained window
    pub fn smooth(&mut self, histogram: Histogram) -> SmoothedHistogram {
        self.history.push(histogram);

        let n = self.history.len() as f64;
        let mut sum = SmoothedHistogram::default();
        for h in self.history.iter() {
            sum.left += h.left as f64;
            sum.center += h.center as f64;
            sum.right += h.right as f64;
        }
        SmoothedHistogram {
            left: sum.left / n,
            center: sum.center / n,
            right: sum.right / n,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn memory(&self) -> &CommandMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut CommandMemory {
        &mut self.memory
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.memory.reset();
    }
}
