//! Corner state machine
//!
//! A lane marking lying across the direction of travel (crosswalk, T
//! junction) fills most of the near ROI evenly and shows up as mostly
//! horizontal Hough lines. When that signature shows up, the forward
//! look-ahead band decides which way the lane continues.

use histogram::Histogram;
use segmentation::{Label, LabelGrid};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Command, CornerConfig, CrossingSignal};

/// Driving state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveState {
    #[default]
    NormalDriving,
    CornerDetected,
    Turning,
}

/// Outcome of one corner evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerVerdict {
    /// No crossing in view
    Clear,
    /// Crossing in view, look-ahead did not pick a side
    Ambiguous,
    /// Crossing in view, turn toward this side
    Turn(Command),
}

/// Result of [`CornerStateMachine::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerStep {
    pub verdict: CornerVerdict,
    /// Transitions taken this cycle, in order
    pub transitions: Vec<(DriveState, DriveState)>,
}

impl CornerStep {
    pub fn flagged(&self) -> bool {
        self.verdict != CornerVerdict::Clear
    }

    /// Command the corner handler issues; ambiguous crossings stop
    pub fn command(&self) -> Option<Command> {
        match self.verdict {
            CornerVerdict::Clear => None,
            CornerVerdict::Ambiguous => Some(Command::Stop),
            CornerVerdict::Turn(command) => Some(command),
        }
    }
}

/// Corner state machine
#[derive(Debug, Clone, Default)]
pub struct CornerStateMachine {
    config: CornerConfig,
    state: DriveState,
}

impl CornerStateMachine {
    pub fn new(config: CornerConfig) -> Self {
        Self {
            config,
            state: DriveState::NormalDriving,
        }
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Lane marking across the near ROI, judged by the configured signal
    ///
    /// `horizontal_lines` is the horizontal share of Hough lines through the
    /// lane marks; `None` (no lines found) never flags a crossing.
    pub fn is_crossing(&self, grid: &LabelGrid, histogram: &Histogram, horizontal_lines: Option<f64>) -> bool {
        match self.config.signal {
            CrossingSignal::Density => self.dense_and_balanced(grid, histogram),
            CrossingSignal::HoughLines => self.mostly_horizontal(horizontal_lines),
            CrossingSignal::Both => {
                self.dense_and_balanced(grid, histogram) && self.mostly_horizontal(horizontal_lines)
            }
        }
    }

    fn dense_and_balanced(&self, grid: &LabelGrid, histogram: &Histogram) -> bool {
        if grid.fraction(Label::LaneMark) < self.config.lane_fraction {
            return false;
        }
        histogram
            .share_std_dev()
            .is_some_and(|std_dev| std_dev < self.config.balance_std_dev)
    }

    fn mostly_horizontal(&self, horizontal_lines: Option<f64>) -> bool {
        horizontal_lines.is_some_and(|ratio| ratio > self.config.horizontal_line_ratio)
    }

    /// Which half of the look-ahead ROI carries clearly more lane marks;
    /// the middle column of an odd width counts for neither
    pub fn turn_direction(&self, lookahead: &LabelGrid) -> Option<Command> {
        let width = lookahead.width();
        let left = lookahead.count_in_columns(Label::LaneMark, 0..width / 2) as f64;
        let right = lookahead.count_in_columns(Label::LaneMark, (width + 1) / 2..width) as f64;
        let ratio = self.config.direction_ratio;

        debug!(left, right, "look-ahead lane marks");
        if left > 0.0 && left > right && left >= right * ratio {
            Some(Command::Left)
        } else if right > 0.0 && right > left && right >= left * ratio {
            Some(Command::Right)
        } else {
            None
        }
    }

    /// Re-evaluate the state from this cycle's evidence
    pub fn step(
        &mut self,
        grid: &LabelGrid,
        histogram: &Histogram,
        horizontal_lines: Option<f64>,
        lookahead: Option<&LabelGrid>,
    ) -> CornerStep {
        let mut transitions = Vec::new();

        if !self.is_crossing(grid, histogram, horizontal_lines) {
            self.transition(DriveState::NormalDriving, &mut transitions);
            return CornerStep {
                verdict: CornerVerdict::Clear,
                transitions,
            };
        }

        self.transition(DriveState::CornerDetected, &mut transitions);

        let verdict = match lookahead.and_then(|grid| self.turn_direction(grid)) {
            Some(command) => {
                self.transition(DriveState::Turning, &mut transitions);
                CornerVerdict::Turn(command)
            }
            None => CornerVerdict::Ambiguous,
        };

        CornerStep { verdict, transitions }
    }

    fn transition(&mut self, next: DriveState, log: &mut Vec<(DriveState, DriveState)>) {
        if self.state == next {
            return;
        }
        info!(from = ?self.state, to = ?next, "drive state transition");
        log.push((self.state, next));
        self.state = next;
    }

    pub fn reset(&mut self) {
        self.state = DriveState::NormalDriving;
    }
}
