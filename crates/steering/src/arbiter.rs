//! Hybrid steering arbiter

use histogram::Histogram;
use segmentation::LabelGrid;
use tracing::{debug, info};

use crate::rules::{RuleContext, RULES};
use crate::{
    ArbiterConfig, CommandMemory, CornerStateMachine, DecisionResult, DriveState, Method, SteeringError,
    TemporalFilters,
};

/// Per-frame input to the arbiter
#[derive(Debug, Clone, Copy)]
pub struct FrameEvidence<'a> {
    /// Near ROI labels
    pub grid: &'a LabelGrid,
    /// Weighted histogram of `grid`
    pub histogram: Histogram,
    /// Judge confidence for `histogram`
    pub confidence: f32,
    /// Horizontal share of Hough lines through the lane marks of `grid`,
    /// `None` when not computed or no line was found
    pub horizontal_lines: Option<f64>,
    /// Look-ahead ROI labels used to pick a turn side at crossings
    pub lookahead: Option<&'a LabelGrid>,
}

/// Owns all state carried between frames: drive state, histogram history
/// and command memory
#[derive(Debug, Clone)]
pub struct SteeringArbiter {
    config: ArbiterConfig,
    corner: CornerStateMachine,
    filters: TemporalFilters,
    last_transitions: Vec<(DriveState, DriveState)>,
}

impl SteeringArbiter {
    pub fn new(config: ArbiterConfig) -> Result<Self, SteeringError> {
        config.validate()?;

        info!(
            history = config.history_capacity,
            hold_limit = config.hold_limit,
            "Steering arbiter initialized"
        );

        Ok(Self {
            corner: CornerStateMachine::new(config.corner.clone()),
            filters: TemporalFilters::new(config.history_capacity)?,
            config,
            last_transitions: Vec::new(),
        })
    }

    /// Decide one frame's command
    ///
    /// The corner machine is stepped every cycle, then the first rule that
    /// resolves wins. The winning command is recorded in the command memory
    /// whether or not it is later dispatched.
    pub fn decide(&mut self, evidence: &FrameEvidence<'_>) -> DecisionResult {
        let step = self.corner.step(
            evidence.grid,
            &evidence.histogram,
            evidence.horizontal_lines,
            evidence.lookahead,
        );

        let ctx = RuleContext {
            grid: evidence.grid,
            histogram: evidence.histogram,
            confidence: evidence.confidence,
            corner: &step,
            config: &self.config,
        };

        let mut resolved = None;
        for rule in RULES {
            if !(rule.applies)(&ctx, &self.filters) {
                continue;
            }
            if let Some((command, confidence)) = (rule.resolve)(&ctx, &mut self.filters) {
                resolved = Some(DecisionResult::new(command, confidence, rule.method));
                break;
            }
        }
        let result = resolved.unwrap_or_else(|| DecisionResult::stop(Method::UncertainStop));

        self.filters.memory_mut().record(result.command);
        self.last_transitions = step.transitions;

        debug!(
            command = %result.command,
            confidence = result.confidence,
            method = %result.method,
            state = ?self.corner.state(),
            hold = self.filters.memory().hold_count(),
            history = self.filters.history_len(),
            "steering decision"
        );

        result
    }

    pub fn drive_state(&self) -> DriveState {
        self.corner.state()
    }

    /// Transitions taken during the last `decide` call
    pub fn last_transitions(&self) -> &[(DriveState, DriveState)] {
        &self.last_transitions
    }

    pub fn memory(&self) -> &CommandMemory {
        self.filters.memory()
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Forget all carried state
    pub fn reset(&mut self) {
        self.corner.reset();
        self.filters.reset();
        self.last_transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, CornerConfig, CrossingSignal, HistogramJudge};
    use histogram::HistogramAccumulator;
    use segmentation::Label;

    fn arbiter() -> SteeringArbiter {
        SteeringArbiter::new(ArbiterConfig::default()).unwrap()
    }

    /// Accumulate and judge `grid` the way the pipeline does
    fn evidence<'a>(grid: &'a LabelGrid, lookahead: Option<&'a LabelGrid>) -> FrameEvidence<'a> {
        let histogram = HistogramAccumulator::default().accumulate(grid);
        let judgement = HistogramJudge::default().judge(&histogram);
        FrameEvidence {
            grid,
            histogram,
            confidence: judgement.confidence,
            horizontal_lines: None,
            lookahead,
        }
    }

    fn with_histogram(grid: &LabelGrid, histogram: Histogram) -> FrameEvidence<'_> {
        let judgement = HistogramJudge::default().judge(&histogram);
        FrameEvidence {
            grid,
            histogram,
            confidence: judgement.confidence,
            horizontal_lines: None,
            lookahead: None,
        }
    }

    #[test]
    fn test_all_road_fresh_arbiter_stops() {
        let grid = LabelGrid::new(90, 30);
        let ev = evidence(&grid, None);
        assert_eq!(ev.histogram, Histogram::default());

        let result = arbiter().decide(&ev);
        assert_eq!(result, DecisionResult::stop(Method::UncertainStop));
    }

    #[test]
    fn test_left_third_lane_marks_steer_left() {
        // 270 of 2700 cells, all in the near band of the left third
        let mut grid = LabelGrid::new(90, 30);
        grid.fill(0..30, 21..30, Label::LaneMark);
        assert!((grid.fraction(Label::LaneMark) - 0.1).abs() < 1e-9);

        let result = arbiter().decide(&evidence(&grid, None));
        assert_eq!(result.command, Command::Left);
        assert_eq!(result.method, Method::WeightedHistogram);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_crossing_turns_in_one_cycle() {
        let mut grid = LabelGrid::new(30, 10);
        grid.fill(0..30, 0..8, Label::LaneMark);
        let mut lookahead = LabelGrid::new(30, 10);
        lookahead.fill(0..15, 0..10, Label::LaneMark);
        lookahead.fill(15..30, 0..3, Label::LaneMark);

        let mut arbiter = arbiter();
        let result = arbiter.decide(&evidence(&grid, Some(&lookahead)));
        assert_eq!(result.command, Command::Left);
        assert_eq!(result.method, Method::HorizontalLane);
        assert!((result.confidence - 0.9).abs() < 1e-6);
        assert_eq!(arbiter.drive_state(), DriveState::Turning);
        assert_eq!(
            arbiter.last_transitions(),
            &[
                (DriveState::NormalDriving, DriveState::CornerDetected),
                (DriveState::CornerDetected, DriveState::Turning),
            ]
        );
    }

    #[test]
    fn test_crossing_with_nearly_balanced_histogram() {
        // shares 0.48/0.27/0.25: std-dev ~0.104, well inside the balance limit
        let histogram = Histogram::new(480, 270, 250);
        let std_dev = histogram.share_std_dev().unwrap();
        assert!((std_dev - 0.104).abs() < 1e-3);

        let mut grid = LabelGrid::new(30, 10);
        grid.fill(0..30, 0..8, Label::LaneMark);
        let mut lookahead = LabelGrid::new(30, 10);
        lookahead.fill(0..15, 0..7, Label::LaneMark);
        lookahead.fill(15..30, 0..3, Label::LaneMark);

        let mut arbiter = arbiter();
        let evidence = FrameEvidence {
            lookahead: Some(&lookahead),
            ..with_histogram(&grid, histogram)
        };
        let result = arbiter.decide(&evidence);
        assert_eq!(result.command, Command::Left);
        assert_eq!(result.method, Method::HorizontalLane);
        assert_eq!(arbiter.drive_state(), DriveState::Turning);
    }

    #[test]
    fn test_hough_signal_flags_crossing() {
        let config = ArbiterConfig {
            corner: CornerConfig {
                signal: CrossingSignal::HoughLines,
                ..Default::default()
            },
            ..Default::default()
        };
        // Sparse grid: the density signal alone would never fire
        let mut grid = LabelGrid::new(120, 40);
        grid.fill(10..110, 20..21, Label::LaneMark);

        let mut arbiter = SteeringArbiter::new(config).unwrap();
        let result = arbiter.decide(&FrameEvidence {
            horizontal_lines: Some(1.0),
            ..evidence(&grid, None)
        });
        assert_eq!(result.command, Command::Stop);
        assert_eq!(result.method, Method::HorizontalLane);
        assert_eq!(arbiter.drive_state(), DriveState::CornerDetected);

        let result = arbiter.decide(&evidence(&grid, None));
        assert_ne!(result.method, Method::HorizontalLane);
        assert_eq!(arbiter.drive_state(), DriveState::NormalDriving);
    }

    #[test]
    fn test_ambiguous_crossing_stops() {
        let mut grid = LabelGrid::new(30, 10);
        grid.fill(0..30, 0..8, Label::LaneMark);

        let mut arbiter = arbiter();
        let result = arbiter.decide(&evidence(&grid, None));
        assert_eq!(result.command, Command::Stop);
        assert_eq!(result.method, Method::HorizontalLane);
        assert_eq!(arbiter.drive_state(), DriveState::CornerDetected);
    }

    #[test]
    fn test_obstacle_avoidance_steers_to_emptiest_column() {
        let mut grid = LabelGrid::new(50, 10);
        grid.fill(0..50, 6..10, Label::Obstacle);
        assert!((grid.fraction(Label::Obstacle) - 0.4).abs() < 1e-9);

        let result = arbiter().decide(&with_histogram(&grid, Histogram::new(1000, 200, 800)));
        assert_eq!(result.command, Command::Center);
        assert_eq!(result.method, Method::ObstacleAvoidance);
    }

    #[test]
    fn test_smoothed_histogram_outside_deadzone() {
        // 3% lane marks: below the centroid threshold, above the histogram one
        let mut grid = LabelGrid::new(100, 10);
        grid.fill(0..30, 9..10, Label::LaneMark);

        let mut arbiter = arbiter();
        let mut result = DecisionResult::stop(Method::UncertainStop);
        for _ in 0..3 {
            result = arbiter.decide(&with_histogram(&grid, Histogram::new(600, 100, 100)));
        }
        assert_eq!(result.command, Command::Left);
        assert_eq!(result.method, Method::WeightedHistogram);
    }

    #[test]
    fn test_smoothed_histogram_inside_deadzone() {
        let mut grid = LabelGrid::new(100, 10);
        grid.fill(0..30, 9..10, Label::LaneMark);

        let mut arbiter = arbiter();
        let result = arbiter.decide(&with_histogram(&grid, Histogram::new(500, 100, 100)));
        assert_eq!(result.command, Command::Center);
    }

    #[test]
    fn test_lane_position_beats_histogram() {
        // Lane center at 140 of 200: right of center
        let mut grid = LabelGrid::new(200, 10);
        grid.fill(80..90, 0..10, Label::LaneMark);
        grid.fill(190..200, 0..10, Label::LaneMark);

        let result = arbiter().decide(&evidence(&grid, None));
        assert_eq!(result.command, Command::Right);
        assert_eq!(result.method, Method::LanePosition);
    }

    #[test]
    fn test_hold_previous_then_stop() {
        let mut grid = LabelGrid::new(200, 10);
        grid.fill(80..90, 0..10, Label::LaneMark);
        grid.fill(190..200, 0..10, Label::LaneMark);
        let empty = LabelGrid::new(200, 10);

        let mut arbiter = arbiter();
        arbiter.decide(&evidence(&grid, None));
        assert_eq!(arbiter.memory().last_command(), Some(Command::Right));

        for i in 1..=10 {
            let result = arbiter.decide(&evidence(&empty, None));
            assert_eq!(result.command, Command::Right);
            assert_eq!(result.method, Method::HoldPrevious);
            assert!((result.confidence - 0.1).abs() < 1e-6);
            assert_eq!(arbiter.memory().hold_count(), i);
        }

        let result = arbiter.decide(&evidence(&empty, None));
        assert_eq!(result, DecisionResult::stop(Method::UncertainStop));
        assert_eq!(arbiter.memory().last_command(), Some(Command::Stop));
        assert_eq!(arbiter.memory().hold_count(), 0);
    }

    #[test]
    fn test_degenerate_grid() {
        let grid = LabelGrid::new(0, 0);
        let mut arbiter = arbiter();
        let result = arbiter.decide(&evidence(&grid, None));
        assert_eq!(result, DecisionResult::stop(Method::DegenerateInput));
        assert_eq!(arbiter.drive_state(), DriveState::NormalDriving);
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut grid = LabelGrid::new(30, 10);
        grid.fill(0..30, 0..8, Label::LaneMark);

        let mut arbiter = arbiter();
        arbiter.decide(&evidence(&grid, None));
        arbiter.reset();
        assert_eq!(arbiter.drive_state(), DriveState::NormalDriving);
        assert_eq!(arbiter.memory().last_command(), None);
        assert!(arbiter.last_transitions().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ArbiterConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(SteeringArbiter::new(config).is_err());
    }
}
