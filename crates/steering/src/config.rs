//! Steering configuration

use serde::{Deserialize, Serialize};

use crate::SteeringError;

/// Histogram judge thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Total weighted mass below which the judge stops (default: 200)
    pub min_weighted_pixels: u64,
    /// Left/right share difference treated as straight ahead (default: 0.15)
    pub deadzone_ratio: f64,
    /// Share ratio needed to call a side (default: 1.3)
    pub bias_ratio: f64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            min_weighted_pixels: 200,
            deadzone_ratio: 0.15,
            bias_ratio: 1.3,
        }
    }
}

/// Evidence used to recognise a lane marking across the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingSignal {
    /// Dense lane marks spread evenly over the histogram columns
    #[default]
    Density,
    /// Mostly horizontal Hough lines through the lane marks
    HoughLines,
    /// Both of the above must agree
    Both,
}

impl CrossingSignal {
    /// Whether the Hough line ratio has to be computed
    pub fn uses_lines(self) -> bool {
        self != CrossingSignal::Density
    }
}

/// Corner detection thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    /// Minimum lane-mark fraction of the grid, inclusive (default: 0.78)
    pub lane_fraction: f64,
    /// Share std-dev below which the histogram counts as balanced (default: 0.20)
    pub balance_std_dev: f64,
    /// Look-ahead half ratio needed to pick a turn side (default: 2.0)
    pub direction_ratio: f64,
    /// Which evidence flags a crossing (default: density)
    pub signal: CrossingSignal,
    /// Horizontal share of Hough lines above which lines flag a crossing (default: 0.7)
    pub horizontal_line_ratio: f64,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            lane_fraction: 0.78,
            balance_std_dev: 0.20,
            direction_ratio: 2.0,
            signal: CrossingSignal::Density,
            horizontal_line_ratio: 0.7,
        }
    }
}

/// Arbitration thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Lane-mark fraction above which the centroid method runs (default: 0.05)
    pub centroid_lane_fraction: f64,
    /// Lane-center offset (pixels) treated as centered (default: 30)
    pub center_offset_px: f64,
    /// Obstacle fraction above which avoidance runs (default: 0.30)
    pub obstacle_fraction: f64,
    /// Lane-mark fraction above which the weighted histogram runs (default: 0.02)
    pub histogram_lane_fraction: f64,
    /// Mean left/right difference below which the histogram says center (default: 500)
    pub center_deadzone_weighted_units: f64,
    /// Frames of moving average (default: 3)
    pub history_capacity: usize,
    /// Repeats allowed before hold-previous gives way to stop (default: 10)
    pub hold_limit: u32,
    /// Confidence reported for corner decisions (default: 0.9)
    pub corner_confidence: f32,
    /// Confidence reported when holding the previous command (default: 0.1)
    pub hold_confidence: f32,
    pub corner: CornerConfig,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            centroid_lane_fraction: 0.05,
            center_offset_px: 30.0,
            obstacle_fraction: 0.30,
            histogram_lane_fraction: 0.02,
            center_deadzone_weighted_units: 500.0,
            history_capacity: 3,
            hold_limit: 10,
            corner_confidence: 0.9,
            hold_confidence: 0.1,
            corner: CornerConfig::default(),
        }
    }
}

fn check_fraction(name: &str, value: f64) -> Result<(), SteeringError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SteeringError::InvalidConfig(format!("{name} must be in [0, 1], got {value}")));
    }
    Ok(())
}

impl JudgeConfig {
    pub fn validate(&self) -> Result<(), SteeringError> {
        check_fraction("deadzone_ratio", self.deadzone_ratio)?;
        if self.bias_ratio < 1.0 {
            return Err(SteeringError::InvalidConfig(format!(
                "bias_ratio must be >= 1, got {}",
                self.bias_ratio
            )));
        }
        Ok(())
    }
}

impl ArbiterConfig {
    pub fn validate(&self) -> Result<(), SteeringError> {
        check_fraction("centroid_lane_fraction", self.centroid_lane_fraction)?;
        check_fraction("obstacle_fraction", self.obstacle_fraction)?;
        check_fraction("histogram_lane_fraction", self.histogram_lane_fraction)?;
        check_fraction("corner.lane_fraction", self.corner.lane_fraction)?;
        check_fraction("corner.horizontal_line_ratio", self.corner.horizontal_line_ratio)?;
        if self.history_capacity == 0 {
            return Err(SteeringError::InvalidConfig("history_capacity must be at least 1".into()));
        }
        if self.corner.direction_ratio < 1.0 {
            return Err(SteeringError::InvalidConfig(format!(
                "corner.direction_ratio must be >= 1, got {}",
                self.corner.direction_ratio
            )));
        }
        Ok(())
    }
}
