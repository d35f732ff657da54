//! Decision results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Left,
    Right,
    Center,
    Stop,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Left, Command::Right, Command::Center, Command::Stop];

    /// Wire name used by the motor controller
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Center => "center",
            Command::Stop => "stop",
        }
    }

    /// Left and right swapped
    pub fn mirrored(&self) -> Self {
        match self {
            Command::Left => Command::Right,
            Command::Right => Command::Left,
            other => *other,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which arbitration rule produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    DegenerateInput,
    HorizontalLane,
    LanePosition,
    ObstacleAvoidance,
    WeightedHistogram,
    HoldPrevious,
    UncertainStop,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::DegenerateInput => "degenerate_input",
            Method::HorizontalLane => "horizontal_lane",
            Method::LanePosition => "lane_position",
            Method::ObstacleAvoidance => "obstacle_avoidance",
            Method::WeightedHistogram => "weighted_histogram",
            Method::HoldPrevious => "hold_previous",
            Method::UncertainStop => "uncertain_stop",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cycle's steering decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub command: Command,
    /// Confidence in [0, 1]
    pub confidence: f32,
    pub method: Method,
}

impl DecisionResult {
    /// Build a result, clamping confidence into [0, 1] (NaN becomes 0)
    pub fn new(command: Command, confidence: f32, method: Method) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self {
            command,
            confidence,
            method,
        }
    }

    /// Stop with zero confidence
    pub fn stop(method: Method) -> Self {
        Self::new(Command::Stop, 0.0, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(DecisionResult::new(Command::Left, 1.7, Method::LanePosition).confidence, 1.0);
        assert_eq!(DecisionResult::new(Command::Left, -0.2, Method::LanePosition).confidence, 0.0);
        assert_eq!(DecisionResult::new(Command::Left, f32::NAN, Method::LanePosition).confidence, 0.0);
    }

    #[test]
    fn test_wire_format() {
        let result = DecisionResult::new(Command::Center, 0.5, Method::WeightedHistogram);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"command":"center","confidence":0.5,"method":"weighted_histogram"}"#);
    }

    #[test]
    fn test_mirrored() {
        assert_eq!(Command::Left.mirrored(), Command::Right);
        assert_eq!(Command::Stop.mirrored(), Command::Stop);
    }
}
