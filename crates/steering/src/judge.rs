//! Histogram judge: coarse command and confidence from column masses

use histogram::Histogram;
use serde::{Deserialize, Serialize};

use crate::{Command, JudgeConfig};

/// Judge output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    pub command: Command,
    pub confidence: f32,
}

/// Share-based steering judge
///
/// Its confidence is what the obstacle-avoidance and weighted-histogram
/// rules pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct HistogramJudge {
    config: JudgeConfig,
}

impl HistogramJudge {
    pub fn new(config: JudgeConfig) -> Self {
        Self { config }
    }

    pub fn judge(&self, histogram: &Histogram) -> Judgement {
        let total = histogram.total();
        let shares = match histogram.shares() {
            Some(shares) if total >= self.config.min_weighted_pixels => shares,
            _ => {
                return Judgement {
                    command: Command::Stop,
                    confidence: 0.0,
                }
            }
        };
        let [left, center, right] = shares;

        if (left - right).abs() < self.config.deadzone_ratio {
            return Judgement {
                command: Command::Center,
                confidence: center as f32,
            };
        }

        if left > right * self.config.bias_ratio {
            return Judgement {
                command: Command::Left,
                confidence: dominance(left, right),
            };
        }

        if right > left * self.config.bias_ratio {
            return Judgement {
                command: Command::Right,
                confidence: dominance(right, left),
            };
        }

        Judgement {
            command: Command::Center,
            confidence: center as f32,
        }
    }
}

fn dominance(dominant: f64, other: f64) -> f32 {
    let total = dominant + other;
    if total == 0.0 {
        return 0.0;
    }
    (dominant / total).min(1.0) as f32
}
