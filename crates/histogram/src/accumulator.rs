//! Histogram accumulation over a label grid

use segmentation::{Label, LabelGrid};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::population_std_dev;

/// Rows at or below this fraction of the height (from the top) are the near band
const NEAR_BAND_START: f64 = 0.7;
/// Rows from this fraction down to the near band are the middle band
const MIDDLE_BAND_START: f64 = 0.4;

const NEAR_BAND_WEIGHT: u64 = 3;
const MIDDLE_BAND_WEIGHT: u64 = 2;
const FAR_BAND_WEIGHT: u64 = 1;

/// Weighted column masses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub left: u64,
    pub center: u64,
    pub right: u64,
}

impl Histogram {
    pub fn new(left: u64, center: u64, right: u64) -> Self {
        Self { left, center, right }
    }

    pub fn total(&self) -> u64 {
        self.left + self.center + self.right
    }

    /// Column shares of the total, `None` when the histogram is empty
    pub fn shares(&self) -> Option<[f64; 3]> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some([
            self.left as f64 / total,
            self.center as f64 / total,
            self.right as f64 / total,
        ])
    }

    /// Population std-dev of the three shares; small when balanced
    pub fn share_std_dev(&self) -> Option<f64> {
        self.shares().map(|shares| population_std_dev(&shares))
    }

    /// Left and right swapped
    pub fn mirrored(&self) -> Self {
        Self {
            left: self.right,
            center: self.center,
            right: self.left,
        }
    }
}

/// Histogram weighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Weight of a lane-mark pixel (default: 5)
    pub lane_weight: u64,
    /// Weight of an obstacle pixel (default: 1)
    pub obstacle_weight: u64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            lane_weight: 5,
            obstacle_weight: 1,
        }
    }
}

/// Reduces label grids to weighted histograms
#[derive(Debug, Clone, Default)]
pub struct HistogramAccumulator {
    config: HistogramConfig,
}

impl HistogramAccumulator {
    pub fn new(config: HistogramConfig) -> Self {
        Self { config }
    }

    fn label_weight(&self, label: Label) -> u64 {
        match label {
            Label::Road => 0,
            Label::Obstacle => self.config.obstacle_weight,
            Label::LaneMark => self.config.lane_weight,
        }
    }

    /// Three equal columns (remainder to the right), three depth bands
    pub fn accumulate(&self, grid: &LabelGrid) -> Histogram {
        let mut histogram = Histogram::default();
        if grid.is_empty() {
            return histogram;
        }

        let height = grid.height();
        let third = grid.width() / 3;
        let near_start = (height as f64 * NEAR_BAND_START) as usize;
        let middle_start = (height as f64 * MIDDLE_BAND_START) as usize;

        for (y, row) in grid.view().rows().into_iter().enumerate() {
            let band = if y >= near_start {
                NEAR_BAND_WEIGHT
            } else if y >= middle_start {
                MIDDLE_BAND_WEIGHT
            } else {
                FAR_BAND_WEIGHT
            };

            for (x, &label) in row.iter().enumerate() {
                let weight = self.label_weight(label) * band;
                if weight == 0 {
                    continue;
                }
                if x < third {
                    histogram.left += weight;
                } else if x < 2 * third {
                    histogram.center += weight;
                } else {
                    histogram.right += weight;
                }
            }
        }

        trace!(?histogram, "accumulated histogram");
        histogram
    }
}
