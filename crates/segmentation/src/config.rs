//! Segmenter configuration

use serde::{Deserialize, Serialize};
use vision_primitives::HsvRange;

use crate::SegmentationError;

/// Dark asphalt: low saturation, low value
pub const ROAD_WINDOW: HsvRange = HsvRange::any_hue((0, 120), (0, 100));

/// Mid-gray painted line
pub const GRAY_LANE_WINDOW: HsvRange = HsvRange::any_hue((0, 50), (50, 150));

/// Red lane paint, low end of the hue circle
pub const RED_LOW_WINDOW: HsvRange = HsvRange {
    hue: (0, 15),
    saturation: (80, 255),
    value: (80, 255),
};

/// Red lane paint, high end of the hue circle
pub const RED_HIGH_WINDOW: HsvRange = HsvRange {
    hue: (155, 180),
    saturation: (80, 255),
    value: (80, 255),
};

/// Relaxed white band used when the ROI is dark overall
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkSceneConfig {
    /// Mean luminance below which the scene counts as dark (default: 80)
    pub brightness_threshold: f32,
    /// White lane minimum value in a dark scene (default: 150)
    pub lane_value_min: u8,
    /// White lane maximum saturation in a dark scene (default: 50)
    pub lane_saturation_max: u8,
}

impl Default for DarkSceneConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 80.0,
            lane_value_min: 150,
            lane_saturation_max: 50,
        }
    }
}

/// Hough transform settings for the horizontal lane-line check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Votes (lane pixels on the line) needed to report a line (default: 50)
    pub vote_threshold: u32,
    /// Accumulator non-maximum suppression radius (default: 8)
    pub suppression_radius: u32,
    /// Degrees from the x-axis still counted as horizontal (default: 15)
    pub horizontal_tolerance_deg: u32,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            vote_threshold: 50,
            suppression_radius: 8,
            horizontal_tolerance_deg: 15,
        }
    }
}

/// Segmenter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// White lane minimum value (default: 200)
    pub lane_value_min: u8,
    /// White lane maximum saturation (default: 30)
    pub lane_saturation_max: u8,
    /// Square kernel side for close/open on lane masks (default: 5)
    pub kernel_size: u8,
    /// Switch to the relaxed white band in dark scenes
    pub dark_scene: Option<DarkSceneConfig>,
    pub hough: HoughConfig,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            lane_value_min: 200,
            lane_saturation_max: 30,
            kernel_size: 5,
            dark_scene: None,
            hough: HoughConfig::default(),
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<(), SegmentationError> {
        if self.kernel_size % 2 == 0 || self.kernel_size > 31 {
            return Err(SegmentationError::InvalidKernel(self.kernel_size));
        }
        if self.hough.vote_threshold == 0 || self.hough.horizontal_tolerance_deg > 90 {
            return Err(SegmentationError::InvalidHough(self.hough.clone()));
        }
        Ok(())
    }

    /// White lane window for the given scene brightness
    pub fn white_window(&self, mean_brightness: f32) -> HsvRange {
        match &self.dark_scene {
            Some(dark) if mean_brightness < dark.brightness_threshold => {
                HsvRange::any_hue((0, dark.lane_saturation_max), (dark.lane_value_min, 255))
            }
            _ => HsvRange::any_hue((0, self.lane_saturation_max), (self.lane_value_min, 255)),
        }
    }
}
