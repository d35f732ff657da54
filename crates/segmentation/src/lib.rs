//! Frame Segmentation
//!
//! Classifies every pixel of a region of interest into one of three labels:
//! - Road: dark, unsaturated asphalt
//! - LaneMark: white, mid-gray or red painted markings
//! - Obstacle: everything else

pub mod config;
pub mod grid;
pub mod segmenter;

pub use config::{DarkSceneConfig, HoughConfig, SegmenterConfig};
pub use grid::{Label, LabelCounts, LabelGrid};
pub use segmenter::FrameSegmenter;

use thiserror::Error;

/// Segmentation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    #[error("Morphology kernel size must be odd and at most 31, got {0}")]
    InvalidKernel(u8),

    #[error("Invalid Hough settings: {0:?}")]
    InvalidHough(HoughConfig),

    #[error("Invalid label code: {0}")]
    InvalidLabel(u8),

    #[error("Grid rows have inconsistent widths")]
    RaggedRows,
}
