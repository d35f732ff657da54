//! Vision Primitives for the Lane Pilot
//!
//! Low-level image operations the decision core is built on:
//! - RGB frame container with ROI cropping and decoding
//! - RGB to HSV conversion (8-bit, H in 0..=180)
//! - Inclusive range thresholding into binary masks
//! - Morphological open/close
//! - Hough line detection on binary masks

pub mod frame;
pub mod hsv;
pub mod primitives;

pub use frame::{Frame, Roi, RoiConfig};
pub use hsv::{Hsv, HsvImage};
pub use primitives::{HoughLine, HsvRange, ImageprocPrimitives, MorphOp, VisionPrimitives};

/// Mask value for a set pixel
pub const MASK_ON: u8 = 255;

use thiserror::Error;

/// Vision error types
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("ROI {roi:?} exceeds frame bounds {width}x{height}")]
    RoiOutOfBounds { roi: Roi, width: u32, height: u32 },
}
