//! Threshold and morphology primitives

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::hough::{detect_lines, LineDetectionOptions};
use serde::{Deserialize, Serialize};

use crate::{Frame, HsvImage, MASK_ON};

/// Inclusive HSV window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub hue: (u8, u8),
    pub saturation: (u8, u8),
    pub value: (u8, u8),
}

impl HsvRange {
    /// Window that accepts any hue
    pub const fn any_hue(saturation: (u8, u8), value: (u8, u8)) -> Self {
        Self {
            hue: (0, 180),
            saturation,
            value,
        }
    }

    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.hue.0..=self.hue.1).contains(&h)
            && (self.saturation.0..=self.saturation.1).contains(&s)
            && (self.value.0..=self.value.1).contains(&v)
    }
}

/// Morphological operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    /// Erode then dilate (removes speckle)
    Open,
    /// Dilate then erode (fills gaps)
    Close,
}

/// Straight line found by the Hough transform, in polar form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughLine {
    /// Signed distance from the top-left corner, in pixels
    pub r: f32,
    /// Angle of the line's normal to the x-axis, in [0, 180)
    pub normal_degrees: u32,
}

impl HoughLine {
    /// Angle of the line itself to the x-axis, in [0, 180)
    pub fn direction_degrees(&self) -> u32 {
        (self.normal_degrees + 90) % 180
    }

    /// Within `tolerance_deg` of the x-axis, either way round
    pub fn is_horizontal(&self, tolerance_deg: u32) -> bool {
        let direction = self.direction_degrees();
        direction < tolerance_deg || direction > 180 - tolerance_deg.min(180)
    }
}

/// Image primitives consumed by the segmenter
pub trait VisionPrimitives {
    /// Color-space conversion
    fn to_hsv(&self, frame: &Frame) -> HsvImage;

    /// Binary mask of pixels inside `range` (255 inside, 0 outside)
    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> GrayImage;

    /// Apply `op` with a square kernel of side `kernel_size`
    fn morphology(&self, mask: &GrayImage, op: MorphOp, kernel_size: u8) -> GrayImage;

    /// Lines through the set pixels of `mask` with at least `vote_threshold`
    /// votes, keeping only accumulator peaks within `suppression_radius`
    fn hough_lines(&self, mask: &GrayImage, vote_threshold: u32, suppression_radius: u32) -> Vec<HoughLine>;
}

/// Default primitives backed by `imageproc`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocPrimitives;

impl VisionPrimitives for ImageprocPrimitives {
    fn to_hsv(&self, frame: &Frame) -> HsvImage {
        HsvImage::from_frame(frame)
    }

    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> GrayImage {
        GrayImage::from_fn(hsv.width, hsv.height, |x, y| {
            let inside = hsv
                .get(x, y)
                .is_some_and(|p| range.contains(p.h, p.s, p.v));
            Luma([if inside { MASK_ON } else { 0 }])
        })
    }

    fn morphology(&self, mask: &GrayImage, op: MorphOp, kernel_size: u8) -> GrayImage {
        // LInf ball of radius k is a (2k+1) square
        let radius = kernel_size / 2;
        if radius == 0 || mask.width() == 0 || mask.height() == 0 {
            return mask.clone();
        }
        match op {
            MorphOp::Open => imageproc::morphology::open(mask, Norm::LInf, radius),
            MorphOp::Close => imageproc::morphology::close(mask, Norm::LInf, radius),
        }
    }

    fn hough_lines(&self, mask: &GrayImage, vote_threshold: u32, suppression_radius: u32) -> Vec<HoughLine> {
        if mask.width() == 0 || mask.height() == 0 {
            return Vec::new();
        }
        let options = LineDetectionOptions {
            vote_threshold,
            suppression_radius,
        };
        detect_lines(mask, options)
            .into_iter()
            .map(|line| HoughLine {
                r: line.r,
                normal_degrees: line.angle_in_degrees,
            })
            .collect()
    }
}

/// Pixel-wise OR of two equally sized masks
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let on = a.get_pixel(x, y)[0] == MASK_ON
            || b.get_pixel_checked(x, y).is_some_and(|p| p[0] == MASK_ON);
        Luma([if on { MASK_ON } else { 0 }])
    })
}
