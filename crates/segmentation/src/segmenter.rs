//! ROI segmentation into Road / LaneMark / Obstacle

use image::{GrayImage, Luma};
use tracing::debug;
use vision_primitives::primitives::union;
use vision_primitives::{
    Frame, HsvImage, HsvRange, ImageprocPrimitives, MorphOp, VisionPrimitives, MASK_ON,
};

use crate::config::{GRAY_LANE_WINDOW, RED_HIGH_WINDOW, RED_LOW_WINDOW, ROAD_WINDOW};
use crate::{Label, LabelGrid, SegmentationError, SegmenterConfig};

/// Frame segmenter
pub struct FrameSegmenter<P = ImageprocPrimitives> {
    config: SegmenterConfig,
    primitives: P,
}

impl FrameSegmenter<ImageprocPrimitives> {
    pub fn new(config: SegmenterConfig) -> Result<Self, SegmentationError> {
        Self::with_primitives(config, ImageprocPrimitives)
    }
}

impl<P: VisionPrimitives> FrameSegmenter<P> {
    pub fn with_primitives(config: SegmenterConfig, primitives: P) -> Result<Self, SegmentationError> {
        config.validate()?;
        Ok(Self { config, primitives })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Classify every pixel of `roi`. A zero-area ROI yields an empty grid.
    pub fn segment(&self, roi: &Frame) -> LabelGrid {
        if roi.is_empty() {
            return LabelGrid::new(roi.width as usize, roi.height as usize);
        }

        let hsv = self.primitives.to_hsv(roi);
        let road = self.primitives.in_range(&hsv, &ROAD_WINDOW);
        let lane = self.lane_mask(&hsv, roi.mean_brightness());

        let is_on = |mask: &GrayImage, x: usize, y: usize| mask.get_pixel(x as u32, y as u32)[0] == MASK_ON;
        let grid = LabelGrid::from_fn(roi.width as usize, roi.height as usize, |x, y| {
            if is_on(&road, x, y) {
                Label::Road
            } else if is_on(&lane, x, y) {
                Label::LaneMark
            } else {
                Label::Obstacle
            }
        });

        debug!(
            seq = roi.sequence,
            width = grid.width(),
            height = grid.height(),
            counts = ?grid.counts(),
            "segmented ROI"
        );
        grid
    }

    /// Share of Hough lines through the lane marks of `grid` that run
    /// horizontally, `None` when no line clears the vote threshold
    pub fn horizontal_line_ratio(&self, grid: &LabelGrid) -> Option<f64> {
        let mask = GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
            let on = grid.get(x as usize, y as usize) == Some(Label::LaneMark);
            Luma([if on { MASK_ON } else { 0 }])
        });
        let hough = &self.config.hough;
        let lines = self
            .primitives
            .hough_lines(&mask, hough.vote_threshold, hough.suppression_radius);
        if lines.is_empty() {
            return None;
        }

        let horizontal = lines
            .iter()
            .filter(|line| line.is_horizontal(hough.horizontal_tolerance_deg))
            .count();
        let ratio = horizontal as f64 / lines.len() as f64;
        debug!(lines = lines.len(), horizontal, ratio, "hough lane lines");
        Some(ratio)
    }

    /// Union of the cleaned white, gray and red lane masks
    fn lane_mask(&self, hsv: &HsvImage, mean_brightness: f32) -> GrayImage {
        let white = self.config.white_window(mean_brightness);
        [white, GRAY_LANE_WINDOW, RED_LOW_WINDOW, RED_HIGH_WINDOW]
            .iter()
            .map(|window| self.clean_mask(hsv, window))
            .reduce(|acc, mask| union(&acc, &mask))
            .unwrap_or_else(|| GrayImage::new(hsv.width, hsv.height))
    }

    /// Threshold, then close gaps and open away speckle
    fn clean_mask(&self, hsv: &HsvImage, window: &HsvRange) -> GrayImage {
        let mask = self.primitives.in_range(hsv, window);
        let closed = self.primitives.morphology(&mask, MorphOp::Close, self.config.kernel_size);
        self.primitives.morphology(&closed, MorphOp::Open, self.config.kernel_size)
    }
}
