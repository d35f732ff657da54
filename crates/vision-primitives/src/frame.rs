//! Frame container and region-of-interest cropping

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::VisionError;

/// Decoded RGB camera frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame sequence number
    pub sequence: u32,
}

/// Rectangular sub-window of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Placement of the two analysis bands within a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// Bottom ROI starts at this fraction of the frame height (default: 0.75)
    pub bottom_start_ratio: f32,
    /// Look-ahead ROI starts at this fraction of the frame height (default: 0.5)
    pub lookahead_start_ratio: f32,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            bottom_start_ratio: 0.75,
            lookahead_start_ratio: 0.5,
        }
    }
}

impl RoiConfig {
    /// Near band: from `bottom_start_ratio` to the bottom edge, full width
    pub fn bottom(&self, width: u32, height: u32) -> Roi {
        let y = band_row(height, self.bottom_start_ratio);
        Roi { x: 0, y, width, height: height - y }
    }

    /// Forward band directly above the bottom ROI, full width
    pub fn lookahead(&self, width: u32, height: u32) -> Roi {
        let y_end = band_row(height, self.bottom_start_ratio);
        let y = band_row(height, self.lookahead_start_ratio).min(y_end);
        Roi { x: 0, y, width, height: y_end - y }
    }
}

fn band_row(height: u32, ratio: f32) -> u32 {
    let ratio = ratio.clamp(0.0, 1.0);
    ((height as f32 * ratio) as u32).min(height)
}

impl Frame {
    /// Create a frame from raw RGB data, checking the buffer length
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u32) -> Result<Self, VisionError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(VisionError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { data, width, height, sequence })
    }

    /// Frame filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.iter().copied().cycle().take(width as usize * height as usize * 3).collect();
        Self { data, width, height, sequence: 0 }
    }

    /// Decode a JPEG/PNG/BMP payload into an RGB frame
    pub fn decode(bytes: &[u8], sequence: u32) -> Result<Self, VisionError> {
        let img = image::load_from_memory(bytes).map_err(|e| VisionError::Decode(e.to_string()))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            data: rgb.into_raw(),
            width,
            height,
            sequence,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Overwrite the pixel at (x, y); out-of-bounds writes are ignored
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Mean luminance (0.299*R + 0.587*G + 0.114*B), 0 for an empty frame
    pub fn mean_brightness(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .data
            .chunks_exact(3)
            .map(|p| p[0] as f32 * 0.299 + p[1] as f32 * 0.587 + p[2] as f32 * 0.114)
            .sum();
        total / (self.width as f32 * self.height as f32)
    }

    /// Copy a region of the frame
    pub fn crop(&self, roi: Roi) -> Result<Frame, VisionError> {
        let fits = roi.x.checked_add(roi.width).is_some_and(|r| r <= self.width)
            && roi.y.checked_add(roi.height).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(VisionError::RoiOutOfBounds {
                roi,
                width: self.width,
                height: self.height,
            });
        }

        let mut cropped = Vec::with_capacity(roi.area() as usize * 3);
        for row in roi.y..(roi.y + roi.height) {
            let start = (row as usize * self.width as usize + roi.x as usize) * 3;
            let end = start + roi.width as usize * 3;
            cropped.extend_from_slice(&self.data[start..end]);
        }
        debug!(seq = self.sequence, ?roi, "cropped ROI");

        Ok(Frame {
            data: cropped,
            width: roi.width,
            height: roi.height,
            sequence: self.sequence,
        })
    }
}
