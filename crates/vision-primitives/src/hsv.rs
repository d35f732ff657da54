//! RGB to HSV conversion on the 8-bit scale used by the threshold windows
//!
//! Hue is stored halved (0..=180) so it fits a byte; saturation and value
//! span 0..=255.

use crate::Frame;

/// One HSV sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Convert a single RGB pixel
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

        let hue_deg = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let hue_deg = if hue_deg < 0.0 { hue_deg + 360.0 } else { hue_deg };

        Self {
            h: (hue_deg / 2.0).round().min(180.0) as u8,
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

/// HSV image with the same layout as its source frame
#[derive(Debug, Clone)]
pub struct HsvImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Hsv>,
}

impl HsvImage {
    pub fn from_frame(frame: &Frame) -> Self {
        let data = frame
            .data
            .chunks_exact(3)
            .map(|p| Hsv::from_rgb([p[0], p[1], p[2]]))
            .collect();
        Self {
            width: frame.width,
            height: frame.height,
            data,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Hsv> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }
}
