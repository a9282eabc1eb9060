//! 8-bit RGB → HSV conversion and the green-band threshold.
//!
//! Channel scales follow the common 8-bit convention: hue in `0..180`
//! (degrees halved), saturation and value in `0..=255`.

use image::{Rgb, RgbImage};

use super::mask::{BinaryMask, KERNEL_SIZE};

/// One pixel in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv8 {
    pub fn from_rgb(Rgb([r, g, b]): Rgb<u8>) -> Self {
        let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

        let mut hue_deg = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if hue_deg < 0.0 {
            hue_deg += 360.0;
        }

        // 360° wraps to 0 on the halved scale.
        let h = (hue_deg / 2.0).round() as u16 % 180;
        Self {
            h: h as u8,
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

/// Inclusive HSV box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub low: Hsv8,
    pub high: Hsv8,
}

impl HsvRange {
    /// Duckweed green under typical daylight and LED grow lights.
    pub const DUCKWEED_GREEN: Self = Self {
        low: Hsv8 { h: 35, s: 40, v: 40 },
        high: Hsv8 { h: 85, s: 255, v: 255 },
    };

    pub fn contains(&self, px: Hsv8) -> bool {
        (self.low.h..=self.high.h).contains(&px.h)
            && (self.low.s..=self.high.s).contains(&px.s)
            && (self.low.v..=self.high.v).contains(&px.v)
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self::DUCKWEED_GREEN
    }
}

/// Raw in-range mask, before any morphology.
pub fn threshold_mask(frame: &RgbImage, range: &HsvRange) -> BinaryMask {
    BinaryMask::from_fn(frame.width() as usize, frame.height() as usize, |x, y| {
        range.contains(Hsv8::from_rgb(*frame.get_pixel(x as u32, y as u32)))
    })
}

/// Threshold, then one opening and one closing with the 5×5 element.
pub fn green_mask(frame: &RgbImage, range: &HsvRange) -> BinaryMask {
    threshold_mask(frame, range)
        .open(KERNEL_SIZE)
        .close(KERNEL_SIZE)
}

/// Coverage percentage from the colour heuristic.  Deterministic.
pub fn hsv_coverage(frame: &RgbImage, range: &HsvRange) -> f64 {
    green_mask(frame, range).coverage_pct()
}
