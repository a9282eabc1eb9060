//! Learned instance segmentation: inference parameters, per-instance
//! masks, and the union of all instances into one frame-sized mask.
//!
//! The backend itself lives behind [`SegmentationModel`](crate::app::ports::SegmentationModel);
//! this module only deals with what comes back.

use crate::error::ModelError;

use super::mask::BinaryMask;

/// Per-pixel probability above which an instance mask counts as duckweed.
pub const MASK_CUTOFF: f32 = 0.5;

/// Fixed settings for every forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceParams {
    /// Square input size the backend letterboxes to.
    pub image_size: u32,
    /// Minimum detection confidence.
    pub confidence: f32,
    /// Overlap threshold for non-maximum suppression.
    pub iou: f32,
    pub device: &'static str,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            image_size: 640,
            confidence: 0.15,
            iou: 0.4,
            device: "cpu",
        }
    }
}

/// One predicted instance at model resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceMask {
    pub width: usize,
    pub height: usize,
    /// Row-major probabilities, `width * height` long.
    pub probabilities: Vec<f32>,
}

impl InstanceMask {
    pub fn new(width: usize, height: usize, probabilities: Vec<f32>) -> Result<Self, ModelError> {
        let m = Self {
            width,
            height,
            probabilities,
        };
        m.check()?;
        Ok(m)
    }

    fn check(&self) -> Result<(), ModelError> {
        let expected = self.width * self.height;
        if self.probabilities.len() != expected {
            return Err(ModelError::MalformedMask {
                expected,
                actual: self.probabilities.len(),
            });
        }
        Ok(())
    }

    /// Nearest-neighbour sample for output pixel `(x, y)` of an
    /// `out_w × out_h` frame.
    fn sample(&self, x: usize, y: usize, out_w: usize, out_h: usize) -> f32 {
        let sx = (x * self.width / out_w).min(self.width - 1);
        let sy = (y * self.height / out_h).min(self.height - 1);
        self.probabilities[sy * self.width + sx]
    }
}

/// OR every instance into a single mask at frame resolution.
///
/// No instances gives an empty mask (zero coverage).
pub fn union_masks(
    instances: &[InstanceMask],
    frame_w: usize,
    frame_h: usize,
) -> Result<BinaryMask, ModelError> {
    let mut out = BinaryMask::new(frame_w, frame_h);
    if frame_w == 0 || frame_h == 0 {
        return Ok(out);
    }
    for inst in instances {
        inst.check()?;
        if inst.width == 0 || inst.height == 0 {
            continue;
        }
        for y in 0..frame_h {
            for x in 0..frame_w {
                if !out.get(x, y) && inst.sample(x, y, frame_w, frame_h) > MASK_CUTOFF {
                    out.set(x, y, true);
                }
            }
        }
    }
    Ok(out)
}
