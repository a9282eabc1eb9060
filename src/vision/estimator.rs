//! Coverage estimator and startup strategy selection.
//!
//! ```text
//!   backend loader? ──no──▶ HSV
//!        │ yes
//!   weights on disk? ──no──▶ HSV
//!        │ yes
//!   load() ok? ──no──▶ HSV
//!        │ yes
//!      Model
//! ```
//!
//! The choice is made once and never revisited per frame.

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::{info, warn};
use serde::Serialize;

use crate::app::ports::{ModelLoader, SegmentationModel};
use crate::error::ModelError;

use super::hsv::{HsvRange, hsv_coverage};
use super::segmentation::{InferenceParams, union_masks};

/// Which strategy produced a coverage number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorMode {
    Model,
    Hsv,
}

impl EstimatorMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Hsv => "hsv",
        }
    }
}

/// Coverage percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Coverage(f64);

impl Coverage {
    pub const ZERO: Self = Self(0.0);

    /// Clamp into range; NaN becomes zero.
    pub fn new(pct: f64) -> Self {
        if pct.is_nan() {
            Self::ZERO
        } else {
            Self(pct.clamp(0.0, 100.0))
        }
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// Two decimal places, as reported and as compared against the valve threshold.
    pub fn rounded(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }
}

pub enum Strategy {
    ColorThreshold(HsvRange),
    Segmentation {
        model: Box<dyn SegmentationModel>,
        params: InferenceParams,
    },
}

pub struct CoverageEstimator {
    strategy: Strategy,
    weights_path: PathBuf,
}

impl CoverageEstimator {
    /// Colour heuristic only.
    pub fn hsv(weights_path: impl Into<PathBuf>) -> Self {
        Self {
            strategy: Strategy::ColorThreshold(HsvRange::default()),
            weights_path: weights_path.into(),
        }
    }

    /// Use an already-loaded model.
    pub fn with_model(model: Box<dyn SegmentationModel>, weights_path: impl Into<PathBuf>) -> Self {
        Self {
            strategy: Strategy::Segmentation {
                model,
                params: InferenceParams::default(),
            },
            weights_path: weights_path.into(),
        }
    }

    /// Resolve the strategy for the lifetime of the process.
    ///
    /// `loader` is `None` when no segmentation backend is compiled in.
    pub fn select(weights: &Path, loader: Option<&dyn ModelLoader>) -> Self {
        let Some(loader) = loader else {
            warn!("No segmentation backend available, using HSV colour threshold");
            return Self::hsv(weights);
        };
        if !weights.is_file() {
            warn!(
                "Segmentation weights not found at {}, using HSV colour threshold",
                weights.display()
            );
            return Self::hsv(weights);
        }
        match loader.load(weights) {
            Ok(model) => {
                info!("Loaded segmentation weights: {}", weights.display());
                Self::with_model(model, weights)
            }
            Err(e) => {
                warn!("Segmentation model failed to load ({}), using HSV colour threshold", e);
                Self::hsv(weights)
            }
        }
    }

    pub fn mode(&self) -> EstimatorMode {
        match self.strategy {
            Strategy::ColorThreshold(_) => EstimatorMode::Hsv,
            Strategy::Segmentation { .. } => EstimatorMode::Model,
        }
    }

    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    /// Checked on each call; the file may be added or removed after startup
    /// without changing the selected strategy.
    pub fn weights_present(&self) -> bool {
        self.weights_path.is_file()
    }

    /// Estimate coverage for one decoded frame.
    ///
    /// Only the model strategy can fail; a zero-area frame is 0 % in both.
    pub fn estimate(&self, frame: &RgbImage) -> Result<Coverage, ModelError> {
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        if w == 0 || h == 0 {
            return Ok(Coverage::ZERO);
        }
        let pct = match &self.strategy {
            Strategy::ColorThreshold(range) => hsv_coverage(frame, range),
            Strategy::Segmentation { model, params } => {
                let instances = model.predict(frame, params)?;
                union_masks(&instances, w, h)?.coverage_pct()
            }
        };
        Ok(Coverage::new(pct))
    }
}

impl core::fmt::Debug for CoverageEstimator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoverageEstimator")
            .field("mode", &self.mode())
            .field("weights_path", &self.weights_path)
            .finish()
    }
}
