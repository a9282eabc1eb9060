//! Coverage estimation from camera frames.
//!
//! | Module         | Role                                         |
//! |----------------|----------------------------------------------|
//! | `hsv`          | Colour-threshold mask (always available)     |
//! | `mask`         | Binary mask, 5×5 opening / closing           |
//! | `segmentation` | Instance-mask union for the learned model    |
//! | `estimator`    | Strategy selection and `estimate()`          |
//! | `io`           | Frame decoding in front of the estimator     |

pub mod estimator;
pub mod hsv;
pub mod io;
pub mod mask;
pub mod segmentation;

pub use estimator::{Coverage, CoverageEstimator, EstimatorMode};
