//! Frame loading.
//!
//! - `load_frame`: read a PNG/JPEG/BMP from disk into an owned RGB buffer.
//! - `decode_frame`: the same for bytes already in memory.
//!
//! Decoding sits in front of the estimator; a frame that fails here never
//! reaches it.

use std::path::Path;

use image::RgbImage;

use crate::error::Error;

pub fn load_frame(path: &Path) -> Result<RgbImage, Error> {
    let img = image::open(path)
        .map_err(|e| Error::Frame(format!("failed to open {}: {e}", path.display())))?;
    Ok(img.into_rgb8())
}

pub fn decode_frame(bytes: &[u8]) -> Result<RgbImage, Error> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::Frame(format!("bad image: {e}")))?;
    Ok(img.into_rgb8())
}
