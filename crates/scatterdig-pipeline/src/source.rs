//! Image loading and grayscale conversion.
//!
//! Every detection stage works on a single-channel `GrayImage`. This
//! module is the only place the pipeline touches the filesystem:
//! [`open_grayscale`] reads a file, decodes it, and drops the handle
//! before returning.

use std::path::Path;

use image::GrayImage;

use crate::types::PipelineError;

/// Read and decode an image file, converting it to grayscale.
///
/// Supports whatever the `image` crate was built with (PNG, JPEG, BMP,
/// WebP). RGB is reduced with the standard luminance weights.
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoad`] if the file is missing,
/// unreadable, or not a decodable image. The message always reads
/// `Could not load image: <path>`.
pub fn open_grayscale(path: &Path) -> Result<GrayImage, PipelineError> {
    let img = image::open(path).map_err(|source| PipelineError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "image loaded"
    );
    Ok(img.to_luma8())
}
