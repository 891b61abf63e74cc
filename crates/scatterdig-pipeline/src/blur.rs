//! Gaussian smoothing ahead of marker thresholding.
//!
//! Anti-aliased plot renderers leave speckle and half-tone fringes
//! around markers; a light blur merges those into the marker body so
//! the binary mask yields one contour per marker instead of several
//! fragments.

use image::GrayImage;

/// Sigma of the 5x5 kernel a plotting library picks when asked for
/// an automatic-width Gaussian: `0.3 * ((5 - 1) / 2 - 1) + 0.8`.
pub const MARKER_BLUR_SIGMA: f32 = 1.1;

/// Apply Gaussian blur to a grayscale image.
///
/// Non-positive sigma returns the image unchanged; `imageproc` panics
/// on `sigma <= 0.0`.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, sigma)
}
