//! Dark-ink binarization.

use image::GrayImage;
use imageproc::contrast::{ThresholdType, threshold};

use crate::contour::{Contour, ContourTracer, ContourTracerKind};

/// Mark dark pixels as foreground.
///
/// A pixel at or below `value` becomes 255, anything brighter becomes 0.
/// Markers on a light background turn into foreground components that
/// [`crate::contour::ContourTracer`] can trace.
#[must_use = "returns the binary mask"]
pub fn binarize(gray: &GrayImage, value: u8) -> GrayImage {
    threshold(gray, value, ThresholdType::BinaryInverted)
}

/// Binarize `gray` at `value` and trace the foreground with `tracer`.
///
/// Contours come back in discovery order. Hole borders are never
/// returned.
#[must_use]
pub fn extract_contours(gray: &GrayImage, value: u8, tracer: ContourTracerKind) -> Vec<Contour> {
    let mask = binarize(gray, value);
    let contours = tracer.trace(&mask);
    tracing::debug!(
        threshold = value,
        foreground = foreground_count(&mask),
        contours = contours.len(),
        "marker mask traced"
    );
    contours
}

/// Number of foreground pixels in a binary mask.
#[must_use]
pub fn foreground_count(mask: &GrayImage) -> u64 {
    mask.pixels().map(|p| u64::from(p.0[0] > 0)).sum()
}
