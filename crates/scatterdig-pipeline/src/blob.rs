//! Marker detection: contour filtering and centroids.
//!
//! Each contour runs through a fixed chain of checks (area, perimeter,
//! circularity, centroid moment, plot rectangle) and stops at the first
//! one it fails. A contour's fate never depends on any other contour.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::contour::Contour;
use crate::types::{PixelPoint, PixelRect};

/// Size and shape thresholds for accepting a contour as a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobFilter {
    /// Smallest accepted area in px², inclusive.
    pub min_area: f64,
    /// Largest accepted area in px², inclusive.
    pub max_area: f64,
    /// Smallest accepted circularity, inclusive.
    pub min_circularity: f64,
}

/// Why a contour was not accepted as a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Area outside `[min_area, max_area]`.
    Area,
    /// Perimeter is zero (single-point contour).
    ZeroPerimeter,
    /// Circularity below `min_circularity`.
    Circularity,
    /// Zeroth moment is zero, so the centroid is undefined.
    ZeroMoment,
    /// Centroid lies outside the plot rectangle.
    OutsideBounds,
}

impl BlobFilter {
    const fn check_area(&self, area: f64) -> Result<(), Rejection> {
        if area < self.min_area || area > self.max_area {
            Err(Rejection::Area)
        } else {
            Ok(())
        }
    }

    fn check_circularity(&self, contour: &Contour) -> Result<(), Rejection> {
        let circularity = contour.circularity().ok_or(Rejection::ZeroPerimeter)?;
        if circularity < self.min_circularity {
            Err(Rejection::Circularity)
        } else {
            Ok(())
        }
    }
}

/// Centroid `(m10/m00, m01/m00)`, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn centroid(contour: &Contour) -> Result<PixelPoint, Rejection> {
    let m = contour.moments();
    if m.m00 == 0.0 {
        return Err(Rejection::ZeroMoment);
    }
    Ok(PixelPoint::new((m.m10 / m.m00) as i32, (m.m01 / m.m00) as i32))
}

fn within(point: PixelPoint, bounds: Option<PixelRect>) -> Result<PixelPoint, Rejection> {
    match bounds {
        Some(rect) if !rect.contains(point) => Err(Rejection::OutsideBounds),
        _ => Ok(point),
    }
}

/// Run one contour through the filter chain.
///
/// # Errors
///
/// Returns the first [`Rejection`] the contour hits.
pub fn classify_contour(
    contour: &Contour,
    filter: &BlobFilter,
    bounds: Option<PixelRect>,
) -> Result<PixelPoint, Rejection> {
    filter.check_area(contour.area())?;
    filter.check_circularity(contour)?;
    within(centroid(contour)?, bounds)
}

/// Centroids of the contours that pass every check, in contour order.
///
/// No deduplication: touching markers that produced one merged contour
/// give one point, separate contours give separate points.
#[must_use]
pub fn detect_blobs(
    contours: &[Contour],
    filter: &BlobFilter,
    bounds: Option<PixelRect>,
) -> Vec<PixelPoint> {
    let mut tally = RejectionTally::default();
    let points: Vec<PixelPoint> = contours
        .iter()
        .filter_map(|c| {
            classify_contour(c, filter, bounds)
                .map_err(|r| tally.record(r))
                .ok()
        })
        .collect();

    tracing::debug!(
        contours = contours.len(),
        accepted = points.len(),
        area = tally.area,
        zero_perimeter = tally.zero_perimeter,
        circularity = tally.circularity,
        zero_moment = tally.zero_moment,
        outside_bounds = tally.outside_bounds,
        "blob filter"
    );
    points
}

/// Blur, binarize and trace `gray`, then filter the contours into
/// marker centroids.
#[must_use]
pub fn detect_markers(
    gray: &GrayImage,
    config: &PipelineConfig,
    bounds: Option<PixelRect>,
) -> Vec<PixelPoint> {
    let blurred = crate::blur::gaussian_blur(gray, config.blur_sigma);
    let contours =
        crate::threshold::extract_contours(&blurred, config.threshold, config.contour_tracer);
    detect_blobs(&contours, &config.blob_filter(), bounds)
}

#[derive(Debug, Default)]
struct RejectionTally {
    area: usize,
    zero_perimeter: usize,
    circularity: usize,
    zero_moment: usize,
    outside_bounds: usize,
}

impl RejectionTally {
    const fn record(&mut self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::Area => &mut self.area,
            Rejection::ZeroPerimeter => &mut self.zero_perimeter,
            Rejection::Circularity => &mut self.circularity,
            Rejection::ZeroMoment => &mut self.zero_moment,
            Rejection::OutsideBounds => &mut self.outside_bounds,
        };
        *counter += 1;
    }
}
