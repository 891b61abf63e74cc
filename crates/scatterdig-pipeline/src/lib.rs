//! scatterdig-pipeline: scatter-plot raster digitization.
//!
//! Recovers numeric (x, y) data from an image of a scatter plot:
//! grayscale -> plot frame resolution -> axis calibration ->
//! blur -> threshold -> contour tracing -> marker filtering ->
//! pixel-to-data mapping.
//!
//! Everything operates on in-memory images. The `*_file` helpers are
//! thin wrappers that go through [`source::open_grayscale`], the only
//! function here that touches the filesystem.

pub mod blob;
pub mod blur;
pub mod bounds;
pub mod calibration;
pub mod config;
pub mod contour;
pub mod edge;
pub mod lines;
pub mod source;
pub mod stats;
pub mod threshold;
pub mod types;

use std::path::Path;

use serde::Serialize;

pub use blob::{BlobFilter, Rejection};
pub use bounds::{BoundsResolution, Side};
pub use calibration::{AxisCalibration, AxisRanges, BoundsOrigin, Calibration};
pub use config::{LineConfig, PipelineConfig};
pub use contour::{Contour, ContourTracer, ContourTracerKind};
pub use stats::{Statistics, compute_statistics};
pub use types::{
    DataPoint, DegenerateAxis, Dimensions, GrayImage, PipelineError, PixelPoint, PixelRect,
};

/// Everything one extraction run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Mapped markers, in contour discovery order.
    pub points: Vec<DataPoint>,
    /// The calibration the points were mapped with.
    pub calibration: Calibration,
    /// Source image size.
    pub dimensions: Dimensions,
}

/// Run the full extraction on a grayscale image.
///
/// # Pipeline steps
///
/// 1. Calibrate: manual `config.plot_bounds`, or frame detection
///    (Canny, Hough segments, side windows, margin fallback)
/// 2. Blur, threshold and trace marker contours
/// 3. Filter contours by area, circularity and the calibrated rectangle
/// 4. Map each centroid into data space
///
/// Finding no markers is not an error: the result has no points.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if an axis range is not
/// finite, and [`PipelineError::DegenerateCalibration`] if the plot
/// rectangle or an axis range has zero extent. No partial result is
/// returned in either case.
pub fn extract(
    gray: &GrayImage,
    ranges: &AxisRanges,
    config: &PipelineConfig,
) -> Result<Extraction, PipelineError> {
    ranges.validate()?;

    let calibration = calibration::calibrate(gray, ranges, config.plot_bounds, &config.lines);
    calibration.calibration.validate()?;
    let rect = calibration.calibration.pixels;

    let pixels = blob::detect_markers(gray, config, Some(rect));
    let points = pixels
        .into_iter()
        .map(|p| calibration.calibration.to_data_point(p))
        .collect::<Result<Vec<_>, _>>()?;

    let detected =
        matches!(&calibration.origin, BoundsOrigin::Resolved(r) if r.is_fully_detected());
    tracing::info!(
        ?rect,
        fully_detected = detected,
        points = points.len(),
        "extraction complete"
    );

    Ok(Extraction {
        points,
        calibration,
        dimensions: Dimensions::of(gray),
    })
}

/// [`extract`] on an image file.
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoad`] if the file cannot be read or
/// decoded, otherwise the errors of [`extract`].
pub fn extract_file(
    path: &Path,
    ranges: &AxisRanges,
    config: &PipelineConfig,
) -> Result<Extraction, PipelineError> {
    let gray = source::open_grayscale(path)?;
    extract(&gray, ranges, config)
}

/// Resolve the plot rectangle of an image file.
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoad`] if the file cannot be read or
/// decoded.
pub fn detect_plot_bounds_file(
    path: &Path,
    config: &LineConfig,
) -> Result<BoundsResolution, PipelineError> {
    let gray = source::open_grayscale(path)?;
    Ok(bounds::detect_plot_bounds(&gray, config))
}

/// Detect marker centroids in an image file, optionally restricted to
/// `bounds`.
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoad`] if the file cannot be read or
/// decoded.
pub fn detect_points_file(
    path: &Path,
    config: &PipelineConfig,
    bounds: Option<PixelRect>,
) -> Result<Vec<PixelPoint>, PipelineError> {
    let gray = source::open_grayscale(path)?;
    Ok(blob::detect_markers(&gray, config, bounds))
}
