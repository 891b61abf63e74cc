//! Axis calibration and pixel-to-data mapping.
//!
//! A calibration ties the plot rectangle in pixel space to the axis
//! ranges the caller declares. Pixel rows grow downward while data y
//! grows upward, so the y mapping runs from `y_max` at the top edge to
//! `y_min` at the bottom edge.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::bounds::{self, BoundsResolution};
use crate::config::LineConfig;
use crate::types::{DataPoint, DegenerateAxis, PipelineError, PixelPoint, PixelRect};

/// Data-space extent of both axes, as printed on the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisRanges {
    #[must_use]
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Reject NaN and infinite values.
    ///
    /// Reversed or empty ranges pass here; an empty range is reported by
    /// [`AxisCalibration::pixel_to_data`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first
    /// non-finite field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let fields = [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(PipelineError::InvalidConfig(format!(
                "axis range {name} must be finite, got {v}"
            ))),
            None => Ok(()),
        }
    }
}

/// Immutable pixel-to-data mapping for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibration {
    /// Declared data ranges.
    pub data: AxisRanges,
    /// Plot rectangle in pixels.
    pub pixels: PixelRect,
}

impl AxisCalibration {
    #[must_use]
    pub const fn new(data: AxisRanges, pixels: PixelRect) -> Self {
        Self { data, pixels }
    }

    /// Map a pixel position into data space, snapped to the nearest 0.5.
    ///
    /// ```text
    /// x = x_min + (px - pixel_x_min) / (pixel_x_max - pixel_x_min) * (x_max - x_min)
    /// y = y_max - (py - pixel_y_min) / (pixel_y_max - pixel_y_min) * (y_max - y_min)
    /// ```
    ///
    /// Products and sums round separately (no fused multiply-add), so an
    /// exact quarter value reaches [`round_to_half`] as an exact tie.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DegenerateCalibration`] when a pixel span
    /// is zero or negative, or a data range is empty.
    #[allow(clippy::suboptimal_flops)]
    pub fn pixel_to_data(&self, point: PixelPoint) -> Result<(f64, f64), PipelineError> {
        let (x_span, y_span) = self.pixel_spans()?;
        let data = &self.data;
        let fx = (f64::from(point.x) - f64::from(self.pixels.x_min)) / x_span;
        let fy = (f64::from(point.y) - f64::from(self.pixels.y_min)) / y_span;
        let x = data.x_min + fx * (data.x_max - data.x_min);
        let y = data.y_max - fy * (data.y_max - data.y_min);
        Ok((round_to_half(x), round_to_half(y)))
    }

    /// Map a detected centroid into a [`DataPoint`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::pixel_to_data`].
    pub fn to_data_point(&self, point: PixelPoint) -> Result<DataPoint, PipelineError> {
        let (data_x, data_y) = self.pixel_to_data(point)?;
        Ok(DataPoint {
            pixel_x: point.x,
            pixel_y: point.y,
            data_x,
            data_y,
        })
    }

    /// Check that every span is usable for mapping.
    ///
    /// # Errors
    ///
    /// Same as [`Self::pixel_to_data`].
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.pixel_spans().map(|_| ())
    }

    /// Positive pixel spans, after checking both data ranges are non-empty.
    #[allow(clippy::cast_precision_loss)]
    fn pixel_spans(&self) -> Result<(f64, f64), PipelineError> {
        let p = &self.pixels;
        let x_span = i64::from(p.x_max) - i64::from(p.x_min);
        let y_span = i64::from(p.y_max) - i64::from(p.y_min);
        if x_span <= 0 {
            return Err(PipelineError::DegenerateCalibration(DegenerateAxis::PixelX));
        }
        if y_span <= 0 {
            return Err(PipelineError::DegenerateCalibration(DegenerateAxis::PixelY));
        }
        if self.data.x_max == self.data.x_min {
            return Err(PipelineError::DegenerateCalibration(DegenerateAxis::DataX));
        }
        if self.data.y_max == self.data.y_min {
            return Err(PipelineError::DegenerateCalibration(DegenerateAxis::DataY));
        }
        Ok((x_span as f64, y_span as f64))
    }
}

/// Snap to the nearest multiple of 0.5, ties to even.
#[must_use]
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round_ties_even() / 2.0
}

/// Where the plot rectangle of a calibration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsOrigin {
    /// Supplied by the caller.
    Manual,
    /// Found (or guessed) from the image.
    Resolved(BoundsResolution),
}

/// A calibration together with the provenance of its rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub calibration: AxisCalibration,
    pub origin: BoundsOrigin,
}

/// Build the run's calibration.
///
/// Manual bounds are used as given and skip line detection. Otherwise
/// the frame is detected from `gray`, which always produces a rectangle.
#[must_use]
pub fn calibrate(
    gray: &GrayImage,
    ranges: &AxisRanges,
    manual: Option<PixelRect>,
    lines: &LineConfig,
) -> Calibration {
    let (rect, origin) = match manual {
        Some(rect) => (rect, BoundsOrigin::Manual),
        None => {
            let resolution = bounds::detect_plot_bounds(gray, lines);
            (resolution.rect(), BoundsOrigin::Resolved(resolution))
        }
    };
    tracing::debug!(?rect, ?ranges, "axis calibration");
    Calibration {
        calibration: AxisCalibration::new(*ranges, rect),
        origin,
    }
}
