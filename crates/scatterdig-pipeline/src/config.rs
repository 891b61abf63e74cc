//! Run configuration.
//!
//! Detection thresholds depend on the contrast and noise of each image,
//! so they are explicit inputs rather than anything the pipeline tunes
//! by itself. Values are validated by type only; out-of-range settings
//! simply produce fewer (or no) detections.

use serde::{Deserialize, Serialize};

use crate::blob::BlobFilter;
use crate::contour::ContourTracerKind;
use crate::lines::SegmentOptions;
use crate::types::PixelRect;

/// Edge and line settings used to find the plot frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Canny low threshold.
    pub canny_low: f32,
    /// Canny high threshold.
    pub canny_high: f32,
    /// Hough and segment-walking options.
    pub segments: SegmentOptions,
}

impl LineConfig {
    pub const DEFAULT_CANNY_LOW: f32 = 50.0;
    pub const DEFAULT_CANNY_HIGH: f32 = 150.0;
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            canny_low: Self::DEFAULT_CANNY_LOW,
            canny_high: Self::DEFAULT_CANNY_HIGH,
            segments: SegmentOptions::default(),
        }
    }
}

/// Configuration for one extraction run.
///
/// Axis ranges are not part of this struct: they have no sensible
/// default and are passed to [`crate::extract`] separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gaussian sigma applied before marker thresholding.
    pub blur_sigma: f32,

    /// Gray level at or below which a pixel counts as marker ink.
    pub threshold: u8,

    /// Smallest accepted marker area in px².
    pub min_area: u32,

    /// Largest accepted marker area in px².
    pub max_area: u32,

    /// Smallest accepted circularity, `4π·area / perimeter²`.
    pub min_circularity: f64,

    /// Which marker contours are retrieved from the binary mask.
    pub contour_tracer: ContourTracerKind,

    /// Frame detection settings. Unused when `plot_bounds` is set.
    pub lines: LineConfig,

    /// Manual plot rectangle; skips frame detection entirely.
    pub plot_bounds: Option<PixelRect>,
}

impl PipelineConfig {
    pub const DEFAULT_BLUR_SIGMA: f32 = crate::blur::MARKER_BLUR_SIGMA;
    pub const DEFAULT_THRESHOLD: u8 = 80;
    pub const DEFAULT_MIN_AREA: u32 = 5;
    pub const DEFAULT_MAX_AREA: u32 = 600;
    pub const DEFAULT_MIN_CIRCULARITY: f64 = 0.3;

    /// The blob filter these settings describe.
    #[must_use]
    pub fn blob_filter(&self) -> BlobFilter {
        BlobFilter {
            min_area: f64::from(self.min_area),
            max_area: f64::from(self.max_area),
            min_circularity: self.min_circularity,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_sigma: Self::DEFAULT_BLUR_SIGMA,
            threshold: Self::DEFAULT_THRESHOLD,
            min_area: Self::DEFAULT_MIN_AREA,
            max_area: Self::DEFAULT_MAX_AREA,
            min_circularity: Self::DEFAULT_MIN_CIRCULARITY,
            contour_tracer: ContourTracerKind::default(),
            lines: LineConfig::default(),
            plot_bounds: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert!((config.blur_sigma - 1.1).abs() < f32::EPSILON);
        assert_eq!(config.threshold, 80);
        assert_eq!(config.min_area, 5);
        assert_eq!(config.max_area, 600);
        assert!((config.min_circularity - 0.3).abs() < f64::EPSILON);
        assert!((config.lines.canny_low - 50.0).abs() < f32::EPSILON);
        assert!((config.lines.canny_high - 150.0).abs() < f32::EPSILON);
        assert_eq!(config.lines.segments.vote_threshold, 100);
        assert!((config.lines.segments.min_line_length - 50.0).abs() < f64::EPSILON);
        assert!((config.lines.segments.max_line_gap - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.contour_tracer, ContourTracerKind::OuterBorders);
        assert!(config.plot_bounds.is_none());
    }

    #[test]
    fn blob_filter_carries_thresholds() {
        let config = PipelineConfig {
            min_area: 12,
            max_area: 90,
            min_circularity: 0.6,
            ..PipelineConfig::default()
        };
        let filter = config.blob_filter();
        assert!((filter.min_area - 12.0).abs() < f64::EPSILON);
        assert!((filter.max_area - 90.0).abs() < f64::EPSILON);
        assert!((filter.min_circularity - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "threshold": 120,
            "plot_bounds": {"x_min": 10, "y_min": 20, "x_max": 300, "y_max": 200}
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold, 120);
        assert_eq!(config.plot_bounds, Some(PixelRect::new(10, 20, 300, 200)));
        assert_eq!(config.min_area, PipelineConfig::DEFAULT_MIN_AREA);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            blur_sigma: 0.0,
            threshold: 60,
            min_area: 3,
            max_area: 1000,
            min_circularity: 0.75,
            contour_tracer: ContourTracerKind::External,
            lines: LineConfig {
                canny_low: 30.0,
                canny_high: 90.0,
                segments: SegmentOptions {
                    vote_threshold: 60,
                    ..SegmentOptions::default()
                },
            },
            plot_bounds: Some(PixelRect::new(40, 30, 560, 370)),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
