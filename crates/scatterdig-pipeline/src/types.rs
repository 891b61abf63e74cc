//! Shared types for the scatterdig pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can hand decoded rasters
/// to the pipeline without depending on `image` directly.
pub use image::GrayImage;

/// An integer pixel location (x grows rightward, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Column, in pixels from the left edge.
    pub x: i32,
    /// Row, in pixels from the top edge.
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A 2D point with floating-point image coordinates.
///
/// Contour vertices and line endpoints live in this space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// A straight line segment between two pixel endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl LineSegment {
    /// Create a segment from its endpoints.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Segment length in pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of a grayscale raster.
    #[must_use]
    pub fn of(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// An inclusive pixel rectangle, `x_min..=x_max` by `y_min..=y_max`.
///
/// Serialized and parsed in the order `x_min y_min x_max y_max`, the
/// same order users pass manual bounds on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x_min: i32,
    /// Top edge.
    pub y_min: i32,
    /// Right edge.
    pub x_max: i32,
    /// Bottom edge.
    pub y_max: i32,
}

impl PixelRect {
    /// Create a rectangle from its four edges.
    #[must_use]
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Whether `p` lies inside the rectangle or on its border.
    #[must_use]
    pub const fn contains(&self, p: PixelPoint) -> bool {
        self.x_min <= p.x && p.x <= self.x_max && self.y_min <= p.y && p.y <= self.y_max
    }
}

/// A detected marker in both pixel and data space.
///
/// Serializes with the keys `pixel_x`, `pixel_y`, `x`, `y`, which is the
/// column layout shared by every export format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Centroid column in pixels.
    pub pixel_x: i32,
    /// Centroid row in pixels.
    pub pixel_y: i32,
    /// Data-space x, snapped to the nearest 0.5.
    #[serde(rename = "x")]
    pub data_x: f64,
    /// Data-space y, snapped to the nearest 0.5.
    #[serde(rename = "y")]
    pub data_y: f64,
}

/// Which calibration span was found to be zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateAxis {
    /// `pixel_x_max <= pixel_x_min`.
    PixelX,
    /// `pixel_y_max <= pixel_y_min`.
    PixelY,
    /// `x_max == x_min`.
    DataX,
    /// `y_max == y_min`.
    DataY,
}

impl std::fmt::Display for DegenerateAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self {
            Self::PixelX => "pixel x span must be positive",
            Self::PixelY => "pixel y span must be positive",
            Self::DataX => "data x range must not be empty",
            Self::DataY => "data y range must not be empty",
        };
        f.write_str(what)
    }
}

/// Errors that can occur during an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The image file is missing, unreadable, or undecodable.
    #[error("Could not load image: {}", path.display())]
    ImageLoad {
        /// Path the caller asked for.
        path: PathBuf,
        /// Underlying decoder or I/O failure.
        #[source]
        source: image::ImageError,
    },

    /// A calibration span is degenerate; mapping would divide by zero.
    #[error("degenerate calibration: {0}")]
    DegenerateCalibration(DegenerateAxis),

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
