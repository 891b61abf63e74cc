//! Plot-bounds resolution: find the pixel rectangle of the axes frame.
//!
//! Line segments from [`crate::lines`] are classified as near-vertical
//! or near-horizontal, then each frame side is chosen from the lines
//! lying in a window near that image edge. Real plots put their border
//! lines close to the image edges but offset from them, so restricting
//! the search window rejects interior gridlines and rows of markers
//! that happen to line up.
//!
//! Resolution never fails. Without usable evidence the rectangle falls
//! back to a fixed [`MARGIN`] inset, and [`BoundsResolution`] records
//! which path produced it.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::LineConfig;
use crate::edge;
use crate::lines;
use crate::types::{Dimensions, LineSegment, PixelRect};

/// Inset used for any side that has no line evidence.
pub const MARGIN: i32 = 50;

/// A segment whose endpoints differ by less than this many pixels along
/// one axis counts as parallel to the other axis.
pub const AXIS_ALIGNMENT_TOLERANCE: f64 = 10.0;

/// Candidates closer than this to the image edge are treated as the
/// image border, not the plot frame.
pub const EDGE_EXCLUSION: f64 = 20.0;

/// Fraction of the image extent searched for the left/top side; the
/// right/bottom windows mirror it.
pub const SIDE_WINDOW: f64 = 0.3;

/// One side of the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// How a plot rectangle was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsResolution {
    /// Both vertical and horizontal lines were found.
    Detected {
        /// The resolved rectangle.
        rect: PixelRect,
        /// Sides whose search window was empty and which took the
        /// margin value instead. Empty when every side was detected.
        margin_sides: Vec<Side>,
    },
    /// No vertical or no horizontal lines at all; the whole rectangle is
    /// the margin inset.
    MarginFallback(PixelRect),
}

impl BoundsResolution {
    /// The resolved rectangle, whichever branch produced it.
    #[must_use]
    pub const fn rect(&self) -> PixelRect {
        match self {
            Self::Detected { rect, .. } | Self::MarginFallback(rect) => *rect,
        }
    }

    /// Whether every side came from line evidence.
    #[must_use]
    pub fn is_fully_detected(&self) -> bool {
        matches!(self, Self::Detected { margin_sides, .. } if margin_sides.is_empty())
    }
}

/// The margin rectangle `(50, 50, width - 50, height - 50)`.
///
/// An extent of 100 px or less cannot fit two full margins, so its inset
/// shrinks to `(extent - 1) / 2`. The rectangle then stays inside the
/// image and upright, collapsing to zero span only for an empty image.
#[must_use]
pub fn margin_rect(dimensions: Dimensions) -> PixelRect {
    let (w, h) = signed_dimensions(dimensions);
    let (x_inset, y_inset) = (margin_inset(w), margin_inset(h));
    PixelRect::new(x_inset, y_inset, w - x_inset, h - y_inset)
}

const fn margin_inset(extent: i32) -> i32 {
    let half = extent.saturating_sub(1) / 2;
    if half < MARGIN { half } else { MARGIN }
}

/// Resolve the plot rectangle from line segments.
///
/// A segment is vertical when `|Δx| < 10`, otherwise horizontal when
/// `|Δy| < 10`, otherwise ignored. Its fixed coordinate is the start
/// endpoint's x (vertical) or y (horizontal).
///
/// Side windows are open intervals:
///
/// | side   | candidates                         | pick |
/// |--------|------------------------------------|------|
/// | left   | vertical x in (20, 0.3·w)          | min  |
/// | right  | vertical x in (0.7·w, w − 20)      | max  |
/// | top    | horizontal y in (20, 0.3·h)        | min  |
/// | bottom | horizontal y in (0.7·h, h − 20)    | max  |
#[must_use]
pub fn resolve_plot_bounds(segments: &[LineSegment], dimensions: Dimensions) -> BoundsResolution {
    let (vertical, horizontal) = classify(segments);
    let fallback = margin_rect(dimensions);

    if vertical.is_empty() || horizontal.is_empty() {
        tracing::warn!(
            vertical = vertical.len(),
            horizontal = horizontal.len(),
            "no usable frame lines, using margin bounds"
        );
        return BoundsResolution::MarginFallback(fallback);
    }

    let w = f64::from(dimensions.width);
    let h = f64::from(dimensions.height);
    let low_window = |extent: f64| (EDGE_EXCLUSION, SIDE_WINDOW * extent);
    let high_window = |extent: f64| ((1.0 - SIDE_WINDOW) * extent, extent - EDGE_EXCLUSION);

    let mut margin_sides = Vec::new();
    let mut resolve_side = |side: Side, values: &[f64], window: (f64, f64), pick: Pick, margin| {
        select(values, window, pick).unwrap_or_else(|| {
            margin_sides.push(side);
            margin
        })
    };

    let x_min = resolve_side(Side::Left, &vertical, low_window(w), Pick::Min, fallback.x_min);
    let x_max = resolve_side(Side::Right, &vertical, high_window(w), Pick::Max, fallback.x_max);
    let y_min = resolve_side(Side::Top, &horizontal, low_window(h), Pick::Min, fallback.y_min);
    let y_max = resolve_side(Side::Bottom, &horizontal, high_window(h), Pick::Max, fallback.y_max);

    let rect = PixelRect::new(x_min, y_min, x_max, y_max);
    tracing::debug!(?rect, ?margin_sides, "plot bounds resolved from lines");
    BoundsResolution::Detected { rect, margin_sides }
}

/// Detect the plot rectangle directly from a grayscale image.
///
/// Runs Canny, extracts segments, and resolves them. An image with no
/// pixels goes straight to the margin fallback.
#[must_use]
pub fn detect_plot_bounds(gray: &GrayImage, config: &LineConfig) -> BoundsResolution {
    let dimensions = Dimensions::of(gray);
    if dimensions.width == 0 || dimensions.height == 0 {
        tracing::warn!(?dimensions, "empty image, using margin bounds");
        return BoundsResolution::MarginFallback(margin_rect(dimensions));
    }
    let edges = edge::canny(gray, config.canny_low, config.canny_high);
    tracing::debug!(
        edge_pixels = edge::edge_pixel_count(&edges),
        "edge map computed"
    );
    let segments = lines::detect_segments(&edges, &config.segments);
    resolve_plot_bounds(&segments, dimensions)
}

#[derive(Clone, Copy)]
enum Pick {
    Min,
    Max,
}

/// Split segments into fixed x-values of vertical lines and fixed
/// y-values of horizontal lines.
fn classify(segments: &[LineSegment]) -> (Vec<f64>, Vec<f64>) {
    let mut vertical = Vec::new();
    let mut horizontal = Vec::new();
    for s in segments {
        if (s.end.x - s.start.x).abs() < AXIS_ALIGNMENT_TOLERANCE {
            vertical.push(s.start.x);
        } else if (s.end.y - s.start.y).abs() < AXIS_ALIGNMENT_TOLERANCE {
            horizontal.push(s.start.y);
        }
    }
    (vertical, horizontal)
}

/// Pick the extreme value strictly inside `(low, high)`, truncated to
/// a pixel index.
#[allow(clippy::cast_possible_truncation)]
fn select(values: &[f64], (low, high): (f64, f64), pick: Pick) -> Option<i32> {
    let inside = values.iter().copied().filter(|&v| low < v && v < high);
    let chosen = match pick {
        Pick::Min => inside.reduce(f64::min),
        Pick::Max => inside.reduce(f64::max),
    }?;
    Some(chosen as i32)
}

#[allow(clippy::cast_possible_wrap)]
const fn signed_dimensions(dimensions: Dimensions) -> (i32, i32) {
    // Raster dimensions beyond i32::MAX are not decodable in practice.
    (dimensions.width as i32, dimensions.height as i32)
}
