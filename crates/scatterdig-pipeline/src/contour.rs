//! Contour extraction and polygon shape measures.
//!
//! This module defines the [`ContourTracer`] trait for pluggable contour
//! retrieval and the [`ContourTracerKind`] enum for selecting one at
//! runtime, plus the [`Contour`] polygon the blob filters measure.
//!
//! Area, perimeter and moments are computed on the traced polygon
//! (vertices at pixel centres), not by counting mask pixels. A filled
//! 5x5 square therefore has area 16, perimeter 16.

use std::f64::consts::PI;

use image::GrayImage;
use imageproc::contours::BorderType;
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Raw polygon moments up to first order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Zeroth moment: the enclosed area.
    pub m00: f64,
    /// First moment about the y-axis (Σ x over the interior).
    pub m10: f64,
    /// First moment about the x-axis (Σ y over the interior).
    pub m01: f64,
}

/// A closed polygon traced around one foreground component.
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    /// Create a contour from its vertices in traversal order.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Iterate over the closed edges `(p_i, p_{i+1})`, wrapping at the end.
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let next = self.0.iter().cycle().skip(1);
        self.0.iter().copied().zip(next.copied())
    }

    /// Enclosed area (shoelace formula), always non-negative.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Closed arc length in pixels.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Polygon moments by Green's theorem, normalized so that `m00 >= 0`
    /// whatever the traversal direction.
    #[must_use]
    pub fn moments(&self) -> Moments {
        let (mut a, mut ax, mut ay) = (0.0, 0.0, 0.0);
        for (p, q) in self.edges() {
            let cross = p.x.mul_add(q.y, -(q.x * p.y));
            a += cross;
            ax += (p.x + q.x) * cross;
            ay += (p.y + q.y) * cross;
        }
        let sign = if a < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a / 2.0,
            m10: sign * ax / 6.0,
            m01: sign * ay / 6.0,
        }
    }

    /// Shape regularity, or `None` for a zero-perimeter contour.
    #[must_use]
    pub fn circularity(&self) -> Option<f64> {
        let perimeter = self.perimeter();
        (perimeter > 0.0).then(|| circularity(self.area(), perimeter))
    }
}

/// `4π·area / perimeter²`: 1.0 for a perfect circle, lower for
/// elongated or ragged shapes.
#[must_use]
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    4.0 * PI * area / (perimeter * perimeter)
}

/// Selects which contours are retrieved from a binary mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContourTracerKind {
    /// Outer border of every foreground component, however deeply it
    /// sits inside holes of other components. Markers drawn inside a
    /// closed plot frame are found.
    #[default]
    OuterBorders,

    /// Outer borders of top-level components only. A marker inside a
    /// closed frame is hidden by the frame.
    External,
}

/// Trait for contour retrieval strategies.
///
/// Input: a binary mask (non-zero = foreground).
/// Output: contours in discovery order (raster scan of each border's
/// first pixel).
pub trait ContourTracer {
    /// Trace contours in the given binary mask.
    fn trace(&self, mask: &GrayImage) -> Vec<Contour>;
}

impl ContourTracer for ContourTracerKind {
    fn trace(&self, mask: &GrayImage) -> Vec<Contour> {
        let top_level_only = matches!(self, Self::External);
        imageproc::contours::find_contours::<i32>(mask)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .filter(|c| !top_level_only || c.parent.is_none())
            .map(|c| {
                Contour::new(
                    c.points
                        .into_iter()
                        .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                        .collect(),
                )
            })
            .collect()
    }
}
