//! Straight-line segment extraction from a binary edge map.
//!
//! `imageproc` offers only the standard Hough transform, which reports
//! infinite lines in polar form. Plot-frame resolution needs finite
//! segments with endpoints (a gridline that crosses the whole image and
//! a short tick mark look identical in polar form), so each detected
//! polar line is walked across the edge map and split into the runs of
//! edge pixels that actually support it.
//!
//! A run ends where the distance between consecutive supporting samples
//! exceeds [`SegmentOptions::max_line_gap`]; runs shorter than
//! [`SegmentOptions::min_line_length`] are dropped.

use image::GrayImage;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use serde::{Deserialize, Serialize};

use crate::types::{LineSegment, Point};

/// Tuning for [`detect_segments`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Minimum Hough accumulator votes for a polar line to be traced.
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in the (r, angle) accumulator.
    pub suppression_radius: u32,
    /// Shortest segment kept, in pixels.
    pub min_line_length: f64,
    /// Largest distance between consecutive supporting samples that
    /// still joins them into one segment, in pixels.
    pub max_line_gap: f64,
}

impl SegmentOptions {
    pub const DEFAULT_VOTE_THRESHOLD: u32 = 100;
    pub const DEFAULT_SUPPRESSION_RADIUS: u32 = 8;
    pub const DEFAULT_MIN_LINE_LENGTH: f64 = 50.0;
    pub const DEFAULT_MAX_LINE_GAP: f64 = 10.0;
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            vote_threshold: Self::DEFAULT_VOTE_THRESHOLD,
            suppression_radius: Self::DEFAULT_SUPPRESSION_RADIUS,
            min_line_length: Self::DEFAULT_MIN_LINE_LENGTH,
            max_line_gap: Self::DEFAULT_MAX_LINE_GAP,
        }
    }
}

/// Detect finite line segments in a binary edge map.
///
/// Non-zero pixels are edges. May legitimately return an empty vector
/// (blank image, no straight structure); callers must handle that.
#[must_use]
pub fn detect_segments(edges: &GrayImage, options: &SegmentOptions) -> Vec<LineSegment> {
    let polar = detect_lines(
        edges,
        LineDetectionOptions {
            vote_threshold: options.vote_threshold,
            suppression_radius: options.suppression_radius,
        },
    );

    let segments: Vec<LineSegment> = polar
        .iter()
        .flat_map(|line| trace_polar_line(edges, line, options))
        .collect();

    tracing::debug!(
        polar_lines = polar.len(),
        segments = segments.len(),
        "line segments extracted"
    );
    segments
}

/// Walk a polar line `x·cos θ + y·sin θ = r` across the edge map and
/// return the supported runs as segments.
///
/// The walk steps one pixel at a time along whichever image axis the
/// line is closer to, so every column (or row) is sampled once.
fn trace_polar_line(
    edges: &GrayImage,
    line: &PolarLine,
    options: &SegmentOptions,
) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let (sin, cos) = f64::from(line.angle_in_degrees).to_radians().sin_cos();
    let r = f64::from(line.r);
    let major_is_x = sin.abs() >= cos.abs();

    let samples: Vec<Point> = if major_is_x {
        (0..width)
            .map(|x| {
                let x = f64::from(x);
                Point::new(x, x.mul_add(-cos, r) / sin)
            })
            .collect()
    } else {
        (0..height)
            .map(|y| {
                let y = f64::from(y);
                Point::new(y.mul_add(-sin, r) / cos, y)
            })
            .collect()
    };

    let mut segments = Vec::new();
    // (first supporting sample, most recent supporting sample)
    let mut run: Option<(Point, Point)> = None;

    for p in samples {
        if !is_supported(edges, p, major_is_x) {
            continue;
        }
        run = match run {
            Some((start, last)) if p.distance(last) <= options.max_line_gap => Some((start, p)),
            Some((start, last)) => {
                push_if_long(&mut segments, start, last, options.min_line_length);
                Some((p, p))
            }
            None => Some((p, p)),
        };
    }
    if let Some((start, last)) = run {
        push_if_long(&mut segments, start, last, options.min_line_length);
    }

    segments
}

fn push_if_long(segments: &mut Vec<LineSegment>, start: Point, end: Point, min_length: f64) {
    let segment = LineSegment::new(start, end);
    if segment.length() >= min_length {
        segments.push(segment);
    }
}

/// Whether an edge pixel lies within one pixel of `p`, measured across
/// the walking direction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn is_supported(edges: &GrayImage, p: Point, major_is_x: bool) -> bool {
    let (width, height) = edges.dimensions();
    let minor = if major_is_x { p.y } else { p.x };
    if !minor.is_finite() {
        return false;
    }
    let centre = minor.round();

    (-1..=1).any(|offset| {
        let m = centre + f64::from(offset);
        let (x, y) = if major_is_x { (p.x, m) } else { (m, p.y) };
        x >= 0.0
            && y >= 0.0
            && x < f64::from(width)
            && y < f64::from(height)
            && edges.get_pixel(x as u32, y as u32).0[0] > 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    fn draw_vertical(img: &mut GrayImage, x: u32, ys: std::ops::Range<u32>) {
        for y in ys {
            img.put_pixel(x, y, image::Luma([255]));
        }
    }

    fn draw_horizontal(img: &mut GrayImage, y: u32, xs: std::ops::Range<u32>) {
        for x in xs {
            img.put_pixel(x, y, image::Luma([255]));
        }
    }

    #[test]
    fn blank_edge_map_has_no_segments() {
        let segments = detect_segments(&blank(200, 200), &SegmentOptions::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn vertical_edge_becomes_one_segment() {
        let mut img = blank(200, 200);
        draw_vertical(&mut img, 40, 20..180);
        let segments = detect_segments(&img, &SegmentOptions::default());

        assert!(!segments.is_empty(), "expected a segment for the vertical edge");
        for s in &segments {
            assert!((s.start.x - 40.0).abs() < 1.5 && (s.end.x - 40.0).abs() < 1.5);
            assert!(s.length() >= 130.0, "segment too short: {s:?}");
        }
    }

    #[test]
    fn horizontal_edge_becomes_one_segment() {
        let mut img = blank(200, 200);
        draw_horizontal(&mut img, 150, 10..190);
        let segments = detect_segments(&img, &SegmentOptions::default());

        assert!(!segments.is_empty());
        for s in &segments {
            assert!((s.start.y - 150.0).abs() < 1.5 && (s.end.y - 150.0).abs() < 1.5);
        }
    }

    #[test]
    fn wide_gap_splits_segment() {
        let line = PolarLine {
            r: 60.0,
            angle_in_degrees: 0,
        };
        let mut img = blank(200, 200);
        draw_vertical(&mut img, 60, 0..80);
        draw_vertical(&mut img, 60, 120..200);

        let segments = trace_polar_line(&img, &line, &SegmentOptions::default());
        assert_eq!(segments.len(), 2, "got {segments:?}");
        assert!((segments[0].end.y - 79.0).abs() < f64::EPSILON);
        assert!((segments[1].start.y - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn narrow_gap_is_bridged() {
        let line = PolarLine {
            r: 60.0,
            angle_in_degrees: 0,
        };
        let mut img = blank(200, 200);
        draw_vertical(&mut img, 60, 0..80);
        draw_vertical(&mut img, 60, 85..200);

        let segments = trace_polar_line(&img, &line, &SegmentOptions::default());
        assert_eq!(segments.len(), 1);
        assert!((segments[0].length() - 199.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_runs_are_dropped() {
        let line = PolarLine {
            r: 30.0,
            angle_in_degrees: 90,
        };
        let mut img = blank(200, 200);
        draw_horizontal(&mut img, 30, 10..40);

        let segments = trace_polar_line(&img, &line, &SegmentOptions::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn one_pixel_offset_still_supports_line() {
        let line = PolarLine {
            r: 60.0,
            angle_in_degrees: 0,
        };
        let mut img = blank(100, 100);
        draw_vertical(&mut img, 61, 0..100);

        let segments = trace_polar_line(&img, &line, &SegmentOptions::default());
        assert_eq!(segments.len(), 1);
    }
}
