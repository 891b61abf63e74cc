//! Canny edge detection for axis-frame discovery.
//!
//! Wraps [`imageproc::edges::canny`]. Returns a binary image where white
//! pixels (255) are edges and black pixels (0) are background; the Hough
//! stage in [`crate::lines`] votes with every non-zero pixel.

use image::GrayImage;

/// Minimum allowed Canny threshold.
///
/// A zero low threshold marks every pixel with any gradient as a
/// candidate edge, and the Hough accumulator then fills with spurious
/// diagonal lines through anti-aliasing noise.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Detect edges using the Canny algorithm.
///
/// Both thresholds are clamped to at least [`MIN_THRESHOLD`] and
/// `low_threshold` is clamped to at most `high_threshold`.
#[must_use = "returns the binary edge map"]
pub fn canny(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let high = high_threshold.max(MIN_THRESHOLD);
    let low = low_threshold.max(MIN_THRESHOLD).min(high);
    imageproc::edges::canny(image, low, high)
}

/// Number of edge pixels in a binary edge map.
#[must_use]
pub fn edge_pixel_count(edges: &GrayImage) -> u64 {
    edges.pixels().map(|p| u64::from(p.0[0] > 0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 40x40 white image with a 2px black vertical axis line at x = 20.
    fn axis_line_image() -> GrayImage {
        GrayImage::from_fn(40, 40, |x, _y| {
            if x == 20 || x == 21 {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    #[test]
    fn blank_image_produces_no_edges() {
        let img = GrayImage::from_fn(20, 20, |_, _| image::Luma([255]));
        let edges = canny(&img, 50.0, 150.0);
        assert_eq!(edges.dimensions(), (20, 20));
        assert_eq!(edge_pixel_count(&edges), 0);
    }

    #[test]
    fn axis_line_produces_edges_beside_it() {
        let edges = canny(&axis_line_image(), 50.0, 150.0);
        assert!(edge_pixel_count(&edges) > 0);
        // Edges hug the line; far columns stay clear.
        for y in 0..40 {
            assert_eq!(edges.get_pixel(5, y).0[0], 0);
            assert_eq!(edges.get_pixel(35, y).0[0], 0);
        }
    }

    #[test]
    fn zero_low_threshold_is_clamped_to_min() {
        let img = axis_line_image();
        assert_eq!(canny(&img, 0.0, 150.0), canny(&img, MIN_THRESHOLD, 150.0));
    }

    #[test]
    fn low_above_high_is_clamped() {
        let img = axis_line_image();
        assert_eq!(canny(&img, 200.0, 100.0), canny(&img, 100.0, 100.0));
    }
}
