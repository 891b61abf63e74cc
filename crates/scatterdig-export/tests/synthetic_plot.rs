//! Integration test: draw a scatter plot, write it as PNG, run the full
//! pipeline from the file and export the points to CSV and JSON.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use image::{GrayImage, ImageFormat, Luma};
use scatterdig_pipeline::{AxisRanges, PipelineConfig, PixelRect};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// Frame stroke corners: left, top, right, bottom.
const FRAME: (u32, u32, u32, u32) = (90, 70, 560, 400);

const MARKERS: [(u32, u32); 5] = [(150, 350), (220, 300), (300, 240), (380, 180), (470, 120)];

/// White canvas, gray 2px frame, black disks of radius 5 rising left to
/// right.
fn draw_plot() -> GrayImage {
    let (left, top, right, bottom) = FRAME;
    GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let column = [left, left + 1, right, right + 1].contains(&x);
        let row = [top, top + 1, bottom, bottom + 1].contains(&y);
        let on_frame = (column && (top..=bottom + 1).contains(&y))
            || (row && (left..=right + 1).contains(&x));
        let in_marker = MARKERS.iter().any(|&(cx, cy)| {
            let dx = f64::from(x) - (f64::from(cx) + 0.5);
            let dy = f64::from(y) - (f64::from(cy) + 0.5);
            dx.hypot(dy) <= 5.0
        });
        if in_marker {
            Luma([0])
        } else if on_frame {
            Luma([90])
        } else {
            Luma([255])
        }
    })
}

fn write_png(name: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    draw_plot()
        .save_with_format(&path, ImageFormat::Png)
        .expect("PNG should be writable");
    path
}

#[test]
fn synthetic_plot_to_csv_and_json() {
    let path = write_png("scatterdig-synthetic-plot.png");
    let ranges = AxisRanges::new(0.0, 100.0, 0.0, 50.0);

    let result = scatterdig_pipeline::extract_file(&path, &ranges, &PipelineConfig::default())
        .expect("extraction should succeed");
    eprintln!(
        "bounds {:?}, {} points",
        result.calibration.calibration.pixels,
        result.points.len()
    );
    assert_eq!(result.points.len(), MARKERS.len(), "{:?}", result.points);

    // Markers rise left to right, so x and y should correlate strongly.
    let stats = scatterdig_pipeline::compute_statistics(&result.points);
    assert_eq!(stats.count, MARKERS.len());
    assert!(stats.correlation > 0.95, "{stats:?}");

    let csv = scatterdig_export::to_csv(&result.points).unwrap();
    assert_eq!(csv.lines().count(), MARKERS.len() + 1);
    assert!(csv.starts_with("pixel_x,pixel_y,x,y\n"));

    let json = scatterdig_export::to_json(&result.points).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), MARKERS.len());
    for (value, point) in parsed.iter().zip(&result.points) {
        assert_eq!(value["pixel_x"], point.pixel_x);
        assert_eq!(value["x"], point.data_x);
    }
}

#[test]
fn manual_bounds_give_exact_data_values() {
    let path = write_png("scatterdig-manual-bounds.png");
    // Plot area 100..500 x 100..400 maps onto x 0..40, y 0..30, so one
    // pixel is 0.1 data units and every marker lands near a whole value.
    let config = PipelineConfig {
        plot_bounds: Some(PixelRect::new(100, 100, 500, 400)),
        ..PipelineConfig::default()
    };
    let ranges = AxisRanges::new(0.0, 40.0, 0.0, 30.0);
    let result = scatterdig_pipeline::extract_file(&path, &ranges, &config).unwrap();

    // (150, 350) -> (5.0, 5.0); (470, 120) -> (37.0, 28.0).
    assert_eq!(result.points.len(), MARKERS.len());
    let near = |x: f64, y: f64| {
        result
            .points
            .iter()
            .any(|p| (p.data_x - x).abs() <= 0.5 && (p.data_y - y).abs() <= 0.5)
    };
    assert!(near(5.0, 5.0), "{:?}", result.points);
    assert!(near(37.0, 28.0), "{:?}", result.points);
}

#[test]
fn unreadable_file_reports_path() {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("does-not-exist.png");
    let err = scatterdig_pipeline::extract_file(
        &path,
        &AxisRanges::new(0.0, 1.0, 0.0, 1.0),
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Could not load image: "));
}
