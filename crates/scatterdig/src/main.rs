//! scatterdig: extract (x, y) coordinate pairs from scatter-plot images.
//!
//! Locates the plot frame, calibrates it against the axis ranges given
//! on the command line, detects round markers and prints or exports
//! their data coordinates.
//!
//! # Usage
//!
//! ```text
//! scatterdig plot.png --x-min 0 --x-max 50 --y-min 0 --y-max 50 -o data.csv
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use scatterdig_export::ExportFormat;
use scatterdig_pipeline::{
    AxisRanges, ContourTracerKind, DataPoint, Extraction, LineConfig, PipelineConfig, PixelRect,
    Statistics,
};
use tracing_subscriber::EnvFilter;

/// Extract coordinate pairs from a scatter plot image.
#[derive(Parser)]
#[command(name = "scatterdig", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Minimum x-axis value.
    #[arg(long, allow_negative_numbers = true)]
    x_min: f64,

    /// Maximum x-axis value.
    #[arg(long, allow_negative_numbers = true)]
    x_max: f64,

    /// Minimum y-axis value.
    #[arg(long, allow_negative_numbers = true)]
    y_min: f64,

    /// Maximum y-axis value.
    #[arg(long, allow_negative_numbers = true)]
    y_max: f64,

    /// Output file path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Do not print statistics.
    #[arg(long)]
    no_stats: bool,

    /// Binary threshold for point detection (0-255).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Minimum contour area in px².
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MIN_AREA)]
    min_area: u32,

    /// Maximum contour area in px².
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_AREA)]
    max_area: u32,

    /// Minimum circularity (0-1).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MIN_CIRCULARITY)]
    min_circularity: f64,

    /// Manual plot bounds in pixels; skips frame detection.
    #[arg(
        long,
        num_args = 4,
        value_names = ["X_MIN", "Y_MIN", "X_MAX", "Y_MAX"],
        allow_negative_numbers = true
    )]
    bounds: Option<Vec<i32>>,

    /// Gaussian blur sigma before thresholding (0 disables).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_BLUR_SIGMA)]
    blur_sigma: f32,

    /// Canny low threshold for frame detection.
    #[arg(long, default_value_t = LineConfig::DEFAULT_CANNY_LOW)]
    canny_low: f32,

    /// Canny high threshold for frame detection.
    #[arg(long, default_value_t = LineConfig::DEFAULT_CANNY_HIGH)]
    canny_high: f32,

    /// Which marker contours to keep.
    #[arg(long, value_enum, default_value_t = Tracer::OuterBorders)]
    contour_tracer: Tracer,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other detection flags are ignored. The JSON
    /// must be a valid `PipelineConfig` serialization; missing fields
    /// take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Log pipeline stages to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Export format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
        }
    }
}

/// Contour retrieval selection.
#[derive(Clone, Copy, ValueEnum)]
enum Tracer {
    /// Every component's outer border, including markers inside a closed frame.
    OuterBorders,
    /// Top-level components only.
    External,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual detection flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("invalid --config-json: {e}"));
    }

    let plot_bounds = match cli.bounds.as_deref() {
        None => None,
        Some(&[x_min, y_min, x_max, y_max]) => Some(PixelRect::new(x_min, y_min, x_max, y_max)),
        Some(other) => return Err(format!("--bounds takes 4 values, got {}", other.len())),
    };

    Ok(PipelineConfig {
        blur_sigma: cli.blur_sigma,
        threshold: cli.threshold,
        min_area: cli.min_area,
        max_area: cli.max_area,
        min_circularity: cli.min_circularity,
        contour_tracer: match cli.contour_tracer {
            Tracer::OuterBorders => ContourTracerKind::OuterBorders,
            Tracer::External => ContourTracerKind::External,
        },
        lines: LineConfig {
            canny_low: cli.canny_low,
            canny_high: cli.canny_high,
            ..LineConfig::default()
        },
        plot_bounds,
    })
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {msg}");
            return ExitCode::FAILURE;
        }
    };
    let ranges = AxisRanges::new(cli.x_min, cli.x_max, cli.y_min, cli.y_max);
    tracing::debug!(image = %cli.image_path.display(), ?ranges, ?config, "starting extraction");

    let extraction = match scatterdig_pipeline::extract_file(&cli.image_path, &ranges, &config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", bounds_line(&extraction));
    println!();
    println!("Detected {} points", extraction.points.len());

    if !cli.no_stats && !extraction.points.is_empty() {
        let stats = scatterdig_pipeline::compute_statistics(&extraction.points);
        println!();
        println!("{}", stats_report(&stats));
    }

    if let Some(ref output) = cli.output
        && let Err(msg) = export(&extraction.points, cli.format.into(), output)
    {
        eprintln!("Error: {msg}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn export(points: &[DataPoint], format: ExportFormat, output: &Path) -> Result<(), String> {
    let text = format.render(points).map_err(|e| e.to_string())?;
    std::fs::write(output, text)
        .map_err(|e| format!("could not write {}: {e}", output.display()))?;
    println!();
    println!("Data exported to {}", output.display());
    Ok(())
}

fn bounds_line(extraction: &Extraction) -> String {
    let rect = extraction.calibration.calibration.pixels;
    format!(
        "Plot bounds detected: x=[{}, {}], y=[{}, {}]",
        rect.x_min, rect.x_max, rect.y_min, rect.y_max
    )
}

fn stats_report(stats: &Statistics) -> String {
    [
        "Statistics:".to_owned(),
        format!("  Point count: {}", stats.count),
        format!(
            "  X: mean={:.2}, std={:.2}, range=[{:.2}, {:.2}]",
            stats.x_mean, stats.x_std, stats.x_min, stats.x_max
        ),
        format!(
            "  Y: mean={:.2}, std={:.2}, range=[{:.2}, {:.2}]",
            stats.y_mean, stats.y_std, stats.y_min, stats.y_max
        ),
        format!("  Correlation: {:.3}", stats.correlation),
        format!("  Covariance: {:.3}", stats.covariance),
    ]
    .join("\n")
}
