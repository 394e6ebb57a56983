//! puncta-quant: batch aggregation quantification for microscopy images.
//!
//! Processes every supported image in a directory with configurable
//! thresholding parameters, printing per-file progress to stderr and
//! writing a CSV results table. Useful for:
//!
//! - Quantifying aggregate enrichment (partition coefficient) across a
//!   condition's worth of images
//! - Tuning k-values, smoothing sigma, and dilation against a known
//!   dataset
//!
//! A file whose channels cannot be extracted (missing channel index,
//! decode failure) is skipped with a message; the batch continues.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin puncta-quant -- --main-channel 1 --red-channel 0 <DIR>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use puncta_export::MetricsRecord;
use puncta_io::ChannelStack;
use puncta_pipeline::Settings;

/// File extensions the batch loop treats as input images.
const IMAGE_EXTENSIONS: [&str; 5] = ["tif", "tiff", "png", "jpg", "jpeg"];

/// Batch quantification of aggregation metrics from microscopy images.
///
/// Segments each image's main channel into background and aggregate
/// regions, measures the red channel within them, and derives the
/// partition coefficient.
#[derive(Parser)]
#[command(name = "puncta-quant", version)]
struct Cli {
    /// Directory containing the images to quantify.
    dir: PathBuf,

    /// Channel index used for segmentation (background/aggregate masks).
    #[arg(long)]
    main_channel: usize,

    /// Channel index measured within the segmented regions.
    #[arg(long)]
    red_channel: usize,

    /// Lower-threshold multiplier on the standard deviation.
    #[arg(long, default_value_t = Settings::DEFAULT_LOWER_K)]
    lower_k: f64,

    /// Upper-threshold multiplier on the standard deviation.
    #[arg(long, default_value_t = Settings::DEFAULT_UPPER_K)]
    upper_k: f64,

    /// Gaussian smoothing sigma in pixels; 0 disables.
    #[arg(long, default_value_t = Settings::DEFAULT_BLUR_SIGMA)]
    blur: f32,

    /// Mask dilation kernel side length (odd, >= 3); 0 disables.
    #[arg(long, default_value_t = Settings::DEFAULT_DILATE_SIZE)]
    dilate: u32,

    /// Output CSV filename, written inside DIR.
    #[arg(long, default_value = "results.csv")]
    out: String,

    /// Print records as JSON to stdout instead of writing the CSV table.
    #[arg(long)]
    json: bool,

    /// Full settings as a JSON string.
    ///
    /// When provided, the individual parameter flags are ignored. The
    /// JSON must be a valid `Settings` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build [`Settings`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, settings are
/// assembled from the individual flags.
fn settings_from_cli(cli: &Cli) -> Result<Settings, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(Settings {
        lower_k: cli.lower_k,
        upper_k: cli.upper_k,
        blur_sigma: cli.blur,
        dilate_size: cli.dilate,
    })
}

/// Whether `path` has a supported image extension (case-insensitive).
fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Supported image files directly inside `dir`, sorted by path.
fn image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_path(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Decode, slice, and quantify one image file.
fn quantify_file(path: &Path, cli: &Cli, settings: &Settings) -> Result<MetricsRecord, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("read failed: {e}"))?;
    let stack = ChannelStack::decode(&bytes).map_err(|e| e.to_string())?;
    let primary = stack.channel(cli.main_channel).map_err(|e| e.to_string())?;
    let secondary = stack.channel(cli.red_channel).map_err(|e| e.to_string())?;

    let result =
        puncta_pipeline::process(primary, secondary, settings).map_err(|e| e.to_string())?;

    let identifier = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unnamed")
        .to_owned();
    Ok(MetricsRecord::from_result(identifier, &result))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match settings_from_cli(&cli) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let files = match image_files(&cli.dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.dir.display());
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!("No image files found in {}", cli.dir.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Settings: {settings:#?}");
    eprintln!("Files: {}", files.len());

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        eprintln!("Processing {}...", path.display());
        match quantify_file(path, &cli, &settings) {
            Ok(record) => records.push(record),
            Err(msg) => eprintln!("Skipping {}: {msg}", path.display()),
        }
    }

    if records.is_empty() {
        eprintln!("No images were processed successfully");
        return ExitCode::FAILURE;
    }

    if cli.json {
        match serde_json::to_string_pretty(&records) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing records: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let csv = puncta_export::to_csv(&records);
        let out_path = cli.dir.join(&cli.out);
        if let Err(e) = std::fs::write(&out_path, &csv) {
            eprintln!("Error writing {}: {e}", out_path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("Saved: {} ({} rows)", out_path.display(), records.len());
    }

    ExitCode::SUCCESS
}
