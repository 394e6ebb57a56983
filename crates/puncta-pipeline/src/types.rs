//! Shared types for the puncta quantification pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference binary masks
/// without depending on `image` directly.
pub use image::GrayImage;

/// A single fluorescence channel at one timepoint: rows × columns of
/// real-valued intensity samples.
///
/// Inputs are never mutated by the pipeline; smoothing operates on a copy.
pub type ChannelImage = image::ImageBuffer<image::Luma<f32>, Vec<f32>>;

/// A region mask with the same shape as its source channel.
///
/// Binary convention: 0 = outside the region, 255 = inside. Matches the
/// output of [`imageproc::morphology::dilate`], which the dilation stage
/// feeds masks through.
pub type MaskImage = GrayImage;

/// Configuration for the quantification pipeline.
///
/// Values are caller-supplied; beyond the disabling sentinels (0) no range
/// validation is performed. In particular `upper_k < lower_k` is not
/// rejected even though it typically inverts the intended
/// aggregate-within-background relationship; choosing sensible k-values
/// is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Multiplier on the standard deviation for the lower (background)
    /// threshold: `lower = mean + lower_k * std`.
    pub lower_k: f64,

    /// Multiplier on the standard deviation for the upper (aggregate)
    /// threshold: `upper = mean + upper_k * std`.
    pub upper_k: f64,

    /// Gaussian smoothing sigma in pixels, applied to the primary channel
    /// before thresholding. Non-positive values disable smoothing.
    pub blur_sigma: f32,

    /// Side length of the square structuring element used to dilate both
    /// masks. Odd values >= 3 enable dilation; 0 or even values disable it
    /// silently.
    pub dilate_size: u32,
}

impl Settings {
    /// Default lower-threshold multiplier.
    pub const DEFAULT_LOWER_K: f64 = 0.25;
    /// Default upper-threshold multiplier.
    pub const DEFAULT_UPPER_K: f64 = 0.20;
    /// Default smoothing sigma (disabled).
    pub const DEFAULT_BLUR_SIGMA: f32 = 0.0;
    /// Default dilation kernel size (disabled).
    pub const DEFAULT_DILATE_SIZE: u32 = 0;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lower_k: Self::DEFAULT_LOWER_K,
            upper_k: Self::DEFAULT_UPPER_K,
            blur_sigma: Self::DEFAULT_BLUR_SIGMA,
            dilate_size: Self::DEFAULT_DILATE_SIZE,
        }
    }
}

/// Region masks derived from one primary-channel image, with the thresholds
/// that produced them carried alongside for diagnostics.
///
/// The aggregate mask is not enforced to be a subset of the background
/// mask; with typical settings (`upper_k < lower_k` is the inverted case)
/// it is one by construction, but the pipeline never checks.
#[derive(Debug, Clone)]
pub struct RegionMasks {
    /// Pixels strictly above the lower threshold.
    pub background: MaskImage,

    /// Pixels strictly above the upper threshold; intended to capture a
    /// bright sub-region of the background.
    pub aggregate: MaskImage,

    /// The lower threshold: `mean + lower_k * std`.
    pub lower_threshold: f64,

    /// The upper threshold: `mean + upper_k * std`.
    pub upper_threshold: f64,
}

/// Mean intensities for the named measurement stages.
///
/// Every field may be NaN: an empty region (or one whose samples are all
/// non-finite) has no measurable mean, and NaN is the valid encoding of
/// that outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityMetrics {
    /// Whole-image mean of the primary channel.
    pub unedited: f64,

    /// Primary-channel mean within the background mask.
    pub background_removed: f64,

    /// Primary-channel mean within the aggregate mask.
    pub aggregates: f64,

    /// Secondary-channel mean within the aggregate mask.
    pub red_aggregates: f64,

    /// Secondary-channel mean within the cytoplasm
    /// (background AND NOT aggregate).
    pub red_cytoplasm: f64,
}

/// Result of running the full quantification pipeline on one image pair.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Masks derived from the primary channel, plus their thresholds.
    pub masks: RegionMasks,

    /// Mean intensities for the named measurement stages.
    pub metrics: IntensityMetrics,

    /// Ratio of `red_aggregates` to `red_cytoplasm`, or NaN when the
    /// denominator is zero or non-finite.
    pub partition_coefficient: f64,
}

/// Errors that can occur during pipeline processing.
///
/// Numeric edge cases (empty regions, non-finite samples, zero
/// denominators) never error; they resolve to NaN. The only failure the
/// core can report is a structural one: images and masks whose shapes
/// disagree.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The secondary image or a mask does not match the primary image's
    /// dimensions.
    #[error("image dimensions do not match: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Dimensions of the primary image, `(width, height)`.
        expected: (u32, u32),
        /// Dimensions of the mismatched input, `(width, height)`.
        actual: (u32, u32),
    },
}
