//! Region mask construction from intensity thresholds.
//!
//! The background mask selects pixels strictly above the lower threshold;
//! the aggregate mask selects pixels strictly above the (typically higher)
//! upper threshold, capturing a bright sub-region of the background. An
//! optional Gaussian smoothing pass precedes thresholding and an optional
//! square-kernel binary dilation follows it, both controlled by
//! [`Settings`].
//!
//! The cytoplasm region (background pixels excluding aggregate pixels)
//! is not stored; [`cytoplasm_mask`] derives it on demand.

use image::Luma;
use imageproc::distance_transform::Norm;

use crate::smooth;
use crate::threshold;
use crate::types::{ChannelImage, MaskImage, RegionMasks, Settings};

/// Smallest kernel side length at which dilation is applied.
const MIN_DILATE_SIZE: u32 = 3;

/// Build the background and aggregate masks for a primary-channel image.
///
/// Stages:
///
/// 1. If `settings.blur_sigma > 0`, threshold a Gaussian-smoothed copy
///    instead of the raw image.
/// 2. Compute `(lower, upper)` thresholds from the (possibly smoothed)
///    image statistics.
/// 3. `background = image > lower`, `aggregate = image > upper` -- strict
///    comparisons, so pixels exactly at a threshold are excluded.
/// 4. If `settings.dilate_size` is odd and at least 3, dilate both masks
///    independently with a square structuring element of that side length.
///    Even or smaller values skip dilation silently.
///
/// The returned thresholds describe the smoothed image when smoothing is
/// enabled.
#[must_use]
pub fn make_masks(image: &ChannelImage, settings: &Settings) -> RegionMasks {
    let prepared = smooth::gaussian_smooth(image, settings.blur_sigma);
    let (lower, upper) =
        threshold::compute_thresholds(&prepared, settings.lower_k, settings.upper_k);

    let mut background = threshold_mask(&prepared, lower);
    let mut aggregate = threshold_mask(&prepared, upper);

    if let Some(radius) = dilation_radius(settings.dilate_size) {
        background = imageproc::morphology::dilate(&background, Norm::LInf, radius);
        aggregate = imageproc::morphology::dilate(&aggregate, Norm::LInf, radius);
    }

    RegionMasks {
        background,
        aggregate,
        lower_threshold: lower,
        upper_threshold: upper,
    }
}

/// Background pixels excluding aggregate pixels
/// (`background AND NOT aggregate`).
///
/// Both masks must share dimensions; [`make_masks`] guarantees this for
/// masks it produced.
#[must_use]
pub fn cytoplasm_mask(background: &MaskImage, aggregate: &MaskImage) -> MaskImage {
    debug_assert_eq!(background.dimensions(), aggregate.dimensions());
    MaskImage::from_fn(background.width(), background.height(), |x, y| {
        let in_background = background.get_pixel(x, y).0[0] > 0;
        let in_aggregate = aggregate.get_pixel(x, y).0[0] > 0;
        Luma([if in_background && !in_aggregate { 255 } else { 0 }])
    })
}

/// Pixels strictly above `threshold`.
///
/// Comparisons against a NaN threshold are false, so a NaN-contaminated
/// image produces all-false masks rather than an error.
fn threshold_mask(image: &ChannelImage, threshold: f64) -> MaskImage {
    MaskImage::from_fn(image.width(), image.height(), |x, y| {
        let above = f64::from(image.get_pixel(x, y).0[0]) > threshold;
        Luma([if above { 255 } else { 0 }])
    })
}

/// Structuring-element radius for a kernel of side length `size`, or
/// `None` when dilation is disabled (zero, even, or below
/// [`MIN_DILATE_SIZE`]). Radii beyond `u8::MAX` saturate.
fn dilation_radius(size: u32) -> Option<u8> {
    if size >= MIN_DILATE_SIZE && size % 2 == 1 {
        Some(u8::try_from((size - 1) / 2).unwrap_or(u8::MAX))
    } else {
        None
    }
}
