//! Region-restricted mean intensity.
//!
//! The single aggregation primitive of the pipeline: average an image's
//! samples over a masked region (or the whole image), dropping non-finite
//! samples first. An empty selection has no mean and yields NaN: "no
//! measurable region" is a valid result, not an error.

use crate::types::{ChannelImage, MaskImage};

/// Mean of the finite samples of `image` within `mask`, or over the whole
/// image when `mask` is `None`.
///
/// NaN and infinite samples are dropped before averaging; accumulation is
/// in f64. Returns NaN when the selection is empty: an all-false mask, a
/// zero-sized image, or a region whose samples are all non-finite.
///
/// The mask must share the image's dimensions; callers inside this crate
/// validate that before invoking ([`crate::metrics::measure_intensity`]).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_in_region(image: &ChannelImage, mask: Option<&MaskImage>) -> f64 {
    let mut sum = 0.0_f64;
    let mut count = 0_u64;

    match mask {
        None => {
            for pixel in image.pixels() {
                let value = f64::from(pixel.0[0]);
                if value.is_finite() {
                    sum += value;
                    count += 1;
                }
            }
        }
        Some(mask) => {
            debug_assert_eq!(image.dimensions(), mask.dimensions());
            for (pixel, selected) in image.pixels().zip(mask.pixels()) {
                if selected.0[0] > 0 {
                    let value = f64::from(pixel.0[0]);
                    if value.is_finite() {
                        sum += value;
                        count += 1;
                    }
                }
            }
        }
    }

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
