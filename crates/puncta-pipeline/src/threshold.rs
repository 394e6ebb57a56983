//! Intensity threshold computation.
//!
//! Thresholds are derived from the image's own intensity statistics:
//! `mean + k * std`, where `std` is the population standard deviation
//! (divide by N, not N−1). A larger `k` raises the bound, so for the
//! aggregate region to sit inside the background region the caller
//! chooses a larger multiplier for the upper threshold.
//!
//! No ordering between the two thresholds is enforced here; it follows
//! entirely from the caller's k-values.

use crate::types::ChannelImage;

/// Compute the `(lower, upper)` threshold pair for an image.
///
/// `lower = mean + lower_k * std`, `upper = mean + upper_k * std`.
/// Deterministic and pure. NaN or infinite samples propagate into the
/// statistics and hence into both thresholds; they are not special-cased
/// (downstream strict-`>` comparisons against a NaN threshold are false,
/// yielding empty masks).
#[must_use]
pub fn compute_thresholds(image: &ChannelImage, lower_k: f64, upper_k: f64) -> (f64, f64) {
    let (mean, std) = mean_std(image);
    (lower_k.mul_add(std, mean), upper_k.mul_add(std, mean))
}

/// Mean and population standard deviation over all samples, accumulated
/// in f64. A zero-sized image yields `(NaN, NaN)`.
#[allow(clippy::cast_precision_loss)]
fn mean_std(image: &ChannelImage) -> (f64, f64) {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }

    let count = count as f64;
    let sum: f64 = image.pixels().map(|p| f64::from(p.0[0])).sum();
    let mean = sum / count;

    let sum_sq_dev: f64 = image
        .pixels()
        .map(|p| {
            let dev = f64::from(p.0[0]) - mean;
            dev * dev
        })
        .sum();

    (mean, (sum_sq_dev / count).sqrt())
}
