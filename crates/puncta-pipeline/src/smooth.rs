//! Gaussian smoothing for noise suppression before thresholding.
//!
//! Wraps [`imageproc::filter::gaussian_blur_f32`] to smooth a channel
//! image, reducing high-frequency noise that would otherwise scatter
//! isolated pixels across the threshold boundary.

use crate::types::ChannelImage;

/// Apply Gaussian smoothing to a channel image.
///
/// Higher `sigma` values produce more smoothing. Non-positive sigma values
/// (zero or negative) return the image unchanged, since `imageproc`'s
/// underlying function panics on `sigma <= 0.0`.
#[must_use = "returns the smoothed image"]
pub fn gaussian_smooth(image: &ChannelImage, sigma: f32) -> ChannelImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, sigma)
}
