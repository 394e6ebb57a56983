//! Channel-last image normalization.
//!
//! A decoded raster is normalized to (rows, columns, channels) planes
//! deterministically: grayscale sources contribute one plane, color
//! sources three (red, green, blue). Alpha carries no fluorescence signal
//! and is dropped. Axis-guessing heuristics for proprietary microscopy
//! containers are deliberately out of scope; anything richer than a
//! plain raster is the image source's concern, and must be flattened to
//! one before reaching this adapter.
//!
//! Integer sample types are scaled to `[0.0, 1.0]` floats by the `image`
//! crate's conversions. Thresholds are mean + k·std and the partition
//! coefficient is a ratio, so pipeline semantics are invariant to this
//! uniform rescaling.

use image::DynamicImage;
use puncta_pipeline::ChannelImage;

use crate::IoError;

/// A decoded image normalized to channel-last planes.
#[derive(Debug, Clone)]
pub struct ChannelStack {
    planes: Vec<ChannelImage>,
    width: u32,
    height: u32,
}

impl ChannelStack {
    /// Decode raw image bytes (PNG, JPEG, TIFF) into a channel stack.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::EmptyInput`] if `bytes` is empty.
    /// Returns [`IoError::ImageDecode`] if the image format is
    /// unrecognized or the data is corrupt.
    pub fn decode(bytes: &[u8]) -> Result<Self, IoError> {
        if bytes.is_empty() {
            return Err(IoError::EmptyInput);
        }

        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(&decoded))
    }

    /// Normalize a decoded image into channel planes.
    ///
    /// Grayscale color types yield one plane; color types yield the red,
    /// green, and blue planes in that order.
    #[must_use]
    pub fn from_dynamic(decoded: &DynamicImage) -> Self {
        let rgb = decoded.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let channel_count = if decoded.color().has_color() { 3 } else { 1 };

        let planes = (0..channel_count)
            .map(|c| {
                ChannelImage::from_fn(width, height, |x, y| {
                    image::Luma([rgb.get_pixel(x, y).0[c]])
                })
            })
            .collect();

        Self {
            planes,
            width,
            height,
        }
    }

    /// Number of channel planes (1 for grayscale sources, 3 for color).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the channel plane at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ChannelOutOfRange`] when `index` is not a valid
    /// channel of this image.
    pub fn channel(&self, index: usize) -> Result<&ChannelImage, IoError> {
        self.planes.get(index).ok_or(IoError::ChannelOutOfRange {
            index,
            channels: self.planes.len(),
        })
    }
}
