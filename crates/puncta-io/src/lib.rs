//! puncta-io: image decoding and channel normalization.
//!
//! Decodes raster files (PNG, JPEG, TIFF) and normalizes them into a
//! channel-last [`ChannelStack`], so the pipeline core only ever sees 2-D
//! channel slices. Channel indices are validated here, before the core is
//! invoked; the core assumes valid slices.

pub mod stack;

pub use stack::ChannelStack;

/// Errors that can occur while decoding and slicing input images.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A requested channel index does not exist in the decoded image.
    #[error("channel index {index} out of range: image has {channels} channel(s)")]
    ChannelOutOfRange {
        /// The requested channel index.
        index: usize,
        /// The number of channels the image actually has.
        channels: usize,
    },
}
