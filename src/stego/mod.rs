//! Bit-level embedding of frame text into raster images.
//!
//! The orchestration layer only relies on the [`Embedder`] contract: whatever
//! `embed` writes, `reveal` must return unchanged. [`LsbEmbedder`] is the
//! shipped implementation.

pub mod cover;
pub mod image;

pub use self::cover::{CoverImage, StegoImage, LOSSLESS_FORMATS};
pub use self::image::{ImageStegoError, LsbEmbedder, LENGTH_PREFIX_LEN};

use ::image::DynamicImage;

/// Hides text in, and recovers text from, lossless raster images.
pub trait Embedder {
    /// Returns a new image carrying `text`. The input is never modified.
    fn embed(&self, image: &DynamicImage, text: &str) -> Result<DynamicImage, ImageStegoError>;

    /// Returns the hidden text, or `None` when the image carries none.
    fn reveal(&self, image: &DynamicImage) -> Result<Option<String>, ImageStegoError>;

    /// Largest text, in bytes, that `embed` accepts for this image.
    fn max_text_len(&self, image: &DynamicImage) -> usize;
}
