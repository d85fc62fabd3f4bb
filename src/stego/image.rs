//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides text in the least significant bit of every 8-bit sample.
//! Grayscale, RGB and RGBA images keep their layout; anything else is
//! converted to RGBA first.
//!
//! Format: [4 bytes length, little-endian] + [UTF-8 text bytes]
//! Each byte is spread across 8 samples, lowest bit first.

use std::borrow::Cow;

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use thiserror::Error;

use super::Embedder;

/// Size of the length prefix written ahead of the text.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum ImageStegoError {
    #[error("Image too small to hide data: need {needed} bytes, have capacity for {capacity}")]
    ImageTooSmall { needed: usize, capacity: usize },

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Sequential LSB embedder over all samples of the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbEmbedder;

impl LsbEmbedder {
    pub fn new() -> Self {
        Self
    }
}

/// Raw 8-bit samples in the layout the embedder writes to.
fn samples(image: &DynamicImage) -> Cow<'_, [u8]> {
    match image {
        DynamicImage::ImageLuma8(buf) => Cow::Borrowed(buf.as_raw().as_slice()),
        DynamicImage::ImageRgb8(buf) => Cow::Borrowed(buf.as_raw().as_slice()),
        DynamicImage::ImageRgba8(buf) => Cow::Borrowed(buf.as_raw().as_slice()),
        other => Cow::Owned(other.to_rgba8().into_raw()),
    }
}

fn text_capacity(sample_count: usize) -> usize {
    (sample_count / 8).saturating_sub(LENGTH_PREFIX_LEN)
}

fn write_bits<P>(mut buf: ImageBuffer<P, Vec<u8>>, data: &[u8]) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let raw: &mut [u8] = &mut buf;
    for (i, sample) in raw.iter_mut().take(data.len() * 8).enumerate() {
        let bit = (data[i / 8] >> (i % 8)) & 1;
        *sample = (*sample & 0xFE) | bit;
    }
    buf
}

fn read_bytes(raw: &[u8], byte_offset: usize, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    for (i, sample) in raw.iter().skip(byte_offset * 8).take(len * 8).enumerate() {
        out[i / 8] |= (sample & 1) << (i % 8);
    }
    out
}

impl Embedder for LsbEmbedder {
    fn embed(&self, image: &DynamicImage, text: &str) -> Result<DynamicImage, ImageStegoError> {
        let data = text.as_bytes();
        let capacity = self.max_text_len(image);
        let too_small = ImageStegoError::ImageTooSmall {
            needed: data.len(),
            capacity,
        };
        if data.len() > capacity {
            return Err(too_small);
        }
        let len = u32::try_from(data.len()).map_err(|_| too_small)?;

        let mut full_data = Vec::with_capacity(LENGTH_PREFIX_LEN + data.len());
        full_data.extend_from_slice(&len.to_le_bytes());
        full_data.extend_from_slice(data);

        Ok(match image {
            DynamicImage::ImageLuma8(buf) => {
                DynamicImage::ImageLuma8(write_bits(buf.clone(), &full_data))
            }
            DynamicImage::ImageRgb8(buf) => {
                DynamicImage::ImageRgb8(write_bits(buf.clone(), &full_data))
            }
            other => DynamicImage::ImageRgba8(write_bits(other.to_rgba8(), &full_data)),
        })
    }

    fn reveal(&self, image: &DynamicImage) -> Result<Option<String>, ImageStegoError> {
        let raw = samples(image);
        if raw.len() < LENGTH_PREFIX_LEN * 8 {
            return Ok(None);
        }

        let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
        len_bytes.copy_from_slice(&read_bytes(&raw, 0, LENGTH_PREFIX_LEN));
        let data_len = u32::from_le_bytes(len_bytes) as usize;

        // Sanity check
        if data_len == 0 || data_len > text_capacity(raw.len()) {
            return Ok(None);
        }

        let data = read_bytes(&raw, LENGTH_PREFIX_LEN, data_len);
        Ok(String::from_utf8(data).ok())
    }

    fn max_text_len(&self, image: &DynamicImage) -> usize {
        let sample_count = match image {
            DynamicImage::ImageLuma8(buf) => buf.as_raw().len(),
            DynamicImage::ImageRgb8(buf) => buf.as_raw().len(),
            DynamicImage::ImageRgba8(buf) => buf.as_raw().len(),
            other => {
                let (width, height) = other.dimensions();
                (width as usize)
                    .saturating_mul(height as usize)
                    .saturating_mul(4)
            }
        };
        text_capacity(sample_count)
    }
}
