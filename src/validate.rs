//! Cover image validation.
//!
//! An image is suitable when it was stored in a lossless format and has
//! enough pixels to carry at least the frame metadata. Lossy formats are
//! rejected outright: re-encoding them destroys the hidden bits.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::debug;
use thiserror::Error;

use crate::config::{ConfigError, StegoConfig};
use crate::stego::{CoverImage, LOSSLESS_FORMATS};

/// Default minimum pixel count (100x100).
pub const DEFAULT_MIN_PIXELS: u64 = 10_000;

/// Reasons a cover image is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown image format")]
    UnknownFormat,

    #[error("Unsupported image format {0:?}; use PNG, BMP or TIFF")]
    UnsupportedFormat(ImageFormat),

    #[error("Image too small: {pixels} pixels, need at least {minimum}")]
    TooSmall { pixels: u64, minimum: u64 },
}

/// Accepts or rejects cover images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageValidator {
    formats: Vec<ImageFormat>,
    min_pixels: u64,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self {
            formats: LOSSLESS_FORMATS.to_vec(),
            min_pixels: DEFAULT_MIN_PIXELS,
        }
    }
}

impl ImageValidator {
    /// Creates a validator. Formats outside the lossless set are ignored.
    pub fn new(formats: &[ImageFormat], min_pixels: u64) -> Self {
        Self {
            formats: formats
                .iter()
                .copied()
                .filter(|f| LOSSLESS_FORMATS.contains(f))
                .collect(),
            min_pixels,
        }
    }

    pub fn from_config(config: &StegoConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(&config.image_formats()?, config.min_pixels))
    }

    pub fn min_pixels(&self) -> u64 {
        self.min_pixels
    }

    /// Checks an image, reporting why it is unsuitable.
    pub fn check(&self, image: &CoverImage) -> Result<(), ValidationError> {
        let format = image.format().ok_or(ValidationError::UnknownFormat)?;
        if !self.formats.contains(&format) {
            return Err(ValidationError::UnsupportedFormat(format));
        }

        let pixels = image.pixel_count();
        if pixels < self.min_pixels {
            return Err(ValidationError::TooSmall {
                pixels,
                minimum: self.min_pixels,
            });
        }

        Ok(())
    }

    /// Returns true if the image can be used as a cover.
    pub fn validate(&self, image: &CoverImage) -> bool {
        self.check(image).is_ok()
    }
}

/// A usable cover image found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitableImage {
    pub path: PathBuf,
    pub file_name: String,
    pub capacity: u64,
}

/// Lists suitable cover images in a directory (non-recursive), sorted by name.
pub fn list_suitable_images<P: AsRef<Path>>(
    dir: P,
    validator: &ImageValidator,
) -> std::io::Result<Vec<SuitableImage>> {
    let mut found = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let cover = match CoverImage::open(&path) {
            Ok(cover) => cover,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if let Err(e) = validator.check(&cover) {
            debug!("Skipping {}: {}", path.display(), e);
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        found.push(SuitableImage {
            capacity: cover.capacity(),
            file_name,
            path,
        });
    }

    found.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(found)
}
