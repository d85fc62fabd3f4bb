//! Cover and stego image handles.

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};

use super::ImageStegoError;
use crate::capacity::{image_capacity, ChannelMode};

/// Lossless formats that preserve least-significant bits.
pub const LOSSLESS_FORMATS: &[ImageFormat] =
    &[ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Tiff];

/// Whether `format` stores `color` without changing its sample layout.
///
/// BMP has no 8-bit grayscale encoding in `image`; such images are written
/// as RGB and come back with every sample tripled.
fn keeps_layout(format: ImageFormat, color: ColorType) -> bool {
    match format {
        ImageFormat::Bmp => matches!(color, ColorType::Rgb8 | ColorType::Rgba8),
        _ => LOSSLESS_FORMATS.contains(&format),
    }
}

/// A decoded image together with the container format it was read from.
#[derive(Debug, Clone)]
pub struct CoverImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl CoverImage {
    /// Opens an image file, detecting the format from its content.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageStegoError> {
        let reader = image::io::Reader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let image = reader
            .decode()
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image, format })
    }

    /// Decodes an image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageStegoError> {
        let format = image::guess_format(bytes).ok();
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image, format })
    }

    /// Wraps an already decoded image.
    pub fn from_image(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel_count(&self) -> u64 {
        let (width, height) = self.dimensions();
        u64::from(width) * u64::from(height)
    }

    pub fn channel_mode(&self) -> ChannelMode {
        ChannelMode::from_color_type(self.image.color())
    }

    /// Conservative payload capacity in bytes.
    pub fn capacity(&self) -> u64 {
        image_capacity(&self.image)
    }
}

/// The output of hiding: a new image that must be stored losslessly.
#[derive(Debug, Clone)]
pub struct StegoImage {
    image: DynamicImage,
}

impl StegoImage {
    pub(crate) fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Saves the image. The format follows the file extension when it names
    /// a lossless format able to hold the image's samples unchanged, and
    /// falls back to PNG otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<ImageFormat, ImageStegoError> {
        let path = path.as_ref();
        let color = self.image.color();
        let format = ImageFormat::from_path(path)
            .ok()
            .filter(|f| keeps_layout(*f, color))
            .unwrap_or(ImageFormat::Png);

        self.image
            .save_with_format(path, format)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(format)
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Treats the stego image as a PNG cover, e.g. to extract from it directly.
    pub fn into_cover(self) -> CoverImage {
        CoverImage::from_image(self.image, Some(ImageFormat::Png))
    }
}
