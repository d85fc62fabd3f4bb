//! Payload hiding.
//!
//! This module orchestrates the hide path:
//! 1. Validate the cover image (lossless format, minimum size)
//! 2. Check the payload against the image's capacity
//! 3. Build the frame (optionally encrypting the payload)
//! 4. Embed the frame text and return the new image

use std::fs;
use std::path::{Path, PathBuf};

use image::{GenericImageView, ImageFormat};
use log::{debug, info};

use crate::config::StegoConfig;
use crate::error::StegoError;
use crate::frame::build_frame;
use crate::stego::{CoverImage, Embedder, ImageStegoError, LsbEmbedder, StegoImage};
use crate::validate::ImageValidator;

/// A file's contents plus the name it is stored under.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    name: String,
    data: Vec<u8>,
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Payload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Reads a file; its file name becomes the payload name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "payload path has no file name",
                )
            })?;
        let data = fs::read(path)?;
        Ok(Self { name, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Summary of a completed `hide_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideReport {
    pub name: String,
    pub payload_size: u64,
    pub capacity: u64,
    pub encrypted: bool,
    pub output: PathBuf,
    pub format: ImageFormat,
}

/// Hides a payload with the default configuration and the LSB embedder.
pub fn hide(
    cover: &CoverImage,
    payload: &Payload,
    password: Option<&str>,
) -> Result<StegoImage, StegoError> {
    hide_with_config(cover, payload, password, &LsbEmbedder, &StegoConfig::default())
}

/// Hides a payload with a custom embedder and configuration.
pub fn hide_with_config<E: Embedder + ?Sized>(
    cover: &CoverImage,
    payload: &Payload,
    password: Option<&str>,
    embedder: &E,
    config: &StegoConfig,
) -> Result<StegoImage, StegoError> {
    ImageValidator::from_config(config)?.check(cover)?;

    let capacity = cover.capacity();
    let needed = payload.len() as u64;
    let (width, height) = cover.image().dimensions();
    debug!(
        "Cover {}x{} ({:?}), capacity {} bytes, payload {} bytes",
        width,
        height,
        cover.channel_mode(),
        capacity,
        needed
    );

    if needed > capacity {
        return Err(StegoError::CapacityExceeded { needed, capacity });
    }

    let encrypted = password.is_some_and(|p| !p.is_empty());
    let frame = build_frame(payload.name(), payload.data(), password)?;
    debug!("Frame is {} bytes (encrypted: {})", frame.len(), encrypted);

    let image = embedder
        .embed(cover.image(), &frame)
        .map_err(|e| match e {
            ImageStegoError::ImageTooSmall { needed, capacity } => StegoError::CapacityExceeded {
                needed: needed as u64,
                capacity: capacity as u64,
            },
            other => other.into(),
        })?;

    info!(
        "Hid '{}' ({} bytes, {}) in {}x{} image",
        payload.name(),
        needed,
        if encrypted { "encrypted" } else { "plain" },
        width,
        height
    );
    Ok(StegoImage::new(image))
}

/// Reads `payload_path`, hides it in `cover_path` and writes `output_path`.
pub fn hide_file(
    payload_path: &Path,
    cover_path: &Path,
    output_path: &Path,
    password: Option<&str>,
    config: &StegoConfig,
) -> Result<HideReport, StegoError> {
    let payload = Payload::from_file(payload_path)?;
    let cover = CoverImage::open(cover_path)?;

    let stego = hide_with_config(&cover, &payload, password, &LsbEmbedder, config)?;
    let format = stego.save(output_path)?;
    info!("Wrote {} ({:?})", output_path.display(), format);

    Ok(HideReport {
        name: payload.name().to_string(),
        payload_size: payload.len() as u64,
        capacity: cover.capacity(),
        encrypted: password.is_some_and(|p| !p.is_empty()),
        output: output_path.to_path_buf(),
        format,
    })
}
