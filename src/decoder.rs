//! Payload extraction.
//!
//! Reveals the frame text hidden in an image and parses it back into the
//! original payload. Unlike hiding, extraction does not validate the image:
//! a file that cannot carry a frame simply reveals nothing.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::StegoConfig;
use crate::error::StegoError;
use crate::frame::{inspect_frame, parse_frame_with_ttl, FrameError, FrameInfo};
use crate::stego::{CoverImage, Embedder, LsbEmbedder};

/// A payload recovered from an image.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtractedPayload {
    /// Name stored in the frame.
    pub name: String,
    /// Recovered payload bytes.
    pub data: Vec<u8>,
    /// Whether the payload was password-protected.
    pub encrypted: bool,
}

impl std::fmt::Debug for ExtractedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractedPayload")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .field("encrypted", &self.encrypted)
            .finish()
    }
}

/// Summary of a completed `extract_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub encrypted: bool,
}

/// Extracts a payload with the default configuration and the LSB embedder.
pub fn extract(image: &CoverImage, password: Option<&str>) -> Result<ExtractedPayload, StegoError> {
    extract_with_config(image, password, &LsbEmbedder, &StegoConfig::default())
}

/// Extracts a payload with a custom embedder and configuration.
pub fn extract_with_config<E: Embedder + ?Sized>(
    image: &CoverImage,
    password: Option<&str>,
    embedder: &E,
    config: &StegoConfig,
) -> Result<ExtractedPayload, StegoError> {
    let text = embedder
        .reveal(image.image())?
        .ok_or(StegoError::NoHiddenData)?;
    debug!("Revealed {} bytes of frame text", text.len());

    let parsed = parse_frame_with_ttl(&text, password, config.token_ttl())?;
    info!(
        "Recovered '{}' ({} bytes, {})",
        parsed.name,
        parsed.data.len(),
        if parsed.encrypted { "encrypted" } else { "plain" }
    );

    Ok(ExtractedPayload {
        name: parsed.name,
        data: parsed.data,
        encrypted: parsed.encrypted,
    })
}

/// Reads the frame metadata without a password.
pub fn inspect<E: Embedder + ?Sized>(
    image: &CoverImage,
    embedder: &E,
) -> Result<FrameInfo, StegoError> {
    let text = embedder
        .reveal(image.image())?
        .ok_or(StegoError::NoHiddenData)?;
    Ok(inspect_frame(&text)?)
}

/// Turns a frame name into a single path component.
fn safe_file_name(name: &str) -> Result<PathBuf, StegoError> {
    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .ok_or(StegoError::Frame(FrameError::InvalidName(
            "name is not a usable file name",
        )))
}

/// Extracts the payload hidden in `image_path` and writes it to disk.
///
/// When `output` is an existing directory the payload is written inside it
/// under its stored name; otherwise `output` is the file to write.
pub fn extract_file(
    image_path: &Path,
    output: &Path,
    password: Option<&str>,
    config: &StegoConfig,
) -> Result<ExtractedFile, StegoError> {
    let image = CoverImage::open(image_path)?;
    let payload = extract_with_config(&image, password, &LsbEmbedder, config)?;

    let path = if output.is_dir() {
        output.join(safe_file_name(&payload.name)?)
    } else {
        output.to_path_buf()
    };
    fs::write(&path, &payload.data)?;
    info!("Wrote {}", path.display());

    Ok(ExtractedFile {
        size: payload.data.len() as u64,
        name: payload.name,
        encrypted: payload.encrypted,
        path,
    })
}
