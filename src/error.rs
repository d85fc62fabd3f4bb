//! Crate-level error type for the hide and extract paths.

use thiserror::Error;

use crate::config::ConfigError;
use crate::frame::FrameError;
use crate::stego::ImageStegoError;
use crate::validate::ValidationError;

/// Everything that can go wrong while hiding or extracting a payload.
///
/// None of these conditions are transient. Messages never contain the
/// password, key material, or payload bytes.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Unsuitable cover image: {0}")]
    Validation(#[from] ValidationError),

    #[error("Payload too large for image: need {needed} bytes, capacity is {capacity}")]
    CapacityExceeded { needed: u64, capacity: u64 },

    #[error("No hidden data found in image")]
    NoHiddenData,

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Image(#[from] ImageStegoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StegoError {
    /// The payload is encrypted and no password was supplied.
    pub fn is_password_required(&self) -> bool {
        matches!(self, StegoError::Frame(FrameError::PasswordRequired))
    }

    /// Wrong password or tampered ciphertext; the two are indistinguishable.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, StegoError::Frame(FrameError::Authentication))
    }

    pub fn is_size_mismatch(&self) -> bool {
        matches!(self, StegoError::Frame(FrameError::SizeMismatch { .. }))
    }
}
