//! # stegvault - Hide files in lossless images
//!
//! stegvault turns an arbitrary file into a self-describing text frame and
//! hides it in the least-significant bits of an image's pixels.
//!
//! ## Overview
//!
//! - A payload is wrapped in a **frame**: `MARK:<name>:<size>:<base64 body>`
//! - With a password, the body is `salt || "|ENCRYPTED|" || token`, where the
//!   token is ChaCha20-Poly1305 under a PBKDF2-HMAC-SHA256 key (100k rounds)
//! - Without one, the body is `"|PLAIN|" || payload`
//! - Cover images must be **lossless** (PNG, BMP, TIFF) and at least 100x100
//! - Wrong passwords and tampered images fail with an authentication error;
//!   they never yield corrupted bytes
//!
//! ## Example Usage
//!
//! ```rust
//! use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
//! use stegvault::{extract, hide, CoverImage, Payload};
//!
//! let pixels = ImageBuffer::from_pixel(200, 200, Rgb([120u8, 80, 200]));
//! let cover = CoverImage::from_image(DynamicImage::ImageRgb8(pixels), Some(ImageFormat::Png));
//!
//! let payload = Payload::new("notes.txt", b"meet at noon".to_vec());
//! let stego = hide(&cover, &payload, Some("correct horse")).unwrap();
//!
//! let recovered = extract(&stego.into_cover(), Some("correct horse")).unwrap();
//! assert_eq!(recovered.name, "notes.txt");
//! assert_eq!(recovered.data, b"meet at noon");
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: Key derivation and authenticated encryption
//! - [`frame`]: Building and parsing frames
//! - [`capacity`]: How many payload bytes an image can carry
//! - [`validate`]: Cover image checks
//! - [`stego`]: LSB embedding and image handles
//! - [`encoder`] / [`decoder`]: The hide and extract paths

pub mod capacity;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod stego;
pub mod validate;

// Re-export commonly used types at the crate root
pub use capacity::{capacity, image_capacity, ChannelMode, RESERVED_OVERHEAD};
pub use config::{ConfigError, StegoConfig};
pub use decoder::{
    extract, extract_file, extract_with_config, inspect, ExtractedFile, ExtractedPayload,
};
pub use encoder::{hide, hide_file, hide_with_config, HideReport, Payload};
pub use error::StegoError;
pub use frame::{
    build_frame, inspect_frame, parse_frame, parse_frame_with_ttl, FrameError, FrameInfo,
    ParsedFrame, FRAME_MARKER,
};
pub use stego::{CoverImage, Embedder, ImageStegoError, LsbEmbedder, StegoImage};
pub use validate::{list_suitable_images, ImageValidator, SuitableImage, ValidationError};
