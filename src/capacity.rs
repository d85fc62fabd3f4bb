//! Capacity estimation for cover images.
//!
//! One bit is hidden per colour channel per pixel. The estimate works
//! backwards from the number of frame characters an image can carry: it
//! removes the embedder's length prefix and the worst-case frame header,
//! inverts the base64 expansion, and subtracts the encrypted body overhead.
//! A payload within the estimate fits with or without a password.

use image::{ColorType, DynamicImage, GenericImageView};

use crate::frame::{ENCRYPTED_BODY_OVERHEAD, MAX_HEADER_LEN};
use crate::stego::LENGTH_PREFIX_LEN;

/// Headroom reserved in every image before any body bytes are counted.
pub const RESERVED_OVERHEAD: u64 = (LENGTH_PREFIX_LEN + MAX_HEADER_LEN) as u64;

/// Colour layout of a cover image, as far as capacity is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// Grayscale, grayscale+alpha, or anything not recognised.
    Single,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelMode {
    /// Usable channels per pixel.
    pub fn channels(self) -> u64 {
        match self {
            ChannelMode::Single => 1,
            ChannelMode::Rgb => 3,
            ChannelMode::Rgba => 4,
        }
    }

    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ChannelMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ChannelMode::Rgba,
            _ => ChannelMode::Single,
        }
    }
}

/// Total LSB bytes: one bit per channel per pixel.
fn lsb_bytes(width: u32, height: u32, mode: ChannelMode) -> u64 {
    let bits = u128::from(width) * u128::from(height) * u128::from(mode.channels());
    u64::try_from(bits / 8).unwrap_or(u64::MAX)
}

/// Maximum frame length in bytes the image can carry.
pub fn frame_capacity(width: u32, height: u32, mode: ChannelMode) -> u64 {
    lsb_bytes(width, height, mode).saturating_sub(LENGTH_PREFIX_LEN as u64)
}

/// Conservative number of raw payload bytes the image can carry.
pub fn capacity(width: u32, height: u32, mode: ChannelMode) -> u64 {
    let frame_budget = frame_capacity(width, height, mode).saturating_sub(MAX_HEADER_LEN as u64);
    let body_budget = (frame_budget / 4) * 3;
    body_budget.saturating_sub(ENCRYPTED_BODY_OVERHEAD as u64)
}

/// Capacity of a decoded image, using its native colour layout.
pub fn image_capacity(image: &DynamicImage) -> u64 {
    let (width, height) = image.dimensions();
    capacity(width, height, ChannelMode::from_color_type(image.color()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_overhead() {
        // 4-byte length prefix + "MARK" + 255-byte name + 20 digits + 3 colons
        assert_eq!(RESERVED_OVERHEAD, 286);
        assert_eq!(ENCRYPTED_BODY_OVERHEAD, 64);
    }

    #[test]
    fn test_capacity_rgb() {
        // 30000 bits = 3750 bytes; 3464 for the body = 866 base64 quads = 2598 bytes
        assert_eq!(capacity(100, 100, ChannelMode::Rgb), 2534);
    }

    #[test]
    fn test_capacity_rgba() {
        assert_eq!(capacity(100, 100, ChannelMode::Rgba), 3470);
    }

    #[test]
    fn test_capacity_single() {
        assert_eq!(capacity(100, 100, ChannelMode::Single), 659);
    }

    #[test]
    fn test_tiny_image_has_zero_capacity() {
        assert_eq!(capacity(10, 10, ChannelMode::Rgb), 0);
        assert_eq!(capacity(0, 0, ChannelMode::Rgba), 0);
    }

    #[test]
    fn test_monotonic_in_pixel_count() {
        let mut last = 0;
        for side in (0..400).step_by(7) {
            let cap = capacity(side, side, ChannelMode::Rgb);
            assert!(cap >= last, "capacity dropped at {side}x{side}");
            last = cap;
        }
    }

    #[test]
    fn test_rgba_exceeds_rgb() {
        for (w, h) in [(100, 100), (64, 300), (1920, 1080)] {
            assert!(capacity(w, h, ChannelMode::Rgba) > capacity(w, h, ChannelMode::Rgb));
        }
    }

    #[test]
    fn test_large_dimensions_do_not_overflow() {
        let cap = capacity(u32::MAX, u32::MAX, ChannelMode::Rgba);
        assert!(cap > 0);
    }

    #[test]
    fn test_channel_mode_from_color_type() {
        assert_eq!(ChannelMode::from_color_type(ColorType::Rgb8), ChannelMode::Rgb);
        assert_eq!(ChannelMode::from_color_type(ColorType::Rgba16), ChannelMode::Rgba);
        assert_eq!(ChannelMode::from_color_type(ColorType::L8), ChannelMode::Single);
        assert_eq!(ChannelMode::from_color_type(ColorType::La8), ChannelMode::Single);
    }

    #[test]
    fn test_frame_capacity() {
        assert_eq!(frame_capacity(100, 100, ChannelMode::Rgb), 3746);

        let budget = lsb_bytes(100, 100, ChannelMode::Rgb) - RESERVED_OVERHEAD;
        let frame = frame_capacity(100, 100, ChannelMode::Rgb);
        assert_eq!(frame - MAX_HEADER_LEN as u64, budget);
        assert_eq!(capacity(100, 100, ChannelMode::Rgb), budget / 4 * 3 - 64);
    }
}
