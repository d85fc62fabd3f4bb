//! Capacity command - report how much an image can carry.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use stegvault::{CoverImage, ImageValidator, StegoConfig};

use super::{human_size, CommandExecutor};

/// Reference payload sizes printed for comparison.
const REFERENCE_SIZES: &[(&str, u64)] = &[
    ("Small payload (~50 KB)", 50 * 1024),
    ("Medium payload (~200 KB)", 200 * 1024),
    ("Large payload (~1 MB)", 1024 * 1024),
];

/// Check whether an image is usable and how many bytes it can hide.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Image to check
    pub image: PathBuf,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let cover = CoverImage::open(&self.image)
            .with_context(|| format!("Failed to open image {}", self.image.display()))?;

        let validator = ImageValidator::from_config(config)?;
        if let Err(e) = validator.check(&cover) {
            bail!(
                "Image not suitable for steganography: {} (supported formats: {})",
                e,
                config.formats.join(", ")
            );
        }

        let (width, height) = cover.dimensions();
        let capacity = cover.capacity();
        println!("Image:    {}", self.image.display());
        println!("Size:     {}x{} ({:?})", width, height, cover.channel_mode());
        println!("Capacity: {}", human_size(capacity));
        println!();
        println!("Payload size reference:");
        for (label, size) in REFERENCE_SIZES {
            let mark = if capacity >= *size { "yes" } else { "no" };
            println!("- {}: {}", label, mark);
        }
        Ok(())
    }
}
