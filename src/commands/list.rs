//! List command - find usable cover images in a directory.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use stegvault::{list_suitable_images, ImageValidator, StegoConfig};

use super::CommandExecutor;

/// List images in a directory that can be used as covers.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Directory to search (not recursive)
    pub directory: PathBuf,
}

impl CommandExecutor for ListCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let validator = ImageValidator::from_config(config)?;
        let images = list_suitable_images(&self.directory, &validator)
            .with_context(|| format!("Failed to read directory {}", self.directory.display()))?;

        if images.is_empty() {
            bail!("No suitable images found in {}", self.directory.display());
        }

        println!("Suitable images in {}:", self.directory.display());
        println!("{}", "-".repeat(60));
        for (i, img) in images.iter().enumerate() {
            println!(
                "{:2}. {:<30} {:>8.1} KB",
                i + 1,
                img.file_name,
                img.capacity as f64 / 1024.0
            );
        }
        Ok(())
    }
}
