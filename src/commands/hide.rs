//! Hide command - embed a file in a cover image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::{hide_file, StegoConfig};

use super::{human_size, CommandExecutor};

/// Hide a file inside a lossless image (PNG, BMP, TIFF).
///
/// The output is always written in a lossless format: PNG unless the
/// output extension names BMP or TIFF and that format keeps the image's
/// samples intact.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// File to hide
    pub payload: PathBuf,

    /// Cover image
    pub image: PathBuf,

    /// Path for the output image
    pub output: PathBuf,

    /// Encrypt the payload with this password
    #[arg(short, long)]
    pub password: Option<String>,
}

impl CommandExecutor for HideCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let report = hide_file(
            &self.payload,
            &self.image,
            &self.output,
            self.password.as_deref(),
            config,
        )
        .with_context(|| {
            format!(
                "Failed to hide {} in {}",
                self.payload.display(),
                self.image.display()
            )
        })?;

        println!("Image capacity: {}", human_size(report.capacity));
        println!("Payload size:   {}", human_size(report.payload_size));
        println!(
            "Payload hidden in {} ({:?}{})",
            report.output.display(),
            report.format,
            if report.encrypted { ", encrypted" } else { "" }
        );
        Ok(())
    }
}
