//! Extract command - recover a hidden file from an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegvault::{extract_file, StegoConfig};

use super::{human_size, CommandExecutor};

/// Extract a hidden file from an image.
///
/// If OUTPUT is an existing directory, the file is written inside it
/// under the name it was hidden with.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Image containing a hidden payload
    pub image: PathBuf,

    /// Output file or directory
    pub output: PathBuf,

    /// Password the payload was encrypted with
    #[arg(short, long)]
    pub password: Option<String>,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let file = extract_file(&self.image, &self.output, self.password.as_deref(), config)
            .with_context(|| format!("Failed to extract payload from {}", self.image.display()))?;

        println!("Payload extracted: {}", file.path.display());
        println!("Original filename: {}", file.name);
        println!("Payload size:      {}", human_size(file.size));
        if file.encrypted {
            println!("Payload was encrypted");
        }
        Ok(())
    }
}
