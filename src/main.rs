//! stegvault - Hide files in lossless images
//!
//! A CLI tool for LSB steganography with optional password protection.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use commands::{CapacityCommand, CommandExecutor, ExtractCommand, HideCommand, ListCommand};
use stegvault::StegoConfig;

/// stegvault - Hide files in lossless images
///
/// Payloads are framed with their name and size, optionally encrypted
/// with a password, and written into the least significant bits of a
/// PNG, BMP or TIFF image.
#[derive(Parser)]
#[command(name = "stegvault")]
#[command(version)]
#[command(about = "Hide files in lossless images with optional password protection")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.stegvault/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a file inside a cover image
    Hide(HideCommand),

    /// Extract a hidden file from an image
    Extract(ExtractCommand),

    /// Show how many bytes an image can hide
    Capacity(CapacityCommand),

    /// List suitable cover images in a directory
    List(ListCommand),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<StegoConfig> {
    match path {
        Some(path) => StegoConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => StegoConfig::load().context("Failed to load default config"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Hide(cmd) => cmd.execute(&config),
        Commands::Extract(cmd) => cmd.execute(&config),
        Commands::Capacity(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config),
    }
}
