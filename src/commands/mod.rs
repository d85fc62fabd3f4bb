//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod extract;
mod hide;
mod list;

pub use capacity::CapacityCommand;
pub use extract::ExtractCommand;
pub use hide::HideCommand;
pub use list::ListCommand;

use anyhow::Result;
use stegvault::StegoConfig;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &StegoConfig) -> Result<()>;
}

/// Formats a byte count the way every command reports sizes.
pub(crate) fn human_size(bytes: u64) -> String {
    format!("{} bytes ({:.1} KB)", bytes, bytes as f64 / 1024.0)
}
