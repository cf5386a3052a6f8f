//! Presentation layer for model-debate
//!
//! This crate contains the CLI definition, event formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{EventFormatter, JsonlFormatter};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
