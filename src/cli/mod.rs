//! CLI command implementations

pub mod check;
pub mod error;
pub mod ingest;

pub use check::CheckCommand;
pub use error::CliError;
pub use ingest::{Cli, Commands, IngestCommand};
