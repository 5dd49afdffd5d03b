//! CLI flags, dispatch and errors

pub mod command;
pub mod error;

pub use command::{run_mode, Cli, Mode};
pub use error::CliError;
