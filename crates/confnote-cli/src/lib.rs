//! Confnote CLI library.
//!
//! Wiring for the `confnote` binary: configuration management, command
//! execution, and output formatting. The collaborators (ledger, mailbox,
//! renderer, recognizer, oracle) are constructed here, once per process,
//! and handed into the pipeline as explicit handles.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
