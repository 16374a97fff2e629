//! The `sonora-tags` command line front end.
//!
//! A thin client over `core`: it parses arguments, opens files into an
//! `Editor`, and prints what happened. No tag logic lives here.

pub mod args;
mod commands;

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{ScanError, TagError};

pub use commands::{execute, run};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} file(s) failed")]
    Failed(usize),
}
