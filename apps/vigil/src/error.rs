//! # Application Errors
//!
//! Everything that can go wrong outside the check itself: reading and
//! parsing the definition file, assembling the check, running the worker
//! and printing the report.

use std::path::PathBuf;
use thiserror::Error;
use vigil_core::VigilError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("check definition {} is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid check definition: {0}")]
    Definition(#[from] toml::de::Error),

    #[error("{0}")]
    Setup(#[from] VigilError),

    #[error("check execution failed: {0}")]
    Worker(String),

    #[error("cannot serialize report: {0}")]
    Output(#[from] serde_json::Error),
}
