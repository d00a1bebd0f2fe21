//! # Vigil
//!
//! Runs monitoring checks built on `vigil-core` and prints them in the
//! Nagios plugin format.
//!
//! - `config`: TOML check definitions
//! - `sources`: resources shipped with the binary
//! - `runtime`: timeout handling and the `Report` value
//! - `output`: status line rendering
//! - `cli`: the `vigil` command line

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod runtime;
pub mod sources;

pub use config::CheckConfig;
pub use error::CliError;
pub use runtime::{Report, Runtime};
