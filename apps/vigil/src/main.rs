//! # Vigil - monitoring plugin runner
//!
//! ## Usage
//!
//! ```bash
//! # Run a check
//! vigil check -c load.toml -v
//!
//! # Validate a definition
//! vigil validate -c load.toml
//!
//! # Test a threshold range
//! vigil range @10:20 15
//! ```
//!
//! stdout carries the plugin protocol only. Logs go to stderr, filtered by
//! `RUST_LOG` (default `vigil=warn`); `VIGIL_LOG_FORMAT=json` switches
//! them to JSON.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil::cli;
use vigil::runtime::Report;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let log_format = std::env::var("VIGIL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vigil=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    let code = match cli::execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Error: {}", e);
            let report = Report::failure(&e);
            print!("{}", vigil::output::render(&report, 0));
            report.exit_code
        }
    };
    std::process::exit(code);
}
