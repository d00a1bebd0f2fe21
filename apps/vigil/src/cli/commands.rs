//! # CLI Command Implementations
//!
//! Each command prints to stdout and returns the process exit code.
//! Diagnostics go to stderr through `tracing`.

use crate::config::CheckConfig;
use crate::error::CliError;
use crate::output::{render, render_json};
use crate::runtime::{Report, Runtime};
use std::path::Path;
use std::time::Duration;
use vigil_core::Range;

// =============================================================================
// CHECK
// =============================================================================

/// Load a definition and run it, reporting any failure as `UNKNOWN`.
pub async fn cmd_check(
    path: &Path,
    timeout: Option<u64>,
    verbose: u8,
    json: bool,
) -> Result<i32, CliError> {
    let report = match CheckConfig::load(path) {
        Ok(config) => run_config(config, timeout).await,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "cannot load check definition");
            Report::failure(&err)
        }
    };

    if json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render(&report, verbose));
    }
    Ok(report.exit_code)
}

/// Evaluate a parsed definition. `timeout` overrides the definition's limit.
pub async fn run_config(config: CheckConfig, timeout: Option<u64>) -> Report {
    let secs = timeout.unwrap_or_else(|| config.timeout_secs());
    let runtime = Runtime::new(Duration::from_secs(secs));
    let name = config.display_name().to_string();
    tracing::debug!(name = %name, timeout_secs = secs, "running check");
    runtime.execute(&name, move || config.build()).await
}

// =============================================================================
// VALIDATE
// =============================================================================

/// Assemble a check without evaluating it.
pub fn cmd_validate(path: &Path) -> Result<i32, CliError> {
    let config = CheckConfig::load(path)?;
    let check = config.build()?;
    let contexts = check.contexts();

    println!("Check '{}' is valid", check.name());
    println!("  Resources: {}", check.resource_count());
    println!(
        "  Contexts:  {}",
        contexts.names().collect::<Vec<_>>().join(", ")
    );
    if let Some(default) = contexts.default_name() {
        println!("  Default:   {default}");
    }
    Ok(0)
}

// =============================================================================
// RANGE
// =============================================================================

/// Test `value` against `spec`; exit 0 when it matches, 1 otherwise.
pub fn cmd_range(spec: &str, value: f64) -> Result<i32, CliError> {
    let range = Range::parse(spec)?;
    if range.matches(value) {
        println!("{value} matches range {range}");
        Ok(0)
    } else {
        println!("{value} is {}", range.violation());
        Ok(1)
    }
}
