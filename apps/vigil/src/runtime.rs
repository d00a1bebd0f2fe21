//! # Runtime
//!
//! Runs a check under a wall-clock limit and turns whatever happened into a
//! `Report`: a finished evaluation, a setup failure, or a timeout.
//!
//! A `Check` holds its domain objects behind `Rc`, so it is assembled and
//! evaluated entirely on one blocking worker thread. Only the `Report`
//! crosses back to the async side.

use crate::error::CliError;
use serde::Serialize;
use std::rc::Rc;
use std::time::Duration;
use vigil_core::{Check, Diagnostic, Observer, Outcome, Severity};

// =============================================================================
// REPORT
// =============================================================================

/// Everything the plugin prints, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub state: Severity,
    pub exit_code: i32,
    pub summary: String,
    pub verbose: Vec<String>,
    pub perfdata: Vec<String>,
    pub outcomes: Vec<Outcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Snapshot of an evaluated check.
    #[must_use]
    pub fn from_check(check: &Check) -> Self {
        Self {
            name: check.name().to_string(),
            state: check.state(),
            exit_code: check.exit_code(),
            summary: check.summary_str(),
            verbose: check.verbose_lines(),
            perfdata: check.perfdata().to_vec(),
            outcomes: check.results().outcomes().to_vec(),
            diagnostics: check.diagnostics().to_vec(),
        }
    }

    /// The check did not finish within `limit`.
    #[must_use]
    pub fn timeout(name: &str, limit: Duration) -> Self {
        Self::unknown(
            name,
            format!(
                "Timeout: check execution aborted after {} s",
                limit.as_secs()
            ),
        )
    }

    /// The check could not be set up or run. Reported without a name.
    #[must_use]
    pub fn failure(error: &CliError) -> Self {
        Self::unknown("", error.to_string())
    }

    fn unknown(name: &str, summary: String) -> Self {
        Self {
            name: name.to_string(),
            state: Severity::Unknown,
            exit_code: Severity::Unknown.code(),
            summary,
            verbose: Vec::new(),
            perfdata: Vec::new(),
            outcomes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Forwards evaluation diagnostics to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::EmptyProbe { resource } => {
                tracing::warn!(resource = %resource, "{diagnostic}");
            }
            Diagnostic::ResourceFailed { resource, message } => {
                tracing::info!(resource = %resource, error = %message, "resource failed");
            }
        }
    }
}

// =============================================================================
// RUNTIME
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Runtime {
    timeout: Duration,
}

impl Runtime {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build and evaluate a check on a blocking worker.
    ///
    /// `name` is used for the timeout report, when the check itself is
    /// no longer reachable.
    pub async fn execute<F>(&self, name: &str, build: F) -> Report
    where
        F: FnOnce() -> Result<Check, CliError> + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(move || run(build));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(report))) => report,
            Ok(Ok(Err(err))) => {
                tracing::debug!(error = %err, "check setup failed");
                Report::failure(&err)
            }
            Ok(Err(join)) => Report::failure(&CliError::Worker(join.to_string())),
            Err(_) => {
                tracing::warn!(check = %name, timeout_secs = self.timeout.as_secs(), "check timed out");
                Report::timeout(name, self.timeout)
            }
        }
    }
}

fn run<F>(build: F) -> Result<Report, CliError>
where
    F: FnOnce() -> Result<Check, CliError>,
{
    let mut check = build()?;
    check.set_observer(Rc::new(TracingObserver));
    check.evaluate();
    tracing::debug!(
        check = check.name(),
        state = %check.state(),
        outcomes = check.results().len(),
        "check evaluated"
    );
    Ok(Report::from_check(&check))
}

// =============================================================================
// TESTS
// =============================================================================
