//! Integration tests for running checks from definitions.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::io::Write;
use std::time::Duration;
use vigil::cli::{cmd_check, run_config};
use vigil::output::render;
use vigil::runtime::Runtime;
use vigil::CheckConfig;
use vigil_core::{Check, CheckError, Component, Diagnostic, Metric, Probe, Resource, Severity};

fn definition(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

// =============================================================================
// DEFINITION TO OUTPUT
// =============================================================================

#[tokio::test]
async fn test_file_resource_end_to_end() {
    let mut stats = tempfile::NamedTempFile::new().unwrap();
    writeln!(stats, "queued=120").unwrap();
    writeln!(stats, "deferred=3").unwrap();

    let text = format!(
        r#"
name = "mail"

[[context]]
name = "queue"
warning = "0:100"
critical = "0:500"

[[resource]]
kind = "file"
name = "spool"
path = "{}"
context = "queue"
"#,
        stats.path().display()
    );

    let config = CheckConfig::from_toml(&text).unwrap();
    let report = run_config(config, None).await;

    assert_eq!(report.name, "mail");
    assert_eq!(report.state, Severity::Warning);
    assert_eq!(report.exit_code, 1);
    assert_eq!(
        report.perfdata,
        vec!["deferred=3;100;500".to_string(), "queued=120;100;500".to_string()]
    );
    assert_eq!(
        render(&report, 0),
        "MAIL WARNING: queued is 120 (outside range 100) | deferred=3;100;500 queued=120;100;500\n"
    );
}

#[tokio::test]
async fn test_missing_metrics_file_is_unknown() {
    let text = r#"
[[context]]
name = "queue"
kind = "null"

[[resource]]
kind = "file"
name = "spool"
path = "/nonexistent/vigil/spool.stats"
context = "queue"
"#;
    let config = CheckConfig::from_toml(text).unwrap();
    let report = run_config(config, None).await;

    assert_eq!(report.name, "spool");
    assert_eq!(report.state, Severity::Unknown);
    assert_eq!(report.outcomes.len(), 1);
    assert!(report.summary.starts_with("cannot read /nonexistent/vigil/spool.stats"));
    assert!(matches!(
        report.diagnostics.as_slice(),
        [Diagnostic::ResourceFailed { resource, .. }] if resource == "spool"
    ));
}

#[tokio::test]
async fn test_setup_error_reports_unknown_without_name() {
    let text = r#"
[[context]]
name = "a"
default = true

[[context]]
name = "b"
default = true
"#;
    let config = CheckConfig::from_toml(text).unwrap();
    let report = run_config(config, None).await;

    assert_eq!(report.exit_code, 3);
    assert!(report.name.is_empty());
    assert!(render(&report, 0).starts_with("UNKNOWN: default context already registered"));
}

#[tokio::test]
async fn test_cmd_check_with_unreadable_definition_exits_unknown() {
    let code = cmd_check(
        std::path::Path::new("/nonexistent/vigil/check.toml"),
        None,
        0,
        false,
    )
    .await
    .unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn test_cmd_check_returns_state_code() {
    let file = definition(
        r#"
[[context]]
name = "load"
critical = "0:1"

[[resource]]
kind = "static"
name = "loadavg"

[[resource.metric]]
name = "load"
value = 4.0
"#,
    );
    let code = cmd_check(file.path(), None, 1, true).await.unwrap();
    assert_eq!(code, 2);
}

// =============================================================================
// TIMEOUT
// =============================================================================

struct Slow;

impl Resource for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    fn probe(&self) -> Result<Probe<'_>, CheckError> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(Probe::metrics(vec![Metric::new("late", 1.0)]))
    }
}

#[tokio::test]
async fn test_timeout_reports_unknown() {
    let runtime = Runtime::new(Duration::from_secs(1));
    let report = runtime
        .execute("slow", || {
            let mut check = Check::new();
            check.add_object(Component::resource(Slow))?;
            Ok(check)
        })
        .await;

    assert_eq!(report.state, Severity::Unknown);
    assert_eq!(report.exit_code, 3);
    assert_eq!(
        render(&report, 0),
        "SLOW UNKNOWN: Timeout: check execution aborted after 1 s\n"
    );
}

#[tokio::test]
async fn test_fast_check_beats_timeout() {
    let runtime = Runtime::new(Duration::from_secs(5));
    let report = runtime
        .execute("fast", || {
            let mut check = Check::new();
            check.add_object(Component::resource(vigil::sources::StaticResource::new(
                "fast",
                Vec::new(),
            )))?;
            Ok(check)
        })
        .await;

    // No metrics at all: nothing to aggregate, so the state is Unknown
    // and the summary falls back to the empty text.
    assert_eq!(report.state, Severity::Unknown);
    assert_eq!(report.summary, "no check results");
    assert_eq!(report.diagnostics.len(), 1);
}
