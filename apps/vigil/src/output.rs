//! # Plugin Output
//!
//! Renders a `Report` in the monitoring plugin text protocol:
//!
//! ```text
//! LOAD WARNING: load1 is 15 (outside range 10) | load1=15;10;20
//! WARNING: load1 is 15 (outside range 10)
//! ```
//!
//! The first line carries the status and, after ` | `, the performance data.
//! Verbose lines follow when requested. A `|` in human-readable text would
//! start a performance data section, so it is replaced by `\`.

use crate::runtime::Report;

/// Render the status line and, at `verbose >= 1`, the verbose lines.
#[must_use]
pub fn render(report: &Report, verbose: u8) -> String {
    let mut out = status_line(report);
    if !report.perfdata.is_empty() {
        out.push_str(" | ");
        out.push_str(&report.perfdata.join(" "));
    }
    out.push('\n');

    if verbose > 0 {
        for line in &report.verbose {
            out.push_str(&sanitize(line));
            out.push('\n');
        }
    }
    out
}

/// Serialize the report as pretty JSON.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn status_line(report: &Report) -> String {
    let head = if report.name.is_empty() {
        report.state.to_string()
    } else {
        format!("{} {}", report.name.to_uppercase(), report.state)
    };
    sanitize(&format!("{head}: {}", report.summary))
}

fn sanitize(text: &str) -> String {
    text.replace('|', "\\")
}
