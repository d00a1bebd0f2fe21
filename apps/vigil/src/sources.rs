//! # Measurement Sources
//!
//! Concrete resources shipped with the binary:
//! - `StaticResource`: metrics fixed in the check definition
//! - `FileResource`: reads `name=value[uom]` lines from a file
//!
//! Failing to read or parse a source is a `CheckError`, never a setup error:
//! the monitored system is at fault, not the check definition.

use std::path::PathBuf;
use std::rc::Rc;
use vigil_core::{CheckError, Component, DomainObject, Metric, Probe, Resource};

// =============================================================================
// STATIC RESOURCE
// =============================================================================

/// Yields the same metrics on every probe.
#[derive(Debug, Clone)]
pub struct StaticResource {
    name: String,
    metrics: Vec<Metric>,
}

impl StaticResource {
    pub fn new(name: impl Into<String>, metrics: Vec<Metric>) -> Self {
        Self {
            name: name.into(),
            metrics,
        }
    }
}

impl Resource for StaticResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> Result<Probe<'_>, CheckError> {
        Ok(Probe::metrics(self.metrics.clone()))
    }
}

impl DomainObject for StaticResource {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Resource(Rc::new(*self))]
    }
}

// =============================================================================
// FILE RESOURCE
// =============================================================================

/// Maximum size of a metrics file (1 MB).
const MAX_METRICS_FILE_SIZE: u64 = 1024 * 1024;

/// Reads metrics from a text file, one `name=value[uom]` per line.
///
/// Blank lines and lines starting with `#` are skipped. A malformed line
/// stops the probe; metrics on earlier lines are still evaluated.
#[derive(Debug, Clone)]
pub struct FileResource {
    name: String,
    path: PathBuf,
    context: Option<String>,
}

impl FileResource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            context: None,
        }
    }

    /// Bind every metric read from the file to one context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn read(&self) -> Result<String, CheckError> {
        let unreadable =
            |e: std::io::Error| CheckError::new(format!("cannot read {}: {e}", self.path.display()));

        let size = std::fs::metadata(&self.path).map_err(unreadable)?.len();
        if size > MAX_METRICS_FILE_SIZE {
            return Err(CheckError::new(format!(
                "{} is {size} bytes, limit is {MAX_METRICS_FILE_SIZE}",
                self.path.display()
            )));
        }
        std::fs::read_to_string(&self.path).map_err(unreadable)
    }
}

impl Resource for FileResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> Result<Probe<'_>, CheckError> {
        let content = self.read()?;
        tracing::debug!(path = %self.path.display(), bytes = content.len(), "read metrics file");

        let mut items = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Ok(metric) => {
                    let metric = match &self.context {
                        Some(context) => metric.with_context(context.clone()),
                        None => metric,
                    };
                    items.push(Ok(metric));
                }
                Err(reason) => {
                    items.push(Err(CheckError::new(format!(
                        "{}:{}: {reason}",
                        self.path.display(),
                        index + 1
                    ))));
                    break;
                }
            }
        }
        Ok(Probe::stream(items))
    }
}

impl DomainObject for FileResource {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Resource(Rc::new(*self))]
    }
}

/// Parse `name=value[uom]`.
fn parse_line(line: &str) -> Result<Metric, String> {
    let (name, rest) = line
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{line}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("empty metric name".to_string());
    }
    let (value, uom) = split_value(rest.trim())
        .ok_or_else(|| format!("'{}' does not start with a number", rest.trim()))?;
    Ok(Metric::new(name, value).with_uom(uom))
}

/// Split `12.5ms` into `(12.5, "ms")` using the longest numeric prefix.
fn split_value(text: &str) -> Option<(f64, &str)> {
    text.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| {
            text[..end]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| (v, text[end..].trim()))
        })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn split_value_and_unit() {
        assert_eq!(split_value("12.5ms"), Some((12.5, "ms")));
        assert_eq!(split_value("-3"), Some((-3.0, "")));
        assert_eq!(split_value("80 %"), Some((80.0, "%")));
        assert_eq!(split_value("1e3B"), Some((1000.0, "B")));
        assert_eq!(split_value("ms"), None);
        assert_eq!(split_value("inf"), None);
    }

    #[test]
    fn parse_line_errors() {
        assert!(parse_line("novalue").is_err());
        assert!(parse_line("=3").is_err());
        assert!(parse_line("x=abc").is_err());
        let metric = parse_line("queue = 7c").expect("parse");
        assert_eq!(metric.name(), "queue");
        assert_eq!(metric.uom(), "c");
    }

    #[test]
    fn static_resource_yields_metrics() {
        let resource = StaticResource::new("s", vec![Metric::new("a", 1.0)]);
        let names: Vec<String> = resource
            .probe()
            .expect("probe")
            .map(|m| m.expect("metric").name().to_string())
            .collect();
        assert_eq!(names, vec!["a".to_string()]);
    }

    #[test]
    fn file_resource_reads_metrics_and_stops_at_bad_line() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "# spool stats").expect("write");
        writeln!(file, "queued=12").expect("write");
        writeln!(file).expect("write");
        writeln!(file, "age=30s").expect("write");
        writeln!(file, "broken").expect("write");
        writeln!(file, "never=1").expect("write");

        let resource = FileResource::new("spool", file.path()).with_context("spool");
        let items: Vec<Result<Metric, CheckError>> = resource.probe().expect("probe").collect();

        assert_eq!(items.len(), 3);
        let first = items[0].as_ref().expect("metric");
        assert_eq!(first.name(), "queued");
        assert_eq!(first.context(), "spool");
        assert_eq!(items[1].as_ref().expect("metric").uom(), "s");
        let err = items[2].as_ref().err().expect("error");
        assert!(err.message().ends_with(":5: expected name=value, got 'broken'"));
    }

    #[test]
    fn missing_file_is_check_error() {
        let resource = FileResource::new("gone", "/nonexistent/vigil/metrics");
        let err = resource.probe().err().expect("should fail");
        assert!(err.message().starts_with("cannot read /nonexistent/vigil/metrics"));
    }
}
