//! # Check Definitions
//!
//! TOML description of a check: its contexts and its resources.
//!
//! ```toml
//! name = "mail"
//! timeout = 10
//!
//! [[context]]
//! name = "queue"
//! warning = "0:100"
//! critical = "0:500"
//!
//! [[resource]]
//! kind = "file"
//! name = "spool"
//! path = "/var/run/spool.stats"
//! context = "queue"
//! ```

use crate::error::CliError;
use crate::sources::{FileResource, StaticResource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vigil_core::{Check, Metric, NullContext, Range, ScalarContext, VigilError};

/// Maximum size of a check definition file (256 KB).
const MAX_DEFINITION_SIZE: u64 = 256 * 1024;

/// Default wall-clock limit for one evaluation pass, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// DEFINITION TYPES
// =============================================================================

/// Top-level check definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Check name; defaults to the first resource's name.
    #[serde(default)]
    pub name: Option<String>,

    /// Timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default, rename = "context")]
    pub contexts: Vec<ContextConfig>,

    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    #[default]
    Scalar,
    Null,
}

/// A context entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    pub name: String,
    #[serde(default)]
    pub kind: ContextKind,
    #[serde(default)]
    pub warning: Option<Range>,
    #[serde(default)]
    pub critical: Option<Range>,
    #[serde(default)]
    pub fmt_metric: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A resource entry, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceConfig {
    Static {
        name: String,
        #[serde(default, rename = "metric")]
        metrics: Vec<MetricConfig>,
    },
    File {
        name: String,
        path: PathBuf,
        #[serde(default)]
        context: Option<String>,
    },
}

impl ResourceConfig {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ResourceConfig::Static { name, .. } | ResourceConfig::File { name, .. } => name,
        }
    }
}

/// A fixed metric of a static resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub uom: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub warning: Option<Range>,
    #[serde(default)]
    pub critical: Option<Range>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl MetricConfig {
    fn to_metric(&self) -> Metric {
        let mut metric = Metric::new(&self.name, self.value).with_uom(&self.uom);
        if let Some(context) = &self.context {
            metric = metric.with_context(context);
        }
        if let Some(range) = self.warning {
            metric = metric.with_warning(range);
        }
        if let Some(range) = self.critical {
            metric = metric.with_critical(range);
        }
        if let Some(min) = self.min {
            metric = metric.with_min(min);
        }
        if let Some(max) = self.max {
            metric = metric.with_max(max);
        }
        metric
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl CheckConfig {
    /// Parse a definition from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a definition file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let io = |source| CliError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io)?.len();
        if size > MAX_DEFINITION_SIZE {
            return Err(CliError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: MAX_DEFINITION_SIZE,
            });
        }
        let text = std::fs::read_to_string(path).map_err(io)?;
        Self::from_toml(&text)
    }

    /// Effective timeout in seconds.
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Name the check will report, known before assembly.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.resources.first().map(ResourceConfig::name))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Assembly
    // -------------------------------------------------------------------------

    /// Assemble a check from this definition. Contexts are added before
    /// resources, in file order.
    pub fn build(&self) -> Result<Check, CliError> {
        let mut check = Check::new();

        for context in &self.contexts {
            match context.kind {
                ContextKind::Scalar => {
                    check.add_object(scalar_context(context))?;
                }
                ContextKind::Null => {
                    check.add_object(null_context(context)?)?;
                }
            }
        }

        for resource in &self.resources {
            match resource {
                ResourceConfig::Static { name, metrics } => {
                    let metrics = metrics.iter().map(MetricConfig::to_metric).collect();
                    check.add_object(StaticResource::new(name, metrics))?;
                }
                ResourceConfig::File {
                    name,
                    path,
                    context,
                } => {
                    let mut file = FileResource::new(name, path);
                    if let Some(context) = context {
                        file = file.with_context(context);
                    }
                    check.add_object(file)?;
                }
            }
        }

        if let Some(name) = &self.name {
            check.set_name(name);
        }
        Ok(check)
    }
}

fn scalar_context(config: &ContextConfig) -> ScalarContext {
    let mut context = ScalarContext::new(&config.name);
    if let Some(range) = config.warning {
        context = context.with_warning(range);
    }
    if let Some(range) = config.critical {
        context = context.with_critical(range);
    }
    if let Some(template) = &config.fmt_metric {
        context = context.with_format(template);
    }
    for category in &config.categories {
        context = context.with_category(category);
    }
    if config.default {
        context = context.as_default();
    }
    context
}

fn null_context(config: &ContextConfig) -> Result<NullContext, VigilError> {
    if config.warning.is_some() || config.critical.is_some() {
        return Err(VigilError::UnusedThresholds(config.name.clone()));
    }
    let mut context = NullContext::new(&config.name);
    if let Some(template) = &config.fmt_metric {
        context = context.with_format(template);
    }
    for category in &config.categories {
        context = context.with_category(category);
    }
    if config.default {
        context = context.as_default();
    }
    Ok(context)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::Severity;

    const LOAD: &str = r#"
name = "load"
timeout = 5

[[context]]
name = "load"
warning = "0:10"
critical = "0:20"

[[resource]]
kind = "static"
name = "loadavg"

[[resource.metric]]
name = "load1"
value = 15.0
context = "load"
"#;

    #[test]
    fn parses_contexts_and_resources() {
        let config = CheckConfig::from_toml(LOAD).expect("parse");
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].kind, ContextKind::Scalar);
        assert_eq!(
            config.contexts[0].warning.map(|r| r.to_string()).as_deref(),
            Some("10")
        );
        assert_eq!(config.resources[0].name(), "loadavg");
    }

    #[test]
    fn builds_and_evaluates() {
        let config = CheckConfig::from_toml(LOAD).expect("parse");
        let mut check = config.build().expect("build");
        check.evaluate();
        assert_eq!(check.name(), "load");
        assert_eq!(check.state(), Severity::Warning);
        assert_eq!(check.perfdata(), &["load1=15;10;20".to_string()]);
    }

    #[test]
    fn invalid_range_is_definition_error() {
        let text = r#"
[[context]]
name = "x"
warning = "20:10"
"#;
        assert!(matches!(
            CheckConfig::from_toml(text),
            Err(CliError::Definition(_))
        ));
    }

    #[test]
    fn duplicate_default_is_setup_error() {
        let text = r#"
[[context]]
name = "a"
default = true

[[context]]
name = "b"
kind = "null"
default = true
"#;
        let config = CheckConfig::from_toml(text).expect("parse");
        assert!(matches!(config.build(), Err(CliError::Setup(_))));
    }

    #[test]
    fn null_context_with_thresholds_is_setup_error() {
        let text = r#"
[[context]]
name = "quiet"
kind = "null"
warning = "0:1"
"#;
        let config = CheckConfig::from_toml(text).expect("parse");
        assert!(matches!(
            config.build(),
            Err(CliError::Setup(VigilError::UnusedThresholds(name))) if name == "quiet"
        ));
    }

    #[test]
    fn null_context_categories_route_metrics() {
        let text = r#"
[[context]]
name = "quiet"
kind = "null"
fmt_metric = "{name} is {valueunit}"
categories = ["disk"]

[[resource]]
kind = "static"
name = "fs"

[[resource.metric]]
name = "root"
value = 97.0
uom = "%"
context = "disk"
"#;
        let config = CheckConfig::from_toml(text).expect("parse");
        let mut check = config.build().expect("build");
        check.evaluate();
        assert_eq!(check.state(), Severity::Ok);
        assert_eq!(check.summary_str(), "root is 97%");
    }

    #[test]
    fn display_name_falls_back_to_first_resource() {
        let text = r#"
[[resource]]
kind = "file"
name = "spool"
path = "/tmp/spool"
"#;
        let config = CheckConfig::from_toml(text).expect("parse");
        assert_eq!(config.display_name(), "spool");
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(CheckConfig::default().display_name(), "");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CheckConfig::from_toml("nmae = \"typo\"").is_err());
    }
}
