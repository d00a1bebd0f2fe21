//! # Metric Module
//!
//! A `Metric` is one measured value produced by a resource during a single
//! evaluation pass. It is bound by name to exactly one context, which turns
//! it into an outcome.

use crate::Range;
use serde::{Deserialize, Serialize};

/// An immutable measured value.
///
/// The `context` field names the evaluator that classifies this metric. When
/// not set explicitly it equals the metric's own name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    name: String,
    value: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    uom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warning: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    critical: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    context: String,
}

impl Metric {
    /// Create a metric whose context is its own name.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        let name = name.into();
        Self {
            context: name.clone(),
            name,
            value,
            uom: String::new(),
            warning: None,
            critical: None,
            min: None,
            max: None,
        }
    }

    /// Set the unit of measure (`s`, `%`, `B`, `c`, ...).
    #[must_use]
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = uom.into();
        self
    }

    /// Bind the metric to a named context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Attach a warning range carried by the metric itself.
    #[must_use]
    pub fn with_warning(mut self, range: Range) -> Self {
        self.warning = Some(range);
        self
    }

    /// Attach a critical range carried by the metric itself.
    #[must_use]
    pub fn with_critical(mut self, range: Range) -> Self {
        self.critical = Some(range);
        self
    }

    /// Set the minimum possible value.
    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum possible value.
    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn uom(&self) -> &str {
        &self.uom
    }

    #[must_use]
    pub fn warning(&self) -> Option<&Range> {
        self.warning.as_ref()
    }

    #[must_use]
    pub fn critical(&self) -> Option<&Range> {
        self.critical.as_ref()
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Name of the context that classifies this metric.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Value followed by its unit, e.g. `42ms`.
    #[must_use]
    pub fn valueunit(&self) -> String {
        format!("{}{}", self.value, self.uom)
    }
}
