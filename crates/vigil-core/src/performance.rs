//! # Performance Data
//!
//! Machine-readable rendering of a metric, independent of its severity:
//!
//! ```text
//! label=value[uom];[warn];[crit];[min];[max]
//! ```
//!
//! Trailing empty fields are dropped. Labels that are not plain word
//! characters are single-quoted.

use crate::{Metric, Range, VigilError};
use std::fmt;

/// One performance data fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    label: String,
    value: f64,
    uom: String,
    warning: Option<Range>,
    critical: Option<Range>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Performance {
    /// Create a fragment. Fails if the label contains `'` or `=`.
    pub fn new(label: impl Into<String>, value: f64) -> Result<Self, VigilError> {
        let label = label.into();
        if label.contains('\'') || label.contains('=') {
            return Err(VigilError::InvalidLabel(label));
        }
        Ok(Self {
            label,
            value,
            uom: String::new(),
            warning: None,
            critical: None,
            min: None,
            max: None,
        })
    }

    /// Build a fragment from a metric's name, value, unit and bounds.
    pub fn from_metric(metric: &Metric) -> Result<Self, VigilError> {
        let mut perf = Self::new(metric.name(), metric.value())?.with_uom(metric.uom());
        perf.min = metric.min();
        perf.max = metric.max();
        Ok(perf)
    }

    #[must_use]
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = uom.into();
        self
    }

    #[must_use]
    pub fn with_warning(mut self, range: Option<Range>) -> Self {
        self.warning = range;
        self
    }

    #[must_use]
    pub fn with_critical(mut self, range: Option<Range>) -> Self {
        self.critical = range;
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: Option<f64>) -> Self {
        self.min = min;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: Option<f64>) -> Self {
        self.max = max;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

fn quote(label: &str) -> String {
    let plain = !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain {
        label.to_string()
    } else {
        format!("'{label}'")
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            format!("{}={}{}", quote(&self.label), self.value, self.uom),
            self.warning.map(|r| r.to_string()).unwrap_or_default(),
            self.critical.map(|r| r.to_string()).unwrap_or_default(),
            self.min.map(|v| v.to_string()).unwrap_or_default(),
            self.max.map(|v| v.to_string()).unwrap_or_default(),
        ];
        let keep = fields
            .iter()
            .rposition(|field| !field.is_empty())
            .map_or(0, |last| last + 1);
        f.write_str(&fields[..keep].join(";"))
    }
}
