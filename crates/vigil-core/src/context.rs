//! # Context Module
//!
//! A `Context` classifies metrics of one or more named categories into
//! outcomes and, optionally, renders their performance data. `Contexts` is
//! the registry that binds category names to contexts.
//!
//! ## Stock Contexts
//!
//! - `NullContext`: always `Ok`, no performance data.
//! - `ScalarContext`: warning/critical threshold ranges.

use crate::check::{Component, DomainObject};
use crate::{CheckError, Metric, Outcome, Performance, Range, Resource, Severity, VigilError};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Default metric description used by `ScalarContext`.
pub const DEFAULT_METRIC_FORMAT: &str = "{name} is {valueunit}";

// =============================================================================
// CONTEXT TRAIT
// =============================================================================

/// Evaluator for metrics of the categories it handles.
pub trait Context {
    /// Primary name of this context.
    fn name(&self) -> &str;

    /// Category names this context is registered under.
    fn categories(&self) -> Vec<String> {
        vec![self.name().to_string()]
    }

    /// Whether this context also handles categories nobody else claims.
    fn is_default(&self) -> bool {
        false
    }

    /// Classify a metric.
    fn evaluate(&self, metric: &Metric, resource: &dyn Resource) -> Result<Outcome, CheckError>;

    /// Render performance data for a metric. `None` if there is nothing to render.
    fn performance(
        &self,
        _metric: &Metric,
        _resource: &dyn Resource,
    ) -> Result<Option<Performance>, CheckError> {
        Ok(None)
    }
}

// =============================================================================
// METRIC FORMAT
// =============================================================================

/// Template describing a metric in human-readable text.
///
/// Placeholders: `{name}`, `{value}`, `{uom}`, `{valueunit}`, `{min}`,
/// `{max}`, `{context}`. Unset bounds render as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFormat(String);

impl MetricFormat {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn render(&self, metric: &Metric) -> String {
        let bound = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        self.0
            .replace("{name}", metric.name())
            .replace("{valueunit}", &metric.valueunit())
            .replace("{value}", &metric.value().to_string())
            .replace("{uom}", metric.uom())
            .replace("{min}", &bound(metric.min()))
            .replace("{max}", &bound(metric.max()))
            .replace("{context}", metric.context())
    }
}

impl Default for MetricFormat {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC_FORMAT)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Mapping from category name to context.
///
/// At most one context may be the default. A second default with a
/// different name is rejected; registering any name again replaces the
/// previous binding. A context that takes over the default's name also
/// takes over the default role, so a name never resolves to two contexts.
#[derive(Default, Clone)]
pub struct Contexts {
    by_name: BTreeMap<String, Rc<dyn Context>>,
    default: Option<Rc<dyn Context>>,
}

impl Contexts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `context` could be registered, without registering it.
    pub fn admit(&self, context: &dyn Context) -> Result<(), VigilError> {
        match &self.default {
            Some(existing) if context.is_default() && existing.name() != context.name() => {
                Err(VigilError::DuplicateDefault {
                    existing: existing.name().to_string(),
                    rejected: context.name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Register a context under every category it declares.
    pub fn register(&mut self, context: Rc<dyn Context>) -> Result<(), VigilError> {
        self.admit(context.as_ref())?;

        let categories = context.categories();
        let takes_default = self
            .default
            .as_ref()
            .is_some_and(|d| categories.iter().any(|c| c == d.name()));
        if context.is_default() || takes_default {
            self.default = Some(Rc::clone(&context));
        }
        for category in categories {
            self.by_name.insert(category, Rc::clone(&context));
        }
        Ok(())
    }

    /// Find the context for a category, falling back to the default.
    pub fn lookup(&self, category: &str) -> Result<Rc<dyn Context>, CheckError> {
        if let Some(context) = self.by_name.get(category) {
            return Ok(Rc::clone(context));
        }
        if let Some(default) = &self.default {
            return Ok(Rc::clone(default));
        }
        let known: Vec<&str> = self.names().collect();
        Err(CheckError::new(format!(
            "cannot find context '{category}' (known contexts: {})",
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        )))
    }

    /// Whether a category has an explicit binding.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.by_name.contains_key(category)
    }

    /// Registered category names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Name of the default context, if one is registered.
    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_ref().map(|c| c.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for Contexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contexts")
            .field("categories", &self.names().collect::<Vec<_>>())
            .field("default", &self.default_name())
            .finish()
    }
}

// =============================================================================
// NULL CONTEXT
// =============================================================================

/// Accepts every metric as `Ok`.
#[derive(Debug, Clone)]
pub struct NullContext {
    name: String,
    fmt_metric: Option<MetricFormat>,
    extra_categories: Vec<String>,
    default: bool,
}

impl NullContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fmt_metric: None,
            extra_categories: Vec::new(),
            default: false,
        }
    }

    #[must_use]
    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.fmt_metric = Some(MetricFormat::new(template));
        self
    }

    /// Also register this context under another category name.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.extra_categories.push(category.into());
        self
    }

    /// Mark as the registry default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }
}

impl Context for NullContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn categories(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.extra_categories.iter().cloned())
            .collect()
    }

    fn is_default(&self) -> bool {
        self.default
    }

    fn evaluate(&self, metric: &Metric, _resource: &dyn Resource) -> Result<Outcome, CheckError> {
        let explanation = self
            .fmt_metric
            .as_ref()
            .map(|f| f.render(metric))
            .unwrap_or_default();
        Ok(Outcome::new(Severity::Ok, explanation, Some(metric.clone())))
    }
}

impl DomainObject for NullContext {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Context(Rc::new(*self))]
    }
}

// =============================================================================
// SCALAR CONTEXT
// =============================================================================

/// Classifies a numeric metric against warning and critical ranges.
///
/// Ranges set on the context take precedence; otherwise the ranges carried
/// by the metric are used. A missing range never raises a state.
#[derive(Debug, Clone)]
pub struct ScalarContext {
    name: String,
    warning: Option<Range>,
    critical: Option<Range>,
    fmt_metric: MetricFormat,
    extra_categories: Vec<String>,
    default: bool,
}

impl ScalarContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warning: None,
            critical: None,
            fmt_metric: MetricFormat::default(),
            extra_categories: Vec::new(),
            default: false,
        }
    }

    #[must_use]
    pub fn with_warning(mut self, range: Range) -> Self {
        self.warning = Some(range);
        self
    }

    #[must_use]
    pub fn with_critical(mut self, range: Range) -> Self {
        self.critical = Some(range);
        self
    }

    /// Parse both thresholds from Nagios range strings. Empty strings leave
    /// the respective threshold unset.
    pub fn with_thresholds(mut self, warning: &str, critical: &str) -> Result<Self, VigilError> {
        if !warning.is_empty() {
            self.warning = Some(Range::parse(warning)?);
        }
        if !critical.is_empty() {
            self.critical = Some(Range::parse(critical)?);
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.fmt_metric = MetricFormat::new(template);
        self
    }

    /// Also register this context under another category name.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.extra_categories.push(category.into());
        self
    }

    /// Mark as the registry default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    fn effective(&self, metric: &Metric) -> (Option<Range>, Option<Range>) {
        (
            self.warning.or_else(|| metric.warning().copied()),
            self.critical.or_else(|| metric.critical().copied()),
        )
    }
}

impl Context for ScalarContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn categories(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.extra_categories.iter().cloned())
            .collect()
    }

    fn is_default(&self) -> bool {
        self.default
    }

    fn evaluate(&self, metric: &Metric, _resource: &dyn Resource) -> Result<Outcome, CheckError> {
        let (warning, critical) = self.effective(metric);
        let description = self.fmt_metric.render(metric);
        let value = metric.value();

        let violated = |severity: Severity, range: &Range| {
            Outcome::new(
                severity,
                format!("{description} ({})", range.violation()),
                Some(metric.clone()),
            )
        };

        if let Some(range) = critical.filter(|r| !r.matches(value)) {
            return Ok(violated(Severity::Critical, &range));
        }
        if let Some(range) = warning.filter(|r| !r.matches(value)) {
            return Ok(violated(Severity::Warning, &range));
        }
        Ok(Outcome::new(Severity::Ok, description, Some(metric.clone())))
    }

    fn performance(
        &self,
        metric: &Metric,
        _resource: &dyn Resource,
    ) -> Result<Option<Performance>, CheckError> {
        let (warning, critical) = self.effective(metric);
        let perf = Performance::from_metric(metric)
            .map_err(|e| CheckError::new(e.to_string()))?
            .with_warning(warning)
            .with_critical(critical);
        Ok(Some(perf))
    }
}

impl DomainObject for ScalarContext {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Context(Rc::new(*self))]
    }
}

// =============================================================================
// TESTS
// =============================================================================
