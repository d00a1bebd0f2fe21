//! # Check Module
//!
//! The `Check` drives one evaluation pass over its resources and exposes the
//! aggregated result.
//!
//! ## Setup
//!
//! Domain objects are added through `Check::add`. Each object declares the
//! capabilities it provides via `DomainObject::into_components`; the check
//! routes every component by capability, never by concrete type:
//!
//! | Component   | Effect                                      |
//! |-------------|---------------------------------------------|
//! | `Resource`  | appended to the resource list               |
//! | `Context`   | registered in the context registry          |
//! | `Summary`   | replaces the current summary (last wins)    |
//! | `Results`   | replaces the outcome collection (last wins) |
//!
//! ## Evaluation
//!
//! Resources are probed strictly in order. A `CheckError` anywhere in a
//! resource (probe, context lookup, classification, performance data)
//! becomes exactly one `Unknown` outcome and ends that resource only.
//! Evaluating again starts from a clean slate.

use crate::observer::{Diagnostic, Observer};
use crate::{
    CheckError, Context, Contexts, DefaultSummary, Metric, Outcome, OutcomeCollection, Resource,
    Results, Severity, Summary, VigilError,
};
use std::rc::Rc;

// =============================================================================
// CAPABILITIES
// =============================================================================

/// One capability of a domain object, ready to be routed.
pub enum Component {
    Resource(Rc<dyn Resource>),
    Context(Rc<dyn Context>),
    Summary(Rc<dyn Summary>),
    Results(Box<dyn OutcomeCollection>),
}

impl Component {
    pub fn resource(resource: impl Resource + 'static) -> Self {
        Self::Resource(Rc::new(resource))
    }

    pub fn context(context: impl Context + 'static) -> Self {
        Self::Context(Rc::new(context))
    }

    pub fn summary(summary: impl Summary + 'static) -> Self {
        Self::Summary(Rc::new(summary))
    }

    pub fn results(results: impl OutcomeCollection + 'static) -> Self {
        Self::Results(Box::new(results))
    }
}

/// Anything that can be added to a check.
///
/// An object providing several capabilities returns one component per
/// capability, sharing itself through an `Rc`:
///
/// ```ignore
/// impl DomainObject for Disk {
///     fn into_components(self: Box<Self>) -> Vec<Component> {
///         let shared = Rc::new(*self);
///         vec![
///             Component::Resource(shared.clone()),
///             Component::Summary(shared),
///         ]
///     }
/// }
/// ```
///
/// Returning no components marks the object as unusable; `Check::add`
/// rejects it with `VigilError::InvalidObject`.
pub trait DomainObject {
    fn into_components(self: Box<Self>) -> Vec<Component>;

    /// Runtime type name, used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl DomainObject for Component {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![*self]
    }
}

impl DomainObject for Results {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Results(self)]
    }
}

// =============================================================================
// CHECK
// =============================================================================

/// Lifecycle of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unevaluated,
    Evaluated,
}

/// Main controller: owns the domain objects and the outcome of a pass.
pub struct Check {
    name: String,
    resources: Vec<Rc<dyn Resource>>,
    contexts: Contexts,
    summary: Rc<dyn Summary>,
    results: Box<dyn OutcomeCollection>,
    perfdata: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    observer: Option<Rc<dyn Observer>>,
    phase: Phase,
}

impl Default for Check {
    fn default() -> Self {
        Self::new()
    }
}

impl Check {
    /// Create an empty check with the stock summary and outcome collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            resources: Vec::new(),
            contexts: Contexts::new(),
            summary: Rc::new(DefaultSummary),
            results: Box::new(Results::new()),
            perfdata: Vec::new(),
            diagnostics: Vec::new(),
            observer: None,
            phase: Phase::Unevaluated,
        }
    }

    /// Create a check and add the given objects.
    pub fn with_objects(
        objects: impl IntoIterator<Item = Box<dyn DomainObject>>,
    ) -> Result<Self, VigilError> {
        let mut check = Self::new();
        check.add(objects)?;
        Ok(check)
    }

    /// Route each object by the capabilities it declares.
    ///
    /// Stops at the first object that cannot be added; objects before it
    /// remain added. The components of one object are validated before any
    /// of them is routed, so a rejected object leaves no partial trace.
    pub fn add(
        &mut self,
        objects: impl IntoIterator<Item = Box<dyn DomainObject>>,
    ) -> Result<&mut Self, VigilError> {
        for object in objects {
            let type_name = object.type_name();
            let components = object.into_components();
            if components.is_empty() {
                return Err(VigilError::InvalidObject { type_name });
            }
            for component in &components {
                if let Component::Context(context) = component {
                    self.contexts.admit(context.as_ref())?;
                }
            }
            for component in components {
                self.route(component)?;
            }
        }
        Ok(self)
    }

    /// Add a single object.
    pub fn add_object<O: DomainObject + 'static>(
        &mut self,
        object: O,
    ) -> Result<&mut Self, VigilError> {
        self.add([Box::new(object) as Box<dyn DomainObject>])
    }

    fn route(&mut self, component: Component) -> Result<(), VigilError> {
        match component {
            Component::Resource(resource) => {
                if self.name.is_empty() {
                    self.name = resource.name().to_string();
                }
                self.resources.push(resource);
            }
            Component::Context(context) => self.contexts.register(context)?,
            Component::Summary(summary) => self.summary = summary,
            Component::Results(results) => self.results = results,
        }
        Ok(())
    }

    /// Override the check name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Install an observer for diagnostics.
    pub fn set_observer(&mut self, observer: Rc<dyn Observer>) -> &mut Self {
        self.observer = Some(observer);
        self
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Run one evaluation pass.
    ///
    /// Outcomes, performance data and diagnostics of a previous pass are
    /// discarded first.
    pub fn evaluate(&mut self) {
        self.results.clear();
        self.perfdata.clear();
        self.diagnostics.clear();

        let resources = self.resources.clone();
        for resource in &resources {
            self.evaluate_resource(resource.as_ref());
        }

        self.perfdata.retain(|p| !p.is_empty());
        self.perfdata.sort();
        self.phase = Phase::Evaluated;
    }

    fn evaluate_resource(&mut self, resource: &dyn Resource) {
        let mut last = None;
        match self.drain(resource, &mut last) {
            Ok(0) => self.diagnose(Diagnostic::EmptyProbe {
                resource: resource.name().to_string(),
            }),
            Ok(_) => {}
            Err(err) => {
                self.diagnose(Diagnostic::ResourceFailed {
                    resource: resource.name().to_string(),
                    message: err.message().to_string(),
                });
                self.results
                    .add(Outcome::new(Severity::Unknown, err.message(), last));
            }
        }
    }

    /// Probe one resource and classify everything it yields. `last` tracks
    /// the most recent metric obtained so a failure can point at it.
    fn drain(
        &mut self,
        resource: &dyn Resource,
        last: &mut Option<Metric>,
    ) -> Result<usize, CheckError> {
        let mut count = 0usize;
        for item in resource.probe()? {
            let metric = item?;
            *last = Some(metric.clone());
            count += 1;

            let context = self.contexts.lookup(metric.context())?;
            self.results.add(context.evaluate(&metric, resource)?);
            if let Some(perf) = context.performance(&metric, resource)? {
                self.perfdata.push(perf.to_string());
            }
        }
        Ok(count)
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        if let Some(observer) = &self.observer {
            observer.notify(&diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    // -------------------------------------------------------------------------
    // Aggregated state
    // -------------------------------------------------------------------------

    /// Overall state: the worst outcome, `Unknown` if there is none.
    #[must_use]
    pub fn state(&self) -> Severity {
        self.results
            .most_significant_state()
            .unwrap_or(Severity::Unknown)
    }

    /// Status line text from the summary, keyed on the overall state.
    #[must_use]
    pub fn summary_str(&self) -> String {
        let text = if self.state() == Severity::Ok {
            self.summary.ok(self.results.as_ref())
        } else {
            self.summary.problem(self.results.as_ref())
        };
        text.unwrap_or_default()
    }

    /// Verbose text from the summary, independent of the state.
    #[must_use]
    pub fn verbose_str(&self) -> String {
        self.summary
            .verbose(self.results.as_ref())
            .unwrap_or_default()
    }

    /// Verbose text split into non-empty lines.
    #[must_use]
    pub fn verbose_lines(&self) -> Vec<String> {
        self.verbose_str()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Plugin exit code: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.results
            .most_significant_state()
            .map_or(Severity::Unknown.code(), Severity::code)
    }

    /// Non-empty performance data fragments, sorted.
    #[must_use]
    pub fn perfdata(&self) -> &[String] {
        &self.perfdata
    }

    /// Diagnostics recorded during the last pass.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn results(&self) -> &dyn OutcomeCollection {
        self.results.as_ref()
    }

    #[must_use]
    pub fn contexts(&self) -> &Contexts {
        &self.contexts
    }

    /// Check name; the first resource's name unless set explicitly.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullContext, Probe, ScalarContext};
    use std::cell::{Cell, RefCell};

    struct Fixed {
        name: &'static str,
        metrics: Vec<Metric>,
    }

    impl Resource for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn probe(&self) -> Result<Probe<'_>, CheckError> {
            Ok(Probe::metrics(self.metrics.clone()))
        }
    }

    impl DomainObject for Fixed {
        fn into_components(self: Box<Self>) -> Vec<Component> {
            vec![Component::Resource(Rc::new(*self))]
        }
    }

    struct Nothing;

    impl DomainObject for Nothing {
        fn into_components(self: Box<Self>) -> Vec<Component> {
            Vec::new()
        }
    }

    /// Resource and summary in one object.
    struct Both;

    impl Resource for Both {
        fn name(&self) -> &str {
            "both"
        }

        fn probe(&self) -> Result<Probe<'_>, CheckError> {
            Ok(Probe::metrics(vec![Metric::new("x", 1.0)]))
        }
    }

    impl Summary for Both {
        fn ok(&self, _results: &dyn OutcomeCollection) -> Option<String> {
            Some("custom ok".to_string())
        }
    }

    impl DomainObject for Both {
        fn into_components(self: Box<Self>) -> Vec<Component> {
            let shared = Rc::new(*self);
            vec![
                Component::Resource(shared.clone()),
                Component::Summary(shared),
            ]
        }
    }

    /// Resource and default context in one object.
    struct SelfJudging;

    impl Resource for SelfJudging {
        fn name(&self) -> &str {
            "self-judging"
        }

        fn probe(&self) -> Result<Probe<'_>, CheckError> {
            Ok(Probe::metrics(vec![Metric::new("y", 1.0)]))
        }
    }

    impl DomainObject for SelfJudging {
        fn into_components(self: Box<Self>) -> Vec<Component> {
            vec![
                Component::Resource(Rc::new(*self)),
                Component::context(NullContext::new("fallback").as_default()),
            ]
        }
    }

    /// Counts additions and never reports worse than `Warning`.
    struct Capped {
        outcomes: Vec<Outcome>,
        adds: Rc<Cell<usize>>,
    }

    impl OutcomeCollection for Capped {
        fn add(&mut self, outcome: Outcome) {
            self.adds.set(self.adds.get() + 1);
            self.outcomes.push(outcome);
        }

        fn outcomes(&self) -> &[Outcome] {
            &self.outcomes
        }

        fn clear(&mut self) {
            self.outcomes.clear();
        }

        fn most_significant_state(&self) -> Result<Severity, VigilError> {
            self.outcomes
                .iter()
                .map(|o| o.severity().min(Severity::Warning))
                .max()
                .ok_or(VigilError::EmptyResults)
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Observer for Recorder {
        fn notify(&self, diagnostic: &Diagnostic) {
            self.0.borrow_mut().push(diagnostic.to_string());
        }
    }

    fn fixed(name: &'static str, metrics: Vec<Metric>) -> Fixed {
        Fixed { name, metrics }
    }

    #[test]
    fn unevaluated_check_reads_unknown() {
        let check = Check::new();
        assert_eq!(check.phase(), Phase::Unevaluated);
        assert_eq!(check.state(), Severity::Unknown);
        assert_eq!(check.exit_code(), 3);
        assert_eq!(check.summary_str(), "no check results");
        assert_eq!(check.verbose_str(), "");
        assert!(check.perfdata().is_empty());
    }

    #[test]
    fn name_defaults_to_first_resource() {
        let mut check = Check::new();
        check
            .add_object(fixed("first", Vec::new()))
            .expect("add")
            .add_object(fixed("second", Vec::new()))
            .expect("add");
        assert_eq!(check.name(), "first");
        assert_eq!(check.resource_count(), 2);

        check.set_name("explicit");
        assert_eq!(check.name(), "explicit");
    }

    #[test]
    fn invalid_object_is_rejected_with_type_name() {
        let mut check = Check::new();
        let err = check.add_object(Nothing).err().expect("should fail");
        assert!(matches!(
            err,
            VigilError::InvalidObject { type_name } if type_name.ends_with("Nothing")
        ));
        assert!(err.to_string().contains("Nothing"));
    }

    #[test]
    fn multi_capability_object_is_routed_twice() {
        let mut check = Check::new();
        check
            .add_object(Both)
            .expect("add")
            .add_object(NullContext::new("x"))
            .expect("add");
        check.evaluate();
        assert_eq!(check.name(), "both");
        assert_eq!(check.state(), Severity::Ok);
        assert_eq!(check.summary_str(), "custom ok");
    }

    #[test]
    fn last_summary_and_results_win() {
        let mut check = Check::new();
        check
            .add_object(Both)
            .expect("add")
            .add_object(DefaultSummary)
            .expect("add")
            .add_object(ScalarContext::new("x").with_format("x={value}"))
            .expect("add");
        check.evaluate();
        assert_eq!(check.summary_str(), "x=1");

        let mut preloaded = Results::new();
        preloaded.add(Outcome::new(Severity::Critical, "stale", None));
        check.add_object(preloaded).expect("add");
        assert_eq!(check.state(), Severity::Critical);
    }

    #[test]
    fn evaluation_goes_through_custom_collection() {
        let adds = Rc::new(Cell::new(0));
        let mut check = Check::new();
        check
            .add_object(Component::results(Capped {
                outcomes: Vec::new(),
                adds: Rc::clone(&adds),
            }))
            .expect("add")
            .add_object(fixed("r", vec![Metric::new("hot", 5.0)]))
            .expect("add")
            .add_object(ScalarContext::new("hot").with_critical(
                crate::Range::parse("0:1").expect("range"),
            ))
            .expect("add");
        check.evaluate();

        assert_eq!(adds.get(), 1);
        assert_eq!(check.results().outcomes()[0].severity(), Severity::Critical);
        assert_eq!(check.state(), Severity::Warning);
        assert_eq!(check.exit_code(), 1);
    }

    #[test]
    fn rejected_object_is_not_partly_added() {
        let mut check = Check::new();
        check
            .add_object(NullContext::new("main").as_default())
            .expect("add");
        let err = check.add_object(SelfJudging).err().expect("should fail");

        assert!(matches!(err, VigilError::DuplicateDefault { .. }));
        assert_eq!(check.resource_count(), 0);
        assert!(check.name().is_empty());
        assert!(!check.contexts().contains("fallback"));
        assert_eq!(check.contexts().default_name(), Some("main"));
    }

    #[test]
    fn empty_probe_notifies_observer() {
        let recorder = Rc::new(Recorder::default());
        let mut check = Check::new();
        check.add_object(fixed("idle", Vec::new())).expect("add");
        check.set_observer(recorder.clone());
        check.evaluate();

        assert!(check.results().is_empty());
        assert_eq!(check.state(), Severity::Unknown);
        assert_eq!(
            check.diagnostics(),
            &[Diagnostic::EmptyProbe {
                resource: "idle".to_string()
            }]
        );
        assert_eq!(
            recorder.0.borrow().as_slice(),
            &["resource idle did not produce any metric".to_string()]
        );
    }

    #[test]
    fn unknown_context_becomes_unknown_outcome() {
        let mut check = Check::new();
        check
            .add_object(fixed(
                "r",
                vec![Metric::new("a", 1.0), Metric::new("b", 2.0)],
            ))
            .expect("add")
            .add_object(NullContext::new("a"))
            .expect("add");
        check.evaluate();

        let outcomes = check.results().outcomes();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].severity(), Severity::Ok);
        assert_eq!(outcomes[1].severity(), Severity::Unknown);
        assert!(outcomes[1].explanation().contains("cannot find context 'b'"));
        assert_eq!(outcomes[1].metric().map(Metric::name), Some("b"));
    }

    #[test]
    fn evaluate_twice_is_idempotent() {
        let mut check = Check::new();
        check
            .add_object(fixed("r", vec![Metric::new("load", 15.0)]))
            .expect("add")
            .add_object(
                ScalarContext::new("load")
                    .with_thresholds("10", "20")
                    .expect("thresholds"),
            )
            .expect("add");

        check.evaluate();
        let first: Vec<Outcome> = check.results().outcomes().to_vec();
        let first_perf = check.perfdata().to_vec();
        check.evaluate();

        assert_eq!(check.results().outcomes(), first.as_slice());
        assert_eq!(check.perfdata(), first_perf.as_slice());
        assert_eq!(check.results().len(), 1);
        assert_eq!(check.phase(), Phase::Evaluated);
    }

    #[test]
    fn duplicate_default_fails_setup() {
        let mut check = Check::new();
        check
            .add_object(NullContext::new("a").as_default())
            .expect("add");
        let err = check
            .add_object(NullContext::new("b").as_default())
            .err()
            .expect("should fail");
        assert!(matches!(err, VigilError::DuplicateDefault { .. }));
    }
}
