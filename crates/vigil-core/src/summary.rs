//! # Summary Module
//!
//! A `Summary` renders the human-readable part of a check's output from its
//! outcomes. Every method may return `None`; the check normalizes that to an
//! empty string.

use crate::check::{Component, DomainObject};
use crate::{OutcomeCollection, Severity};
use std::rc::Rc;

/// Renderer of status and verbose text.
///
/// The provided methods give the stock behavior; override only what a
/// check needs to phrase differently.
pub trait Summary {
    /// Status text when the overall state is `Ok`: the first outcome.
    fn ok(&self, results: &dyn OutcomeCollection) -> Option<String> {
        results.outcomes().first().map(ToString::to_string)
    }

    /// Status text for any other state: the first outcome with the worst
    /// severity, or `empty()` if there are no outcomes at all.
    fn problem(&self, results: &dyn OutcomeCollection) -> Option<String> {
        match results.first_significant() {
            Some(outcome) => Some(outcome.to_string()),
            None => self.empty(),
        }
    }

    /// Additional lines: every non-`Ok` outcome as `SEVERITY: explanation`,
    /// worst first.
    fn verbose(&self, results: &dyn OutcomeCollection) -> Option<String> {
        let lines: Vec<String> = Severity::ALL
            .iter()
            .rev()
            .filter(|s| **s != Severity::Ok)
            .flat_map(|s| results.by_severity(*s))
            .map(|o| format!("{}: {}", o.severity(), o))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    /// Status text when nothing was collected.
    fn empty(&self) -> Option<String> {
        Some("no check results".to_string())
    }
}

/// The stock summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSummary;

impl Summary for DefaultSummary {}

impl DomainObject for DefaultSummary {
    fn into_components(self: Box<Self>) -> Vec<Component> {
        vec![Component::Summary(Rc::new(*self))]
    }
}
