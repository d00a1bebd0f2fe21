//! # Outcomes
//!
//! An `Outcome` is one classified judgment. Outcomes accumulate in an
//! `OutcomeCollection` in evaluation order; the collection derives the
//! check's overall severity from them.
//!
//! `Results` is the stock collection. A check may be handed a different
//! collection to change how outcomes are stored or reported (e.g. a
//! collection that drops duplicate explanations).

use crate::{Metric, Severity, VigilError};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// OUTCOME
// =============================================================================

/// A single severity judgment with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    severity: Severity,
    explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metric: Option<Metric>,
}

impl Outcome {
    #[must_use]
    pub fn new(severity: Severity, explanation: impl Into<String>, metric: Option<Metric>) -> Self {
        Self {
            severity,
            explanation: explanation.into(),
            metric,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// The metric this outcome judged, if any.
    #[must_use]
    pub fn metric(&self) -> Option<&Metric> {
        self.metric.as_ref()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explanation)
    }
}

// =============================================================================
// OUTCOME COLLECTION
// =============================================================================

/// Ordered storage of outcomes with severity aggregation.
///
/// Implementors provide storage; the aggregate queries are derived from
/// `outcomes()` and rarely need overriding.
pub trait OutcomeCollection {
    /// Append an outcome.
    fn add(&mut self, outcome: Outcome);

    /// All outcomes in the order they are reported.
    fn outcomes(&self) -> &[Outcome];

    /// Drop every stored outcome.
    fn clear(&mut self);

    fn len(&self) -> usize {
        self.outcomes().len()
    }

    fn is_empty(&self) -> bool {
        self.outcomes().is_empty()
    }

    /// The worst severity seen so far.
    ///
    /// Fails with `VigilError::EmptyResults` if nothing has been collected.
    fn most_significant_state(&self) -> Result<Severity, VigilError> {
        self.outcomes()
            .iter()
            .map(Outcome::severity)
            .max()
            .ok_or(VigilError::EmptyResults)
    }

    /// All outcomes carrying the worst severity, in insertion order.
    fn most_significant(&self) -> Vec<&Outcome> {
        match self.most_significant_state() {
            Ok(worst) => self.by_severity(worst),
            Err(_) => Vec::new(),
        }
    }

    /// The first outcome carrying the worst severity.
    fn first_significant(&self) -> Option<&Outcome> {
        let worst = self.most_significant_state().ok()?;
        self.outcomes().iter().find(|o| o.severity() == worst)
    }

    /// All outcomes with exactly the given severity, in insertion order.
    fn by_severity(&self, severity: Severity) -> Vec<&Outcome> {
        self.outcomes()
            .iter()
            .filter(|o| o.severity() == severity)
            .collect()
    }

    /// The first outcome whose metric has the given name.
    fn by_metric(&self, name: &str) -> Option<&Outcome> {
        self.outcomes()
            .iter()
            .find(|o| o.metric().is_some_and(|m| m.name() == name))
    }
}

/// The default outcome collection: a plain vector in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    outcomes: Vec<Outcome>,
}

impl Results {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeCollection for Results {
    fn add(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    fn clear(&mut self) {
        self.outcomes.clear();
    }
}

impl FromIterator<Outcome> for Results {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
