//! # Resource Module
//!
//! A `Resource` is the subject being monitored. Probing it yields a stream
//! of metrics. The stream may fail part-way through; metrics yielded before
//! the failure are still evaluated.

use crate::{CheckError, Metric};

/// Stream of metrics produced by one probe call.
pub struct Probe<'a> {
    inner: Box<dyn Iterator<Item = Result<Metric, CheckError>> + 'a>,
}

impl<'a> Probe<'a> {
    /// A probe that yields nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Box::new(std::iter::empty()),
        }
    }

    /// A probe over an already collected set of metrics.
    #[must_use]
    pub fn metrics(metrics: Vec<Metric>) -> Self {
        Self {
            inner: Box::new(metrics.into_iter().map(Ok)),
        }
    }

    /// A lazily evaluated probe. Each item may fail individually; the first
    /// failure ends evaluation of this resource.
    pub fn stream<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Result<Metric, CheckError>>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Box::new(iter.into_iter()),
        }
    }
}

impl Iterator for Probe<'_> {
    type Item = Result<Metric, CheckError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl From<Vec<Metric>> for Probe<'_> {
    fn from(metrics: Vec<Metric>) -> Self {
        Self::metrics(metrics)
    }
}

/// Producer of metrics for one monitored subject.
pub trait Resource {
    /// Display name, used as the check name when this is the first resource.
    ///
    /// Defaults to the implementing type's name without its module path.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Collect metrics. Called once per evaluation pass.
    fn probe(&self) -> Result<Probe<'_>, CheckError>;
}

/// `my_crate::probes::Load<T>` -> `Load`
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
