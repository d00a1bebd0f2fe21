//! # vigil-core
//!
//! The check execution engine for Vigil - THE LOGIC.
//!
//! A check is assembled from independently written domain objects:
//! - **Resources** probe the monitored system and yield metrics
//! - **Contexts** classify metrics into outcomes and render performance data
//! - A **Summary** renders human-readable status text
//! - An **outcome collection** stores outcomes and aggregates their severity
//!
//! `Check::evaluate` runs one pass over all resources; afterwards the check
//! exposes the overall state, the status line, verbose lines, sorted
//! performance data and the plugin exit code.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Performs no I/O and parses no configuration files
//! - Is synchronous and single-threaded; resources run strictly in order
//! - Never logs; diagnostics go through an injected `Observer`
//! - Turns domain failures (`CheckError`) into `Unknown` outcomes, and
//!   returns assembly failures (`VigilError`) to the caller

// =============================================================================
// MODULES
// =============================================================================

pub mod check;
pub mod context;
pub mod metric;
pub mod observer;
pub mod performance;
pub mod range;
pub mod resource;
pub mod result;
pub mod summary;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{CheckError, Severity, VigilError};

// =============================================================================
// RE-EXPORTS: Domain Model
// =============================================================================

pub use check::{Check, Component, DomainObject, Phase};
pub use context::{Context, Contexts, MetricFormat, NullContext, ScalarContext};
pub use metric::Metric;
pub use observer::{Diagnostic, Observer};
pub use performance::Performance;
pub use range::Range;
pub use resource::{Probe, Resource};
pub use result::{Outcome, OutcomeCollection, Results};
pub use summary::{DefaultSummary, Summary};
