//! # Core Type Definitions
//!
//! This module contains the leaf types shared by every other module:
//! - Monitoring severity (`Severity`)
//! - Domain-level evaluation failures (`CheckError`)
//! - Configuration/assembly failures (`VigilError`)
//!
//! ## Two Error Classes
//!
//! `CheckError` describes a problem with the *monitored system* (a source is
//! unreachable, a metric names an unknown context). It is caught during the
//! evaluation pass and turned into an `Unknown` outcome.
//!
//! `VigilError` describes a problem with how the check was *assembled*. It is
//! returned at setup time and never becomes an outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// SEVERITY
// =============================================================================

/// Monitoring status of a single outcome or a whole check.
///
/// The ordering is fixed: `Ok < Warning < Critical < Unknown`. `Unknown`
/// ranks worst so that an evaluation failure is never hidden behind a
/// healthy measurement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    /// All severities, best first.
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Unknown,
    ];

    /// Integer projection used as the plugin exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Upper-case label as printed in plugin output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(Severity::Ok),
            "warning" | "warn" => Ok(Severity::Warning),
            "critical" | "crit" => Ok(Severity::Critical),
            "unknown" => Ok(Severity::Unknown),
            _ => Err(VigilError::InvalidSeverity(s.to_string())),
        }
    }
}

// =============================================================================
// DOMAIN ERROR
// =============================================================================

/// An expected, user-facing failure raised while probing or classifying.
///
/// The message is the only thing that reaches the operator; it ends up
/// verbatim as the explanation of an `Unknown` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CheckError {
    message: String,
}

impl CheckError {
    /// Create a new check error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for CheckError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Errors raised while assembling a check.
///
/// These are defects in the check definition, not in the monitored system,
/// and are always returned to the caller before any evaluation pass starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VigilError {
    /// An object declared none of the recognized capabilities.
    #[error("cannot add {type_name} to check: it provides no resource, context, summary or results capability")]
    InvalidObject { type_name: &'static str },

    /// A second default context was registered.
    #[error("default context already registered as '{existing}', refusing '{rejected}'")]
    DuplicateDefault { existing: String, rejected: String },

    /// Thresholds were given for a context that never applies them.
    #[error("context '{0}' accepts every value and does not take warning or critical thresholds")]
    UnusedThresholds(String),

    /// A threshold range could not be parsed.
    #[error("invalid range '{spec}': {reason}")]
    InvalidRange { spec: String, reason: String },

    /// A performance data label contains characters that cannot be quoted.
    #[error("performance label {0:?} contains illegal characters")]
    InvalidLabel(String),

    /// A severity name could not be parsed.
    #[error("unknown severity '{0}'")]
    InvalidSeverity(String),

    /// An aggregate was requested from an outcome collection with no outcomes.
    #[error("no outcomes have been collected")]
    EmptyResults,
}

// =============================================================================
// TESTS
// =============================================================================
