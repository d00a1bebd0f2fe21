//! # Diagnostics
//!
//! Non-fatal events raised during an evaluation pass. The core never logs;
//! it records diagnostics on the check and forwards them to an injected
//! `Observer`, which the embedding application may route to its logger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal event observed during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A resource probe completed without yielding any metric.
    EmptyProbe { resource: String },
    /// A resource was cut short by a check error.
    ResourceFailed { resource: String, message: String },
}

impl Diagnostic {
    /// Name of the resource the diagnostic refers to.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Diagnostic::EmptyProbe { resource } | Diagnostic::ResourceFailed { resource, .. } => {
                resource
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyProbe { resource } => {
                write!(f, "resource {resource} did not produce any metric")
            }
            Diagnostic::ResourceFailed { resource, message } => {
                write!(f, "resource {resource} failed: {message}")
            }
        }
    }
}

/// Receiver for diagnostics.
pub trait Observer {
    fn notify(&self, diagnostic: &Diagnostic);
}
