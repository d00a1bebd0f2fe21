//! # Threshold Ranges
//!
//! Nagios threshold range syntax: `[@][start:]end`.
//!
//! | Spec      | Matches                     |
//! |-----------|-----------------------------|
//! | `10`      | `0 <= v <= 10`              |
//! | `10:`     | `10 <= v`                   |
//! | `~:10`    | `v <= 10`                   |
//! | `10:20`   | `10 <= v <= 20`             |
//! | `@10:20`  | `v < 10` or `v > 20`        |
//! | (empty)   | `0 <= v`                    |
//!
//! A value that does *not* match a threshold range is in violation of it.

use crate::VigilError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed interval with optional inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Range {
    start: f64,
    end: f64,
    invert: bool,
}

impl Range {
    /// Create a range from explicit bounds.
    ///
    /// Use `f64::NEG_INFINITY` / `f64::INFINITY` for open ends.
    pub fn new(start: f64, end: f64) -> Result<Self, VigilError> {
        if start.is_nan() || end.is_nan() {
            return Err(VigilError::InvalidRange {
                spec: format!("{start}:{end}"),
                reason: "bounds must be numbers".to_string(),
            });
        }
        if start > end {
            return Err(VigilError::InvalidRange {
                spec: format!("{start}:{end}"),
                reason: format!("start {start} must not be greater than end {end}"),
            });
        }
        Ok(Self {
            start,
            end,
            invert: false,
        })
    }

    /// Parse a Nagios range specification.
    pub fn parse(spec: &str) -> Result<Self, VigilError> {
        let invalid = |reason: String| VigilError::InvalidRange {
            spec: spec.to_string(),
            reason,
        };

        let trimmed = spec.trim();
        let (invert, body) = match trimmed.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (start_atom, end_atom) = match body.split_once(':') {
            Some((_, end)) if end.contains(':') => {
                return Err(invalid("more than one ':' separator".to_string()));
            }
            Some((start, end)) => (start, end),
            None => ("", body),
        };

        let start = if start_atom == "~" {
            f64::NEG_INFINITY
        } else {
            parse_atom(start_atom, 0.0).map_err(&invalid)?
        };
        let end = parse_atom(end_atom, f64::INFINITY).map_err(&invalid)?;

        if start > end {
            return Err(invalid(format!(
                "start {start} must not be greater than end {end}"
            )));
        }

        Ok(Self { start, end, invert })
    }

    /// Lower bound (may be negative infinity).
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound (may be infinity).
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether the match is inverted (`@` prefix).
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Check whether a value lies within the range.
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        let inside = self.start <= value && value <= self.end;
        inside != self.invert
    }

    /// Human-readable description of what a non-matching value violated.
    #[must_use]
    pub fn violation(&self) -> String {
        if self.invert {
            format!("inside range {}", self.bounds())
        } else {
            format!("outside range {}", self.bounds())
        }
    }

    fn bounds(&self) -> String {
        let mut out = String::new();
        if self.start == f64::NEG_INFINITY {
            out.push_str("~:");
        } else if self.start != 0.0 {
            out.push_str(&format!("{}:", self.start));
        }
        if self.end != f64::INFINITY {
            out.push_str(&format!("{}", self.end));
        }
        out
    }
}

fn parse_atom(atom: &str, default: f64) -> Result<f64, String> {
    let atom = atom.trim();
    if atom.is_empty() {
        return Ok(default);
    }
    match atom.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("'{atom}' is not a number")),
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("@")?;
        }
        f.write_str(&self.bounds())
    }
}

impl FromStr for Range {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Range {
    type Error = VigilError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Range> for String {
    fn from(range: Range) -> Self {
        range.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
