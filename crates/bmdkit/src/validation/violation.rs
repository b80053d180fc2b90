//! Field-level violation records returned by every validator.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One segment of a JSON path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<String> for LocSegment {
    fn from(key: String) -> Self {
        LocSegment::Key(key)
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Index(i) => write!(f, "{}", i),
            LocSegment::Key(k) => write!(f, "{}", k),
        }
    }
}

/// Kind of constraint a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent.
    Missing,
    /// Value has the wrong JSON type.
    InvalidType,
    /// Numeric value outside its allowed range.
    OutOfRange,
    /// Value not one of the allowed choices.
    InvalidChoice,
    /// Sequence shorter than its minimum length.
    TooShort,
    /// Sequence longer than its maximum length.
    TooLong,
    /// Parallel sequences with different lengths.
    LengthMismatch,
    /// Any other rule violation.
    Invalid,
}

impl ViolationKind {
    /// Get a human-readable label for the violation kind.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "Missing",
            ViolationKind::InvalidType => "Invalid Type",
            ViolationKind::OutOfRange => "Out of Range",
            ViolationKind::InvalidChoice => "Invalid Choice",
            ViolationKind::TooShort => "Too Short",
            ViolationKind::TooLong => "Too Long",
            ViolationKind::LengthMismatch => "Length Mismatch",
            ViolationKind::Invalid => "Invalid",
        }
    }
}

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path to the offending value, e.g. `["options", 0, "confidence_level"]`.
    pub loc: Vec<LocSegment>,
    /// Constraint that was violated.
    pub kind: ViolationKind,
    /// Human-readable message.
    pub message: String,
    /// The offending input value, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldViolation {
    /// Create a new violation at the given path.
    pub fn new(loc: Vec<LocSegment>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            loc,
            kind,
            message: message.into(),
            input: None,
        }
    }

    /// Attach the offending input value.
    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Dotted path, e.g. `options.0.confidence_level`. Empty for the root.
    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        if path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", path, self.message)
        }
    }
}

/// The full set of violations found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-violation set.
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// Append another set, prefixing each of its paths with `prefix`.
    pub fn extend_nested(&mut self, prefix: &[LocSegment], other: ValidationErrors) {
        for mut violation in other.violations {
            let mut loc = prefix.to_vec();
            loc.append(&mut violation.loc);
            violation.loc = loc;
            self.violations.push(violation);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.violations.iter()
    }

    /// Messages grouped by dotted path, in first-seen order.
    pub fn by_field(&self) -> IndexMap<String, Vec<String>> {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        for violation in &self.violations {
            grouped
                .entry(violation.path())
                .or_default()
                .push(violation.message.clone());
        }
        grouped
    }

    /// `Ok(value)` when no violations were recorded.
    pub fn into_result<T>(self, value: T) -> crate::Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self.into())
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.violations.len() == 1 { "error" } else { "errors" };
        write!(f, "{} validation {}", self.violations.len(), noun)?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Build a path from mixed segments: `loc!["options", 0, "bmr_value"]`.
#[macro_export]
macro_rules! loc {
    ($($seg:expr),* $(,)?) => {
        vec![$($crate::validation::LocSegment::from($seg)),*]
    };
}
