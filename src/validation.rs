//! A ready-made validation-error family.
//!
//! Schema validators report *what* failed and *where*. [`Violations`] holds
//! that list and formats it as a single readable line:
//!
//! ```text
//! Validation error: Required at "items[0].name"; Expected number, received string at "total"
//! ```

use std::error::Error as StdError;
use std::fmt;

use crate::cause::ValidationError;

const PREFIX: &str = "Validation error";

/// One step in the path to the offending field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single failed constraint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Violation {
    pub fn new<P>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator,
        P::Item: Into<PathSegment>,
    {
        Self { path: path.into_iter().map(Into::into).collect(), message: message.into() }
    }

    /// `items[0].name`
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
            }
        }
        out
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} at \"{}\"", self.message, self.path_string())
        }
    }
}

/// Formats a list of violations as one line, `"; "`-separated.
pub fn format(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return PREFIX.to_owned();
    }
    let joined = violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    format!("{PREFIX}: {joined}")
}

/// Every constraint a payload failed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// Appends a violation. Returns `self` for chaining.
    pub fn push<P>(mut self, path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator,
        P::Item: Into<PathSegment>,
    {
        self.0.push(Violation::new(path, message));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(&self.0))
    }
}

impl StdError for Violations {}

impl ValidationError for Violations {
    fn violations(&self) -> Vec<Violation> {
        self.0.clone()
    }
}
