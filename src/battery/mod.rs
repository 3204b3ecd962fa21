//! Test battery
//!
//! Each case is one row of a table: an operation, an input equivalence class
//! and the expected status class. `cases` holds the table and how a row is
//! executed, `context` records assertions, `runner` registers and runs the
//! suite around the fixture's setup and teardown.

use serde::Serialize;
use std::fmt;

use crate::models::{Operation, StatusKind};

pub mod cases;
pub mod context;
pub mod runner;

pub use context::{CaseContext, FatalAssertion};
pub use runner::{RunOptions, Suite, TestCase};

/// Input equivalence classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", content = "value", rename_all = "snake_case")]
pub enum InputClass {
    /// Known-good value from the fixture or settings
    Valid,
    /// Missing argument (NULL)
    Null,
    /// Empty string
    Empty,
    /// Contains characters outside the argument's alphabet
    Malformed(&'static str),
    /// Within the alphabet but structurally wrong
    WrongShape(&'static str),
    /// Enumeration called without the profile list slot
    NullProfileList,
    /// Enumeration called without the count slot
    NullCount,
}

impl InputClass {
    pub fn is_positive(&self) -> bool {
        matches!(self, InputClass::Valid)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputClass::Valid => "valid",
            InputClass::Null => "null",
            InputClass::Empty => "empty",
            InputClass::Malformed(_) => "malformed",
            InputClass::WrongShape(_) => "wrong_shape",
            InputClass::NullProfileList => "null_profile_list",
            InputClass::NullCount => "null_count",
        }
    }

    /// String argument for this class, given the valid value
    pub fn string_argument<'a>(&self, valid: &'a str) -> Option<&'a str> {
        match *self {
            InputClass::Valid => Some(valid),
            InputClass::Empty => Some(""),
            InputClass::Malformed(value) | InputClass::WrongShape(value) => Some(value),
            InputClass::Null | InputClass::NullProfileList | InputClass::NullCount => None,
        }
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputClass::Malformed(value) | InputClass::WrongShape(value) => {
                write!(f, "{} {:?}", self.label(), value)
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// One row of the battery table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseSpec {
    pub operation: Operation,
    pub input: InputClass,
    pub expected: StatusKind,
}

impl CaseSpec {
    pub const fn new(operation: Operation, input: InputClass, expected: StatusKind) -> Self {
        Self {
            operation,
            input,
            expected,
        }
    }
}
