//! Assertion recording for a running case

use log::{error, info, Level};
use serde_json::json;
use std::fmt::Display;

use crate::logging;
use crate::models::{AssertionRecord, HalStatus, StatusKind};

/// Raised by [`CaseContext::fail_fatal`]; aborts the current case only
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fatal assertion: {0}")]
pub struct FatalAssertion(pub String);

/// Collects the assertions made while one case runs
#[derive(Debug)]
pub struct CaseContext<'a> {
    case: &'a str,
    assertions: Vec<AssertionRecord>,
}

impl<'a> CaseContext<'a> {
    pub fn new(case: &'a str) -> Self {
        Self {
            case,
            assertions: Vec::new(),
        }
    }

    /// Log a line tied to this case
    pub fn log(&self, message: impl Display) {
        info!("[{}] {}", self.case, message);
    }

    /// Compare a returned status against the expected class
    pub fn assert_status(&mut self, call: &str, observed: HalStatus, expected: StatusKind) -> bool {
        self.log(format_args!("{} Return result: {}", call, observed.code()));
        self.check(
            format!("{} returns {}", call, expected),
            observed,
            expected,
            observed.kind() == expected,
        )
    }

    /// Record a non-fatal check
    pub fn check(
        &mut self,
        description: impl Into<String>,
        observed: impl Display,
        expected: impl Display,
        passed: bool,
    ) -> bool {
        self.record(description.into(), observed.to_string(), expected.to_string(), passed, false);
        passed
    }

    /// Record a failure that stops the case; propagate the result with `?`
    pub fn fail_fatal(&mut self, description: impl Into<String>) -> FatalAssertion {
        let description = description.into();
        self.record(description.clone(), "failure".to_string(), "success".to_string(), false, true);
        FatalAssertion(description)
    }

    pub fn failed(&self) -> bool {
        self.assertions.iter().any(|a| !a.passed)
    }

    pub fn assertions(&self) -> &[AssertionRecord] {
        &self.assertions
    }

    pub fn into_assertions(self) -> Vec<AssertionRecord> {
        self.assertions
    }

    fn record(&mut self, description: String, observed: String, expected: String, passed: bool, fatal: bool) {
        let level = if passed { Level::Info } else { Level::Error };
        logging::event(
            level,
            if passed { "assertion passed" } else { "assertion failed" },
            &json!({
                "case": self.case,
                "check": description,
                "observed": observed,
                "expected": expected,
                "fatal": fatal,
            }),
        );
        if !passed && fatal {
            error!("[{}] aborting case", self.case);
        }
        self.assertions.push(AssertionRecord {
            description,
            observed,
            expected,
            passed,
            fatal,
        });
    }
}
