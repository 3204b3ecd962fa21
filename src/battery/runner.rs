//! Suite registration and sequential execution
//!
//! A [`Suite`] owns the ordered case list. [`Suite::run`] performs fixture
//! setup (fatal on failure), runs the selected cases one after another with
//! failure isolation, always performs teardown once setup succeeded, and
//! aggregates a [`SuiteReport`].

use chrono::Utc;
use log::{error, info, warn, Level};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::{cases, CaseContext, CaseSpec};
use crate::constants::SUITE_NAME;
use crate::filter::case_matches_filters;
use crate::fixture::{Fixture, LpaSession};
use crate::hal::LpaHal;
use crate::logging;
use crate::models::{
    CaseOutcome, CaseResult, HookOutcome, SuiteReport, SuiteSummary,
};

/// A registered case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub spec: CaseSpec,
}

/// Knobs for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// `--case` filters; empty selects every case
    pub filters: Vec<String>,
    /// Set by the signal handler; checked between cases
    pub interrupted: Option<Arc<AtomicBool>>,
}

impl RunOptions {
    fn is_interrupted(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Named, ordered collection of cases
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// The full L1 battery
    pub fn l1() -> Self {
        let mut suite = Suite::new(SUITE_NAME);
        for spec in cases::L1_TABLE {
            suite.register(*spec);
        }
        suite
    }

    /// Register a case; its name is `<operation>.<positiveN|negativeN>`
    pub fn register(&mut self, spec: CaseSpec) -> &str {
        let polarity = if spec.input.is_positive() { "positive" } else { "negative" };
        let ordinal = 1 + self
            .cases
            .iter()
            .filter(|case| {
                case.spec.operation == spec.operation
                    && case.spec.input.is_positive() == spec.input.is_positive()
            })
            .count();
        let name = format!("{}.{}{}", spec.operation.name(), polarity, ordinal);
        self.cases.push(TestCase { name, spec });
        &self.cases[self.cases.len() - 1].name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Cases matching the filters, in registration order
    pub fn select<'s>(&'s self, filters: &'s [String]) -> impl Iterator<Item = &'s TestCase> + 's {
        self.cases
            .iter()
            .filter(move |case| case_matches_filters(&case.name, filters))
    }

    /// Run the selected cases inside one LPA session
    pub fn run(&self, hal: &mut dyn LpaHal, fixture: &Fixture, options: &RunOptions) -> SuiteReport {
        let start = Instant::now();
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let selected: Vec<&TestCase> = self.select(&options.filters).collect();

        logging::event(
            Level::Info,
            "Suite starting",
            &json!({
                "suite": self.name,
                "run_id": run_id.to_string(),
                "hal": hal.name(),
                "registered": self.cases.len(),
                "selected": selected.len(),
                "iccid_count": fixture.iccids().len(),
            }),
        );

        let mut results = Vec::with_capacity(selected.len());
        let (setup, teardown) = match LpaSession::open(hal, fixture) {
            Ok(session) => {
                for case in &selected {
                    if options.is_interrupted() {
                        results.push(not_run(case));
                        continue;
                    }
                    results.push(run_case(case, hal, fixture));
                }

                let status = session.close(hal);
                let teardown = if status.is_ok() {
                    HookOutcome::Passed
                } else {
                    HookOutcome::Failed(format!("LPA exit failed with {}", status))
                };
                (HookOutcome::Passed, teardown)
            }
            Err(err) => {
                error!("Suite setup failed, abandoning battery: {}", err);
                results.extend(selected.iter().map(|case| not_run(case)));
                (HookOutcome::Failed(err.to_string()), HookOutcome::NotRun)
            }
        };

        let interrupted = options.is_interrupted();
        if interrupted {
            warn!("Run interrupted; remaining cases were not run");
        }

        let summary = summarize(
            self.cases.len(),
            &results,
            start.elapsed().as_millis() as u64,
            interrupted,
        );
        info!(
            "Run Summary: {} run, {} passed, {} failed, {} not run",
            summary.run, summary.passed, summary.failed, summary.not_run
        );

        SuiteReport {
            suite: self.name.clone(),
            run_id,
            started_at,
            hal: hal.name().to_string(),
            iccid_count: fixture.iccids().len(),
            setup,
            teardown,
            cases: results,
            summary,
        }
    }
}

fn run_case(case: &TestCase, hal: &mut dyn LpaHal, fixture: &Fixture) -> CaseResult {
    let start = Instant::now();
    logging::event(
        Level::Info,
        &format!("Entering {}", case.name),
        &json!({
            "case": case.name,
            "operation": case.spec.operation.name(),
            "input": case.spec.input.to_string(),
            "expected": case.spec.expected,
        }),
    );

    let mut ctx = CaseContext::new(&case.name);
    let aborted = match cases::execute(&case.spec, &mut ctx, hal, fixture) {
        Ok(()) => false,
        Err(fatal) => {
            warn!("[{}] {}", case.name, fatal);
            true
        }
    };

    let outcome = if ctx.failed() {
        CaseOutcome::Failed
    } else {
        CaseOutcome::Passed
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    logging::event(
        Level::Info,
        &format!("Exiting {}", case.name),
        &json!({
            "case": case.name,
            "outcome": outcome,
            "assertions": ctx.assertions().len(),
            "duration_ms": duration_ms,
        }),
    );

    CaseResult {
        name: case.name.clone(),
        operation: case.spec.operation,
        input: case.spec.input.to_string(),
        expected: case.spec.expected,
        outcome,
        assertions: ctx.into_assertions(),
        duration_ms,
        aborted,
    }
}

fn not_run(case: &TestCase) -> CaseResult {
    CaseResult {
        name: case.name.clone(),
        operation: case.spec.operation,
        input: case.spec.input.to_string(),
        expected: case.spec.expected,
        outcome: CaseOutcome::NotRun,
        assertions: Vec::new(),
        duration_ms: 0,
        aborted: false,
    }
}

fn summarize(registered: usize, results: &[CaseResult], duration_ms: u64, interrupted: bool) -> SuiteSummary {
    let count = |outcome: CaseOutcome| results.iter().filter(|r| r.outcome == outcome).count();
    let (assertions_passed, assertions_failed) = results
        .iter()
        .flat_map(|r| r.assertions.iter())
        .fold((0, 0), |(ok, failed), a| if a.passed { (ok + 1, failed) } else { (ok, failed + 1) });

    SuiteSummary {
        registered,
        selected: results.len(),
        run: results.len() - count(CaseOutcome::NotRun),
        passed: count(CaseOutcome::Passed),
        failed: count(CaseOutcome::Failed),
        not_run: count(CaseOutcome::NotRun),
        assertions_passed,
        assertions_failed,
        duration_ms,
        interrupted: interrupted.then_some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::InputClass;
    use crate::config::SuiteSettings;
    use crate::fixture::IccidCollection;
    use crate::hal::simulated::SimulatedEuicc;
    use crate::models::{Operation, StatusKind};

    fn fixture() -> Fixture {
        Fixture::new(
            IccidCollection::from_entries(vec![
                "98410800004860024951".to_string(),
                "98109909002143658739".to_string(),
            ]),
            SuiteSettings::default(),
        )
    }

    #[test]
    fn test_l1_registration_names() {
        let suite = Suite::l1();
        let names: Vec<&str> = suite.cases().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 30);
        assert_eq!(names[0], "download_profile_from_smds.positive1");
        assert_eq!(names[3], "download_profile_from_smds.negative3");
        assert_eq!(names[15], "enable_profile.negative4");
        assert_eq!(names[29], "get_euicc.positive1");
        assert_eq!(suite.name(), "[L1 lpa_hal]");
    }

    #[test]
    fn test_register_returns_generated_name() {
        let mut suite = Suite::new("custom");
        let spec = CaseSpec::new(Operation::GetEid, InputClass::Valid, StatusKind::Ok);
        assert_eq!(suite.register(spec), "get_eid.positive1");
        assert_eq!(suite.register(spec), "get_eid.positive2");
    }

    #[test]
    fn test_full_battery_passes_on_simulated_card() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture);
        let report = Suite::l1().run(&mut card, &fixture, &RunOptions::default());

        assert!(report.all_passed(), "{:#?}", report.cases.iter().filter(|c| c.outcome != CaseOutcome::Passed).collect::<Vec<_>>());
        assert_eq!(report.summary.run, 30);
        assert_eq!(report.summary.passed, 30);
        assert_eq!(report.setup, HookOutcome::Passed);
        assert_eq!(report.teardown, HookOutcome::Passed);
        assert_eq!(report.iccid_count, 2);
        assert!(!card.is_session_open());
        // enable, disable and delete each ran once per ICCID
        assert!(card.profiles().is_empty());
    }

    #[test]
    fn test_setup_failure_abandons_battery() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture).with_fault(Operation::LpaInit);
        let report = Suite::l1().run(&mut card, &fixture, &RunOptions::default());

        assert!(report.setup.is_failed());
        assert_eq!(report.teardown, HookOutcome::NotRun);
        assert_eq!(report.summary.run, 0);
        assert_eq!(report.summary.not_run, 30);
        assert!(report.cases.iter().all(|c| c.outcome == CaseOutcome::NotRun));
        assert!(!report.all_passed());
    }

    #[test]
    fn test_failure_is_isolated_to_its_cases() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture).with_fault(Operation::GetEid);
        let report = Suite::l1().run(&mut card, &fixture, &RunOptions::default());

        let failed: Vec<&str> = report
            .cases
            .iter()
            .filter(|c| c.outcome == CaseOutcome::Failed)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(failed, vec!["get_eid.positive1"]);
        assert_eq!(report.summary.passed, 29);
        assert_eq!(report.summary.run, 30);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_teardown_failure_reported() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture).with_fault(Operation::LpaExit);
        let report = Suite::l1().run(&mut card, &fixture, &RunOptions::default());

        assert_eq!(report.setup, HookOutcome::Passed);
        assert!(report.teardown.is_failed());
        assert!(!report.all_passed());
    }

    #[test]
    fn test_filters_select_cases() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture);
        let options = RunOptions {
            filters: vec!["enable_profile.*".to_string()],
            ..RunOptions::default()
        };
        let report = Suite::l1().run(&mut card, &fixture, &options);

        assert_eq!(report.summary.registered, 30);
        assert_eq!(report.summary.selected, 5);
        assert!(report.cases.iter().all(|c| c.operation == Operation::EnableProfile));
        assert!(report.all_passed());
    }

    #[test]
    fn test_interrupted_run_skips_remaining_cases() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture);
        let flag = Arc::new(AtomicBool::new(true));
        let options = RunOptions {
            filters: Vec::new(),
            interrupted: Some(flag),
        };
        let report = Suite::l1().run(&mut card, &fixture, &options);

        assert_eq!(report.summary.run, 0);
        assert_eq!(report.summary.interrupted, Some(true));
        assert_eq!(report.teardown, HookOutcome::Passed);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_summary_counts_assertions() {
        let fixture = fixture();
        let mut card = SimulatedEuicc::from_fixture(&fixture);
        let options = RunOptions {
            filters: vec!["disable_profile.positive1".to_string()],
            ..RunOptions::default()
        };
        let report = Suite::l1().run(&mut card, &fixture, &options);
        assert_eq!(report.summary.assertions_passed, 2);
        assert_eq!(report.summary.assertions_failed, 0);
    }
}
