//! Output formatting module
//!
//! Handles:
//! - Human-readable run reports
//! - JSON reports (the `SuiteReport` model serialized as-is)
//! - The `--list` case listing

use anyhow::Result;
use std::io::{self, Write};

use lpa_conformance::battery::Suite;
use lpa_conformance::filter::case_matches_filters;
use lpa_conformance::models::{CaseOutcome, HookOutcome, SuiteReport};

/// Print the report in human-readable format
pub fn format_human(report: &SuiteReport) -> Result<()> {
    let stdout = io::stdout();
    write_human(&mut stdout.lock(), report)
}

/// Print the report as pretty JSON
pub fn format_json(report: &SuiteReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn hook_line(outcome: &HookOutcome) -> String {
    match outcome {
        HookOutcome::Passed => "passed".to_string(),
        HookOutcome::Failed(reason) => format!("FAILED ({})", reason),
        HookOutcome::NotRun => "not run".to_string(),
    }
}

pub fn write_human<W: Write>(out: &mut W, report: &SuiteReport) -> Result<()> {
    writeln!(
        out,
        "{} against {} HAL ({} iccid{} loaded)",
        report.suite,
        report.hal,
        report.iccid_count,
        if report.iccid_count == 1 { "" } else { "s" }
    )?;
    writeln!(out, "Setup: {}\n", hook_line(&report.setup))?;

    for case in &report.cases {
        let tag = match case.outcome {
            CaseOutcome::Passed => "PASS",
            CaseOutcome::Failed => "FAIL",
            CaseOutcome::NotRun => "SKIP",
        };
        writeln!(out, "  {}  {}  [{}]", tag, case.name, case.input)?;
        for failed in case.failed_assertions() {
            writeln!(
                out,
                "        - {}: observed {}, expected {}",
                failed.description, failed.observed, failed.expected
            )?;
        }
    }
    if !report.cases.is_empty() {
        writeln!(out)?;
    }

    let summary = &report.summary;
    writeln!(out, "Run Summary:")?;
    writeln!(
        out,
        "  Run: {} of {} selected ({} registered)",
        summary.run, summary.selected, summary.registered
    )?;
    writeln!(out, "  Passed: {}", summary.passed)?;
    writeln!(out, "  Failed: {}", summary.failed)?;
    if summary.not_run > 0 {
        writeln!(out, "  Not run: {}", summary.not_run)?;
    }
    writeln!(
        out,
        "  Assertions: {} passed, {} failed",
        summary.assertions_passed, summary.assertions_failed
    )?;

    let duration_sec = summary.duration_ms as f64 / 1000.0;
    if duration_sec < 1.0 {
        writeln!(out, "  Duration: {}ms", summary.duration_ms)?;
    } else {
        writeln!(out, "  Duration: {:.2}s", duration_sec)?;
    }
    writeln!(out, "  Teardown: {}", hook_line(&report.teardown))?;

    if let Some(true) = summary.interrupted {
        writeln!(out, "  Status: Interrupted by user")?;
    }
    writeln!(out, "  Run ID: {}", report.run_id)?;

    Ok(())
}

/// Print registered cases matching the filters
pub fn list_cases(suite: &Suite, filters: &[String]) -> Result<()> {
    let stdout = io::stdout();
    write_case_list(&mut stdout.lock(), suite, filters)
}

pub fn write_case_list<W: Write>(out: &mut W, suite: &Suite, filters: &[String]) -> Result<()> {
    writeln!(out, "{}", suite.name())?;
    let mut listed = 0;
    for case in suite.cases().iter().filter(|c| case_matches_filters(&c.name, filters)) {
        writeln!(
            out,
            "  {:<42} {:<50} {} -> {}",
            case.name,
            case.spec.operation.symbol(),
            case.spec.input,
            case.spec.expected
        )?;
        listed += 1;
    }
    writeln!(out, "{} of {} cases", listed, suite.cases().len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lpa_conformance::models::{
        AssertionRecord, CaseResult, Operation, StatusKind, SuiteSummary,
    };
    use uuid::Uuid;

    fn report() -> SuiteReport {
        SuiteReport {
            suite: "[L1 lpa_hal]".to_string(),
            run_id: Uuid::nil(),
            started_at: Utc::now(),
            hal: "simulated".to_string(),
            iccid_count: 1,
            setup: HookOutcome::Passed,
            teardown: HookOutcome::Passed,
            cases: vec![CaseResult {
                name: "get_eid.positive1".to_string(),
                operation: Operation::GetEid,
                input: "valid".to_string(),
                expected: StatusKind::Ok,
                outcome: CaseOutcome::Failed,
                assertions: vec![AssertionRecord {
                    description: "cellular_esim_get_eid returns RETURN_OK".to_string(),
                    observed: "RETURN_ERR(-1)".to_string(),
                    expected: "RETURN_OK".to_string(),
                    passed: false,
                    fatal: false,
                }],
                duration_ms: 1,
                aborted: false,
            }],
            summary: SuiteSummary {
                registered: 30,
                selected: 1,
                run: 1,
                failed: 1,
                assertions_failed: 1,
                duration_ms: 42,
                ..SuiteSummary::default()
            },
        }
    }

    #[test]
    fn test_human_report_lists_failures_and_summary() {
        let mut out = Vec::new();
        write_human(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[L1 lpa_hal] against simulated HAL (1 iccid loaded)"));
        assert!(text.contains("FAIL  get_eid.positive1"));
        assert!(text.contains("observed RETURN_ERR(-1), expected RETURN_OK"));
        assert!(text.contains("Run: 1 of 1 selected (30 registered)"));
        assert!(text.contains("Duration: 42ms"));
        assert!(!text.contains("Interrupted"));
    }

    #[test]
    fn test_human_report_interrupted_status() {
        let mut r = report();
        r.summary.interrupted = Some(true);
        r.teardown = HookOutcome::Failed("LPA exit failed".to_string());
        let mut out = Vec::new();
        write_human(&mut out, &r).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Status: Interrupted by user"));
        assert!(text.contains("Teardown: FAILED (LPA exit failed)"));
    }

    #[test]
    fn test_case_list_respects_filters() {
        let suite = Suite::l1();
        let mut out = Vec::new();
        write_case_list(&mut out, &suite, &["lpa_*".to_string()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("lpa_init.positive1"));
        assert!(text.contains("cellular_esim_lpa_exit"));
        assert!(!text.contains("get_eid"));
        assert!(text.contains("2 of 30 cases"));
    }
}
