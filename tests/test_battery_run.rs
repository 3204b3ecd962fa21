use predicates::prelude::*;
use serde_json::Value;

mod helpers;
use helpers::{LabDir, ICCID_A};

#[test]
fn test_full_battery_passes_against_simulated_hal() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("[L1 lpa_hal] against simulated HAL (2 iccids loaded)"))
        .stdout(predicate::str::contains("Run Summary:"))
        .stdout(predicate::str::contains("Run: 30 of 30 selected (30 registered)"))
        .stdout(predicate::str::contains("Passed: 30"))
        .stdout(predicate::str::contains("Failed: 0"))
        .stdout(predicate::str::contains("FAIL").not());
}

#[test]
fn test_json_report_structure() {
    let lab = LabDir::with_two_iccids();

    let output = lab.command().arg("--json").assert().success().get_output().stdout.clone();
    let report: Value = serde_json::from_slice(&output).expect("report should be valid JSON");

    assert_eq!(report["suite"], "[L1 lpa_hal]");
    assert_eq!(report["hal"], "simulated");
    assert_eq!(report["iccid_count"], 2);
    assert_eq!(report["setup"]["outcome"], "passed");
    assert_eq!(report["teardown"]["outcome"], "passed");
    assert!(report["run_id"].is_string());

    let cases = report["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 30);
    assert_eq!(cases[0]["name"], "download_profile_from_smds.positive1");
    assert!(cases.iter().all(|c| c["outcome"] == "passed"));

    let summary = &report["summary"];
    assert_eq!(summary["run"], 30);
    assert_eq!(summary["passed"], 30);
    assert_eq!(summary["failed"], 0);
    assert!(summary.get("interrupted").is_none());
}

#[test]
fn test_positive_identifier_cases_exercise_every_iccid() {
    let lab = LabDir::with_two_iccids();

    let output = lab
        .command()
        .args(["--json", "--case", "enable_profile.positive1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&output).unwrap();

    let assertions = report["cases"][0]["assertions"].as_array().unwrap();
    assert_eq!(assertions.len(), 2);
    assert!(assertions[0]["description"].as_str().unwrap().contains(ICCID_A));
}

#[test]
fn test_case_filter_limits_run() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .args(["--case", "get_eid", "--case", "get_euicc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS  get_eid.positive1"))
        .stdout(predicate::str::contains("PASS  get_euicc.positive1"))
        .stdout(predicate::str::contains("Run: 2 of 2 selected (30 registered)"))
        .stdout(predicate::str::contains("enable_profile").not());
}

#[test]
fn test_case_filter_matching_nothing_runs_nothing() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .args(["--case", "no_such_case"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run: 0 of 0 selected (30 registered)"));
}

#[test]
fn test_list_does_not_need_iccid_config() {
    let lab = LabDir::new();

    lab.command()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("download_profile_from_smds.negative3"))
        .stdout(predicate::str::contains("cellular_esim_get_profile_info"))
        .stdout(predicate::str::contains("30 of 30 cases"));
}

#[test]
fn test_required_iccids_abandon_battery() {
    let lab = LabDir::new();
    lab.write_config(r#"{"iccid": []}"#);
    lab.write_settings("[suite]\nrequire_iccids = true\n");

    lab.command()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Setup: FAILED"))
        .stdout(predicate::str::contains("Not run: 30"));
}

#[test]
fn test_empty_iccid_list_still_runs() {
    let lab = LabDir::new();
    lab.write_config(r#"{"iccid": []}"#);

    lab.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 iccids loaded)"))
        .stdout(predicate::str::contains("Passed: 30"));
}

#[cfg(not(feature = "vendor-hal"))]
#[test]
fn test_vendor_backend_unavailable_without_feature() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .args(["--hal", "vendor"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("vendor-hal"));
}

#[test]
fn test_logs_go_to_stderr() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .env_remove("LPA_CONFORMANCE_LOG")
        .args(["--json", "--case", "get_eid", "--log-level", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Suite starting | "))
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_log_env_filter_overrides_log_level() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .env("LPA_CONFORMANCE_LOG", "off")
        .args(["--case", "get_eid", "--log-level", "debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Suite starting").not());
}

#[test]
fn test_quiet_suppresses_info_events() {
    let lab = LabDir::with_two_iccids();

    lab.command()
        .env_remove("LPA_CONFORMANCE_LOG")
        .args(["--case", "get_eid", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Suite starting").not())
        .stdout(predicate::str::contains("PASS  get_eid.positive1"));
}
