use predicates::prelude::*;

mod helpers;
use helpers::LabDir;

#[test]
fn test_zero_byte_config_is_fatal() {
    let lab = LabDir::new();
    lab.write_config("");

    lab.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is empty"))
        .stdout(predicate::str::contains("Run Summary").not());
}

#[test]
fn test_missing_config_is_fatal() {
    let lab = LabDir::new();

    lab.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot open ICCID config"))
        .stderr(predicate::str::contains("--iccid-config"));
}

#[test]
fn test_malformed_json_is_fatal() {
    let lab = LabDir::new();
    lab.write_config(r#"{"iccid": ["98410800004860024951""#);

    lab.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_missing_iccid_field_is_fatal() {
    let lab = LabDir::new();
    lab.write_config(r#"{"profiles": []}"#);

    lab.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("`iccid`"));
}

#[test]
fn test_default_config_location_is_working_directory() {
    let lab = LabDir::with_two_iccids();

    let mut cmd = assert_cmd::cargo_bin_cmd!("lpa-conformance");
    cmd.current_dir(lab.path())
        .arg("--settings")
        .arg(lab.settings_path())
        .args(["--case", "get_eid"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(2 iccids loaded)"));
}

#[test]
fn test_invalid_settings_are_fatal() {
    let lab = LabDir::with_two_iccids();
    lab.write_settings("[suite]\niccid_size = 0\n");

    lab.command()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load settings"));
}

#[test]
fn test_unparseable_settings_are_fatal() {
    let lab = LabDir::with_two_iccids();
    lab.write_settings("[suite\n");

    lab.command().assert().code(2);
}
