use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn detect_identifies_xml_export() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("junos-inventory"));
    cmd.arg("detect")
        .arg(fixture("fixtures/junos/core1-re0.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "format=junos-xml producer=juniper_conf encoding=xml",
        ));
}

#[test]
fn detect_identifies_restconf_tree() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("junos-inventory"));
    cmd.arg("detect")
        .arg(fixture("fixtures/nso/edge1-device.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "format=junos-restconf producer=nso_juniper encoding=json",
        ));
}

#[test]
fn detect_reports_unknown_vendor() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("junos-inventory"));
    cmd.arg("detect")
        .arg(fixture("fixtures/nso/arista-device.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("format=unknown encoding=json"));
}

#[test]
fn detect_fails_on_malformed_input() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("junos-inventory"));
    cmd.arg("detect")
        .arg(fixture("fixtures/junos/malformed.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}
