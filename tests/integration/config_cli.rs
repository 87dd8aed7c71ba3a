#[path = "common/mod.rs"]
mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn ada() -> Command {
    Command::cargo_bin("ada").expect("find ada binary")
}

#[test]
fn add_rejects_duplicate_names() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn add_rejects_malformed_names() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["add", "-bad-name", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .failure()
        .stderr(contains("invalid service name"));
}

#[test]
fn enable_and_disable_toggle_status() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();

    ada()
        .args(["status", "web"])
        .assert()
        .success()
        .stdout(contains("stopped"));

    ada().args(["disable", "web"]).assert().success();
    ada()
        .args(["status", "web"])
        .assert()
        .success()
        .stdout(contains("disabled"));

    ada().args(["enable", "web"]).assert().success();
    ada()
        .args(["status", "web"])
        .assert()
        .success()
        .stdout(contains("stopped"));
}

#[test]
fn remove_unknown_service_fails() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["remove", "ghost"])
        .assert()
        .failure()
        .stderr(contains("not defined"));
}

#[test]
fn status_with_no_services_prints_placeholder() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["status"])
        .assert()
        .success()
        .stdout(contains("no services configured"));
}
