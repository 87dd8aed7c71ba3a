#[path = "common/mod.rs"]
mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn ada() -> Command {
    Command::cargo_bin("ada").expect("find ada binary")
}

#[test]
fn add_start_status_stop_remove_round_trip() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "sleeper", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();

    ada().args(["start", "sleeper"]).assert().success();

    let pid_path = common::pid_file(&home, "sleeper");
    common::wait_for_path(&pid_path);
    let pid = common::read_pid(&pid_path);
    assert!(pid > 0);

    ada()
        .args(["status", "sleeper"])
        .assert()
        .success()
        .stdout(contains("running"));

    ada().args(["stop", "sleeper"]).assert().success();
    common::wait_for_path_removed(&pid_path);

    ada()
        .args(["status", "sleeper"])
        .assert()
        .success()
        .stdout(contains("stopped"));

    ada().args(["remove", "sleeper"]).assert().success();

    ada()
        .args(["status", "sleeper"])
        .assert()
        .failure()
        .stderr(contains("unknown service"));
}

#[test]
fn starting_already_running_service_is_a_noop() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "web"]).assert().success();

    let pid_path = common::pid_file(&home, "web");
    common::wait_for_path(&pid_path);
    let first_pid = common::read_pid(&pid_path);

    ada().args(["start", "web"]).assert().success();
    let second_pid = common::read_pid(&pid_path);
    assert_eq!(first_pid, second_pid);

    ada().args(["stop", "web"]).assert().success();
}

#[test]
fn restart_spawns_a_new_pid() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "web"]).assert().success();

    let pid_path = common::pid_file(&home, "web");
    common::wait_for_path(&pid_path);
    let first_pid = common::read_pid(&pid_path);

    ada().args(["restart", "web"]).assert().success();
    common::wait_for_path(&pid_path);
    let second_pid = common::read_pid(&pid_path);
    assert_ne!(first_pid, second_pid);

    ada().args(["stop", "web"]).assert().success();
}

#[test]
fn start_missing_directory_fails() {
    let _guard = common::HomeEnvGuard::new();

    ada()
        .args(["add", "broken", "--cmd", "sleep 30", "--dir", "/no/such/dir"])
        .assert()
        .success();

    ada()
        .args(["start", "broken"])
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[test]
fn remove_deletes_state_file_alongside_pid_and_config() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "web"]).assert().success();
    common::wait_for_path(&common::pid_file(&home, "web"));

    let state_path = home.join("state").join("web.json");
    assert!(state_path.exists());

    ada().args(["remove", "web"]).assert().success();

    assert!(!state_path.exists());
    assert!(!common::pid_file(&home, "web").exists());
}

#[test]
fn start_all_succeeds_even_when_one_service_fails_to_start() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "broken", "--cmd", "sleep 30", "--dir", "/no/such/dir"])
        .assert()
        .success();
    ada()
        .args(["add", "good", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();

    // One enabled service can never start; the batch must still exit 0.
    ada().args(["start", "all"]).assert().success();

    common::wait_for_path(&common::pid_file(&home, "good"));
    ada()
        .args(["status", "good"])
        .assert()
        .success()
        .stdout(contains("running"));

    ada().args(["stop", "all"]).assert().success();
    common::wait_for_path_removed(&common::pid_file(&home, "good"));
}

#[test]
fn restart_all_succeeds_even_when_one_service_fails_to_start() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "broken", "--cmd", "sleep 30", "--dir", "/no/such/dir"])
        .assert()
        .success();
    ada()
        .args(["add", "good", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "good"]).assert().success();
    common::wait_for_path(&common::pid_file(&home, "good"));

    ada().args(["restart", "all"]).assert().success();

    common::wait_for_path(&common::pid_file(&home, "good"));
    ada().args(["stop", "all"]).assert().success();
}

#[test]
fn disable_stops_a_running_service() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "web", "--cmd", "sleep 30", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "web"]).assert().success();

    let pid_path = common::pid_file(&home, "web");
    common::wait_for_path(&pid_path);

    ada().args(["disable", "web"]).assert().success();
    common::wait_for_path_removed(&pid_path);

    ada()
        .args(["status", "web"])
        .assert()
        .success()
        .stdout(contains("disabled"));
}
