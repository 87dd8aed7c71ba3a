#[path = "common/mod.rs"]
mod common;

use std::process::Stdio;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use predicates::str::contains;

use assert_cmd::Command;

fn ada() -> Command {
    Command::cargo_bin("ada").expect("find ada binary")
}

#[test]
fn watch_auto_restarts_a_stopped_service() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    ada()
        .args(["add", "web", "--cmd", "sleep 1", "--dir", "/tmp"])
        .assert()
        .success();
    ada().args(["start", "web"]).assert().success();

    let pid_path = common::pid_file(&home, "web");
    common::wait_for_path(&pid_path);
    let first_pid = common::read_pid(&pid_path);

    let mut watcher = std::process::Command::new(cargo_bin("ada"))
        .env("ADA_HOME", &home)
        .arg("watch")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ada watch");

    let lock_path = home.join("supervisor.lock");
    common::wait_for_path(&lock_path);

    // Wait for the initial process to exit, then for the supervisor to
    // notice and respawn it under a different PID.
    common::wait_for_process_exit(first_pid);
    let deadline = std::time::Instant::now() + Duration::from_secs(15);
    let mut respawned = false;
    while std::time::Instant::now() < deadline {
        if pid_path.exists() {
            if let Ok(raw) = std::fs::read_to_string(&pid_path) {
                if let Ok(pid) = raw.trim().parse::<u32>() {
                    if pid != first_pid {
                        respawned = true;
                        break;
                    }
                }
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    assert!(respawned, "supervisor did not respawn the stopped service");

    unsafe {
        libc::kill(watcher.id() as i32, libc::SIGTERM);
    }
    let _ = watcher.wait();
    common::wait_for_path_removed(&lock_path);

    ada().args(["stop", "web"]).assert().success();
}

#[test]
fn status_reports_supervisor_running_while_watch_is_active() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    let mut watcher = std::process::Command::new(cargo_bin("ada"))
        .env("ADA_HOME", &home)
        .arg("watch")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ada watch");

    let lock_path = home.join("supervisor.lock");
    common::wait_for_path(&lock_path);

    ada()
        .env("ADA_HOME", &home)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("supervisor: running"));

    unsafe {
        libc::kill(watcher.id() as i32, libc::SIGTERM);
    }
    let _ = watcher.wait();
    common::wait_for_path_removed(&lock_path);
}

#[test]
fn second_watch_refuses_to_start_while_one_is_running() {
    let guard = common::HomeEnvGuard::new();
    let home = guard.path().to_path_buf();

    let mut watcher = std::process::Command::new(cargo_bin("ada"))
        .env("ADA_HOME", &home)
        .arg("watch")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ada watch");

    let lock_path = home.join("supervisor.lock");
    common::wait_for_path(&lock_path);

    ada()
        .env("ADA_HOME", &home)
        .arg("watch")
        .assert()
        .failure()
        .stderr(contains("already running"));

    unsafe {
        libc::kill(watcher.id() as i32, libc::SIGTERM);
    }
    let _ = watcher.wait();
    common::wait_for_path_removed(&lock_path);
}
