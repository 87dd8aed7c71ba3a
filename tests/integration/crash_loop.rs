#[path = "common/mod.rs"]
mod common;

use std::time::Duration;

use ada::config::{ConfigStore, Service};
use ada::constants::CRASH_LOOP_THRESHOLD;
use ada::paths::Paths;
use ada::process;
use ada::status::{classify, ServiceState};
use ada::supervisor::Supervisor;

fn short_lived_service(name: &str) -> Service {
    Service {
        name: name.to_string(),
        cmd: "sleep 1".to_string(),
        dir: "/tmp".to_string(),
        env_file: None,
        enabled: true,
    }
}

#[test]
fn repeated_crashes_trip_crash_loop_and_stop_auto_restart() {
    let guard = common::HomeEnvGuard::new();
    let paths = Paths::from_root(guard.path());

    let service = short_lived_service("flaky");
    ConfigStore::new(&paths).add(service.clone()).unwrap();

    // The first start must succeed so the supervisor considers this
    // service "previously started" and eligible for auto-restart.
    process::start(&paths, &service).unwrap();

    let supervisor = Supervisor::new(&paths).with_interval(Duration::from_millis(50));

    for _ in 0..CRASH_LOOP_THRESHOLD + 1 {
        // Let the 1 second sleep finish before the next poll notices it's gone.
        std::thread::sleep(Duration::from_millis(1100));
        supervisor.poll_once().unwrap();
    }

    let entry = classify(&paths, &service).unwrap();
    assert_eq!(entry.state, ServiceState::CrashLoop);

    // One more poll with the flag set must not attempt another restart.
    let before = ada::state::StateStore::new(&paths).load(&service.name).unwrap();
    std::thread::sleep(Duration::from_millis(1100));
    supervisor.poll_once().unwrap();
    let after = ada::state::StateStore::new(&paths).load(&service.name).unwrap();
    assert_eq!(before.restart_count, after.restart_count);
}

#[test]
fn restart_clears_crash_loop() {
    let guard = common::HomeEnvGuard::new();
    let paths = Paths::from_root(guard.path());

    let service = short_lived_service("flaky");
    ConfigStore::new(&paths).add(service.clone()).unwrap();
    process::start(&paths, &service).unwrap();

    let supervisor = Supervisor::new(&paths).with_interval(Duration::from_millis(50));
    for _ in 0..CRASH_LOOP_THRESHOLD + 1 {
        std::thread::sleep(Duration::from_millis(1100));
        supervisor.poll_once().unwrap();
    }
    assert!(ada::crashloop::is_crash_looped(&paths, &service.name).unwrap());

    process::restart(&paths, &service).unwrap();
    assert!(!ada::crashloop::is_crash_looped(&paths, &service.name).unwrap());
    let record = ada::state::StateStore::new(&paths).load(&service.name).unwrap();
    assert_eq!(record.restart_count, 0);

    process::stop(&paths, &service.name).unwrap();
}
