//! The background supervisor loop (`ada watch`).
//!
//! Grounded on the teacher's foreground run loop and its `ctrlc`-driven
//! shutdown handler in `src/bin/main.rs`, simplified to ada's single
//! poll-and-auto-restart loop with no IPC, cron, or dynamic spawn trees.

use std::fs;
use std::time::Duration;

use nix::sys::signal;
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::config::ConfigStore;
use crate::constants::WATCH_INTERVAL;
use crate::crashloop::{is_crash_looped, record_restart};
use crate::error::AdaError;
use crate::logs::log_supervisor_event;
use crate::paths::{write_atomic, Paths};
use crate::process::{is_running, start};
use crate::state::StateStore;

pub struct Supervisor<'p> {
    paths: &'p Paths,
    interval: Duration,
}

/// RAII guard that removes the supervisor lock file on drop, so any return
/// path out of `run` (error or otherwise) still releases it.
struct LockGuard<'p> {
    paths: &'p Paths,
}

impl<'p> Drop for LockGuard<'p> {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.paths.lock_file());
    }
}

impl<'p> Supervisor<'p> {
    pub fn new(paths: &'p Paths) -> Self {
        Self {
            paths,
            interval: WATCH_INTERVAL,
        }
    }

    /// Overrides the poll interval; used by tests that can't afford to wait
    /// out the real 10 second cadence.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Acquires the single-instance lock, installs the signal handler, and
    /// polls forever until interrupted.
    pub fn run(&self) -> Result<(), AdaError> {
        self.acquire_lock()?;
        let lock_path = self.paths.lock_file();
        let _guard = LockGuard { paths: self.paths };

        ctrlc::set_handler(move || {
            let _ = fs::remove_file(&lock_path);
            std::process::exit(0);
        })
        .map_err(|err| AdaError::Validation(format!("failed to install signal handler: {err}")))?;

        info!("ada supervisor starting");
        loop {
            if let Err(err) = self.poll_once() {
                warn!(error = %err, "supervisor poll iteration failed");
            }
            std::thread::sleep(self.interval);
        }
    }

    /// Returns the holder's PID if a supervisor is currently running, for
    /// `status` to report alongside the per-service table.
    pub fn running_pid(paths: &Paths) -> Option<i32> {
        let raw = fs::read_to_string(paths.lock_file()).ok()?;
        let pid: i32 = raw.trim().parse().ok()?;
        signal::kill(Pid::from_raw(pid), None).ok()?;
        Some(pid)
    }

    fn acquire_lock(&self) -> Result<(), AdaError> {
        let lock_path = self.paths.lock_file();
        if let Ok(raw) = fs::read_to_string(&lock_path) {
            if let Ok(pid) = raw.trim().parse::<i32>() {
                if signal::kill(Pid::from_raw(pid), None).is_ok() {
                    return Err(AdaError::LockHeld { pid });
                }
            }
            // Stale lock: the recorded PID is dead, reclaim it.
        }
        write_atomic(&lock_path, std::process::id().to_string().as_bytes())?;
        Ok(())
    }

    /// Runs one pass over the configured services, auto-restarting any
    /// enabled service that has been started before but is no longer
    /// running, subject to crash-loop protection. Exposed separately from
    /// `run` so tests can drive iterations without waiting on `interval`.
    pub fn poll_once(&self) -> Result<(), AdaError> {
        let config_store = ConfigStore::new(self.paths);
        let state_store = StateStore::new(self.paths);
        let services = config_store.list()?;

        for service in services.iter().filter(|s| s.enabled) {
            if is_crash_looped(self.paths, &service.name)? {
                continue;
            }
            if is_running(self.paths, &service.name)? {
                continue;
            }
            if never_started(&state_store, &service.name)? {
                continue;
            }

            record_restart(self.paths, &service.name)?;
            if is_crash_looped(self.paths, &service.name)? {
                let last_line = crate::logs::last_meaningful_line(&self.paths.log_file(&service.name))
                    .unwrap_or(None)
                    .unwrap_or_default();
                log_event(
                    self.paths,
                    &format!("crash-loop: {} ({})", service.name, last_line),
                );
                continue;
            }

            log_event(self.paths, &format!("auto-restart: {}", service.name));
            start(self.paths, service)?;
        }

        for service in &services {
            let _ = crate::logs::rotate_if_needed(&self.paths.log_file(&service.name));
        }

        Ok(())
    }
}

fn never_started(state_store: &StateStore<'_>, name: &str) -> Result<bool, AdaError> {
    let record = state_store.load(name)?;
    Ok(record.pid.is_none() && record.started_at.is_none())
}

fn log_event(paths: &Paths, message: &str) {
    if let Err(err) = log_supervisor_event(&paths.supervisor_log_file(), message) {
        warn!(error = %err, "failed to write supervisor log");
    }
}
