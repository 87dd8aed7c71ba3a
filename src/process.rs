//! Process lifecycle: start, stop, restart.
//!
//! Grounded on the teacher's spawn/shutdown handling in `src/bin/main.rs`
//! (`daemonize_systemg`'s use of `setsid`, and `register_signal_handler`'s
//! `killpg`-based SIGTERM-then-SIGKILL escalation), adapted to a direct
//! per-service `setsid` child instead of a doubly-forked daemon.

use std::fs;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::thread;

use chrono::Utc;
use nix::sys::signal::{self, Signal};
use nix::unistd::{getpgid, Pid};
use tracing::warn;

use crate::config::Service;
use crate::constants::{KILL_SETTLE, START_GRACE, STOP_GRACE, STOP_POLL_INTERVAL};
use crate::envfile;
use crate::error::AdaError;
use crate::logs;
use crate::paths::Paths;
use crate::state::StateStore;

/// True if `pid` currently answers to a signal-0 probe. Any error other
/// than "no such process" is treated as "still alive" (best effort, matches
/// the teacher's liveness-check posture in its own `process_state` lookup).
pub fn is_alive(pid: u32) -> bool {
    match signal::kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false,
        Err(_) => true,
    }
}

fn pid_file_read(paths: &Paths, name: &str) -> io::Result<Option<u32>> {
    match fs::read_to_string(paths.pid_file(name)) {
        Ok(raw) => Ok(raw.trim().parse().ok()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn pid_file_write(paths: &Paths, name: &str, pid: u32) -> io::Result<()> {
    crate::paths::write_atomic(&paths.pid_file(name), pid.to_string().as_bytes())
}

fn pid_file_remove(paths: &Paths, name: &str) -> io::Result<()> {
    match fs::remove_file(paths.pid_file(name)) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Whether `service` currently has a live, tracked process.
pub fn is_running(paths: &Paths, name: &str) -> io::Result<bool> {
    Ok(match pid_file_read(paths, name)? {
        Some(pid) => is_alive(pid),
        None => false,
    })
}

/// Removes a stale PID file and clears the state store's `pid`/`started_at`
/// once a tracked process is found dead. Idempotent.
fn cleanup_dead(paths: &Paths, name: &str) -> Result<(), AdaError> {
    pid_file_remove(paths, name)?;
    StateStore::new(paths).update(name, |record| {
        record.pid = None;
        record.started_at = None;
    })?;
    Ok(())
}

/// Starts `service`. A no-op success if it is already running.
pub fn start(paths: &Paths, service: &Service) -> Result<(), AdaError> {
    if is_running(paths, &service.name)? {
        return Ok(());
    }
    if let Some(pid) = pid_file_read(paths, &service.name)? {
        if !is_alive(pid) {
            cleanup_dead(paths, &service.name)?;
        }
    }

    let dir = crate::paths::expand_tilde(&service.dir);
    if !dir.is_dir() {
        return Err(AdaError::MissingDirectory(dir));
    }

    let mut env_vars = Vec::new();
    if let Some(env_file) = &service.env_file {
        let env_path = crate::paths::expand_tilde(env_file);
        match envfile::parse(&env_path) {
            Ok(vars) => env_vars = vars,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(service = %service.name, path = %env_path.display(), "env file not found, proceeding without it");
            }
            Err(err) => {
                warn!(service = %service.name, path = %env_path.display(), error = %err, "failed to read env file, proceeding without it");
            }
        }
    }

    let log_path = paths.log_file(&service.name);
    logs::rotate_if_needed(&log_path)?;
    logs::append_marker(&log_path, &service.name, "starting")?;

    let argv = shell_words::split(&service.cmd)
        .map_err(|err| AdaError::Validation(format!("invalid command line for '{}': {err}", service.name)))?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| AdaError::Validation(format!("empty command for '{}'", service.name)))?;

    let stdout_file = logs::open_append(&log_path).map_err(|source| AdaError::Spawn {
        service: service.name.clone(),
        source,
    })?;
    let stderr_file = stdout_file.try_clone().map_err(|source| AdaError::Spawn {
        service: service.name.clone(),
        source,
    })?;

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(&dir)
        .envs(env_vars)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file));

    unsafe {
        command.pre_exec(|| {
            nix::unistd::setsid().map_err(|err| io::Error::from_raw_os_error(err as i32))?;
            Ok(())
        });
    }

    let child = command.spawn().map_err(|source| AdaError::Spawn {
        service: service.name.clone(),
        source,
    })?;
    let pid = child.id();
    // Dropping `child` here does not touch the running process; ada tracks
    // liveness by PID/PGID across invocations via the PID file, the same
    // way the teacher's own PID-file-based tracking survives process exit.
    drop(child);

    thread::sleep(START_GRACE);

    if is_alive(pid) {
        pid_file_write(paths, &service.name, pid)?;
        StateStore::new(paths).update(&service.name, |record| {
            record.pid = Some(pid);
            record.started_at = Some(Utc::now().timestamp());
        })?;
        Ok(())
    } else {
        cleanup_dead(paths, &service.name)?;
        Err(AdaError::Spawn {
            service: service.name.clone(),
            source: io::Error::new(io::ErrorKind::Other, "process exited immediately after start"),
        })
    }
}

/// Stops `service` if running: SIGTERM the process group, poll for up to
/// `STOP_GRACE`, escalate to SIGKILL, settle, clean up tracking files.
pub fn stop(paths: &Paths, name: &str) -> Result<(), AdaError> {
    let pid = match pid_file_read(paths, name)? {
        Some(pid) => pid,
        None => return Ok(()),
    };
    if !is_alive(pid) {
        cleanup_dead(paths, name)?;
        return Ok(());
    }

    send_signal_to_group(pid, Signal::SIGTERM);

    let deadline = std::time::Instant::now() + STOP_GRACE;
    while std::time::Instant::now() < deadline {
        if !is_alive(pid) {
            break;
        }
        thread::sleep(STOP_POLL_INTERVAL);
    }

    if is_alive(pid) {
        send_signal_to_group(pid, Signal::SIGKILL);
        thread::sleep(KILL_SETTLE);
    }

    let log_path = paths.log_file(name);
    let _ = logs::append_marker(&log_path, name, "stopped");

    cleanup_dead(paths, name)?;
    StateStore::new(paths).update(name, |record| {
        record.last_stop_reason = Some("manual".to_string());
    })?;
    Ok(())
}

/// Stops (if running) then starts `service`, clearing crash-loop status.
pub fn restart(paths: &Paths, service: &Service) -> Result<(), AdaError> {
    crate::crashloop::clear_crash_loop(paths, &service.name)?;
    stop(paths, &service.name)?;
    start(paths, service)
}

fn send_signal_to_group(pid: u32, sig: Signal) {
    let target = match getpgid(Some(Pid::from_raw(pid as i32))) {
        Ok(pgid) if pgid.as_raw() > 1 => Pid::from_raw(-pgid.as_raw()),
        _ => Pid::from_raw(pid as i32),
    };
    if let Err(err) = signal::kill(target, sig) {
        if err != nix::errno::Errno::ESRCH {
            warn!(pid, ?sig, error = %err, "failed to signal process group");
        }
    }
}
