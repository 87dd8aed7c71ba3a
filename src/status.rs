//! Status classification and display formatting.
//!
//! Grounded on the teacher's `status/mod.rs` (process liveness via
//! `kill(pid, None)`, `format_elapsed`'s bucketed uptime formatting) but
//! without its cron/deployment/cache machinery -- ada recomputes status
//! fresh on every call, there is no background refresher.

use chrono::Utc;

use crate::config::Service;
use crate::crashloop::is_crash_looped;
use crate::error::AdaError;
use crate::logs;
use crate::paths::Paths;
use crate::process::is_alive;
use crate::state::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
    Disabled,
    CrashLoop,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Disabled => "disabled",
            ServiceState::CrashLoop => "CRASH-LOOP",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub name: String,
    pub state: ServiceState,
    pub pid: Option<u32>,
    pub uptime: Option<String>,
    pub restart_count: u32,
    pub last_log_line: Option<String>,
}

/// Classifies a single service's current status, self-healing a stale PID
/// file / state record if the tracked process has died.
pub fn classify(paths: &Paths, service: &Service) -> Result<StatusEntry, AdaError> {
    let state_store = StateStore::new(paths);
    let mut record = state_store.load(&service.name)?;

    let running = match record.pid {
        Some(pid) if is_alive(pid) => true,
        Some(_) => {
            record = state_store.update(&service.name, |record| {
                record.pid = None;
                record.started_at = None;
            })?;
            false
        }
        None => false,
    };

    let crash_loop = is_crash_looped(paths, &service.name)?;

    let state = if crash_loop {
        ServiceState::CrashLoop
    } else if running {
        ServiceState::Running
    } else if !service.enabled {
        ServiceState::Disabled
    } else {
        ServiceState::Stopped
    };

    let uptime = if running {
        record.started_at.map(|started_at| {
            format_uptime((Utc::now().timestamp() - started_at).max(0))
        })
    } else {
        None
    };

    let last_log_line = logs::last_meaningful_line(&paths.log_file(&service.name)).unwrap_or(None);

    Ok(StatusEntry {
        name: service.name.clone(),
        state,
        pid: if running { record.pid } else { None },
        uptime,
        restart_count: record.restart_count,
        last_log_line,
    })
}

/// Formats a duration in seconds as `Xs`, `Xm Ys`, `Xh Ym`, or `Xd Yh`.
pub fn format_uptime(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
