//! Constants and tunables for the ada supervisor.
//!
//! Centralizes the magic numbers described in the specification so every
//! module refers to the same values instead of re-deriving them.

use std::time::Duration;

/// Subdirectory holding one PID file per service.
pub const PID_DIR_NAME: &str = "pids";

/// Subdirectory holding one log file per service.
pub const LOG_DIR_NAME: &str = "logs";

/// Subdirectory holding one runtime-state JSON document per service.
pub const STATE_DIR_NAME: &str = "state";

/// Name of the declarative service list, stored at the root of the home directory.
pub const CONFIG_FILE_NAME: &str = "services.json";

/// Name of the single-instance supervisor lock file.
pub const LOCK_FILE_NAME: &str = "supervisor.lock";

/// Name of the supervisor's own event log.
pub const SUPERVISOR_LOG_NAME: &str = "supervisor.log";

/// Maximum size a service log is allowed to reach at rest before rotation.
pub const MAX_LOG_BYTES: u64 = 2 * 1024 * 1024;

/// Fraction of `MAX_LOG_BYTES` retained by a rotation (the newest tail).
pub const LOG_ROTATE_KEEP_FRACTION: f64 = 0.75;

/// Number of restarts within `CRASH_LOOP_WINDOW` that trips the crash-loop flag.
pub const CRASH_LOOP_THRESHOLD: usize = 5;

/// Sliding window, in seconds, over which restarts count toward the crash-loop threshold.
pub const CRASH_LOOP_WINDOW_SECS: i64 = 120;

/// Grace period after SIGTERM before a stop escalates to SIGKILL.
pub const STOP_GRACE: Duration = Duration::from_secs(5);

/// How often the stop routine polls for liveness during the grace period.
pub const STOP_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Settle time after SIGKILL before the controller gives up waiting.
pub const KILL_SETTLE: Duration = Duration::from_millis(500);

/// Delay after spawning a child before checking whether it is still alive.
pub const START_GRACE: Duration = Duration::from_millis(500);

/// Interval between supervisor poll iterations.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(10);

/// Number of trailing log lines inspected when deriving a status line.
pub const STATUS_LOG_TAIL_LINES: usize = 20;

/// Maximum display width for the "last log line" shown by `status`.
pub const STATUS_LOG_LINE_WIDTH: usize = 100;

/// Regex pattern a service name must fully match.
pub const SERVICE_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

/// Trailing lines printed before `logs` starts following when the caller
/// did not ask for a specific `-n` count.
pub const LOGS_DEFAULT_FOLLOW_TAIL_LINES: usize = 10;
