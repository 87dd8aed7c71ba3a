//! A personal process supervisor for long-running local jobs.

/// CLI parsing.
pub mod cli;

/// Declarative service list (`services.json`).
pub mod config;

/// Constants and tunables.
pub mod constants;

/// Crash-loop detection.
pub mod crashloop;

/// Env file parsing.
pub mod envfile;

/// Errors.
pub mod error;

/// Per-service log writing, rotation, and tailing.
pub mod logs;

/// Filesystem layout.
pub mod paths;

/// Process lifecycle: start, stop, restart.
pub mod process;

/// Per-service runtime state (`state/<name>.json`).
pub mod state;

/// Status classification and formatting.
pub mod status;

/// The background supervisor loop.
pub mod supervisor;

/// Test utilities shared by unit and integration tests.
#[doc(hidden)]
pub mod test_utils;
