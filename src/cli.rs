//! Command-line interface for ada.

use clap::{Parser, Subcommand};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Wrapper around `LevelFilter` so clap can parse log levels from either
/// string names ("info", "debug", etc.) or numeric shorthands (0-5).
#[derive(Clone, Copy, Debug)]
pub struct LogLevelArg(LevelFilter);

impl LogLevelArg {
    /// String representation suitable for `RUST_LOG`.
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            LevelFilter::OFF => "off",
            LevelFilter::ERROR => "error",
            LevelFilter::WARN => "warn",
            LevelFilter::INFO => "info",
            LevelFilter::DEBUG => "debug",
            LevelFilter::TRACE => "trace",
        }
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("log level cannot be empty".into());
        }

        if let Ok(number) = trimmed.parse::<u8>() {
            let level = match number {
                0 => LevelFilter::OFF,
                1 => LevelFilter::ERROR,
                2 => LevelFilter::WARN,
                3 => LevelFilter::INFO,
                4 => LevelFilter::DEBUG,
                5 => LevelFilter::TRACE,
                _ => {
                    return Err(format!(
                        "unsupported log level number '{number}' (expected 0-5)"
                    ));
                }
            };
            return Ok(LogLevelArg(level));
        }

        let lowercase = trimmed.to_ascii_lowercase();
        let level = match lowercase.as_str() {
            "off" => Some(LevelFilter::OFF),
            "error" | "err" => Some(LevelFilter::ERROR),
            "warn" | "warning" => Some(LevelFilter::WARN),
            "info" | "information" => Some(LevelFilter::INFO),
            "debug" => Some(LevelFilter::DEBUG),
            "trace" => Some(LevelFilter::TRACE),
            _ => None,
        }
        .ok_or_else(|| format!("invalid log level '{trimmed}'"))?;

        Ok(LogLevelArg(level))
    }
}

/// A personal process supervisor for long-running local jobs.
#[derive(Parser)]
#[command(name = "ada", version, author)]
#[command(about = "A personal process supervisor for long-running local jobs", long_about = None)]
pub struct Cli {
    /// Override the logging verbosity for this invocation only.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// The command to execute. Defaults to `status` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Status { name: None })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the status of configured services.
    #[command(visible_aliases = ["st", "s"])]
    Status {
        /// Only show the named service.
        name: Option<String>,
    },

    /// Start a service, or `all` enabled services.
    Start {
        /// Service name, or `all`.
        name: String,
    },

    /// Stop a running service, or `all` running services.
    Stop {
        /// Service name, or `all`.
        name: String,
    },

    /// Restart a service (clears crash-loop status), or `all`.
    Restart {
        /// Service name, or `all`.
        name: String,
    },

    /// Add a new service to the configuration.
    Add {
        /// Unique service name.
        name: String,

        /// Command line to run.
        #[arg(long)]
        cmd: String,

        /// Working directory.
        #[arg(long)]
        dir: String,

        /// Optional env file to load before starting.
        #[arg(long = "env-file")]
        env_file: Option<String>,
    },

    /// Remove a service from the configuration. Stops it first if running.
    #[command(visible_alias = "rm")]
    Remove {
        name: String,
    },

    /// Mark a service enabled, so the supervisor loop will manage it.
    Enable {
        name: String,
    },

    /// Mark a service disabled, so the supervisor loop leaves it alone.
    Disable {
        name: String,
    },

    /// Show the log file for a service. Defaults to following; passing
    /// `-n` prints that many trailing lines and exits instead.
    Logs {
        name: String,

        /// Print this many trailing lines and exit, instead of following.
        #[arg(short = 'n', long)]
        lines: Option<usize>,

        /// Keep following the log as new lines are appended.
        #[arg(short = 'f', long)]
        follow: bool,
    },

    /// Run the supervisor loop in the foreground.
    #[command(visible_alias = "w")]
    Watch,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
