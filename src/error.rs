//! Error types for ada.
//!
//! One top-level enum, with small nested enums for the config and state
//! stores so a caller can match on `AdaError::Config(ConfigError::Parse(_))`
//! without every variant of every subsystem crowding the top level.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdaError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to start '{service}': {source}")]
    Spawn {
        service: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("working directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("a supervisor is already running (pid {pid})")]
    LockHeld { pid: i32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("service '{0}' already exists")]
    AlreadyExists(String),

    #[error("service '{0}' is not defined")]
    NotFound(String),

    #[error(
        "invalid service name '{0}': must match [A-Za-z0-9][A-Za-z0-9._-]*"
    )]
    InvalidName(String),
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type AdaResult<T> = Result<T, AdaError>;
