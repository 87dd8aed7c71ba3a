//! Per-service runtime state: `state/<name>.json`.
//!
//! Grounded on the teacher's state-file discipline in `daemon.rs`/`status.rs`
//! (read-modify-write, atomic rename) but with a much smaller record: ada
//! tracks only what the crash-loop detector and `status` need.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{AdaError, StateError};
use crate::paths::{write_atomic, Paths};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeRecord {
    pub pid: Option<u32>,
    pub started_at: Option<i64>,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default)]
    pub restart_times: Vec<i64>,
    #[serde(default)]
    pub crash_loop: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_stop_reason: Option<String>,
}

pub struct StateStore<'p> {
    paths: &'p Paths,
}

impl<'p> StateStore<'p> {
    pub fn new(paths: &'p Paths) -> Self {
        Self { paths }
    }

    pub fn load(&self, name: &str) -> Result<RuntimeRecord, AdaError> {
        let path = self.paths.state_file(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RuntimeRecord::default())
            }
            Err(source) => return Err(StateError::Read { path, source }.into()),
        };
        let record = serde_json::from_str(&raw)
            .map_err(|source| StateError::Parse { path, source })?;
        Ok(record)
    }

    pub fn save(&self, name: &str, record: &RuntimeRecord) -> Result<(), AdaError> {
        let path = self.paths.state_file(name);
        let body = serde_json::to_vec_pretty(record)
            .map_err(|source| StateError::Parse { path: path.clone(), source })?;
        write_atomic(&path, &body).map_err(|source| StateError::Write { path, source })?;
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<(), AdaError> {
        let path = self.paths.state_file(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Write { path, source }.into()),
        }
    }

    /// Read-modify-write helper: loads the current record, lets `mutate`
    /// change only the fields it cares about, writes the whole record back.
    pub fn update<F>(&self, name: &str, mutate: F) -> Result<RuntimeRecord, AdaError>
    where
        F: FnOnce(&mut RuntimeRecord),
    {
        let mut record = self.load(name)?;
        mutate(&mut record);
        self.save(name, &record)?;
        Ok(record)
    }
}
