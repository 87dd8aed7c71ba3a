//! Filesystem layout: resolves the ada home directory and the well-known
//! paths beneath it. Grounded on the teacher's `runtime` module, but
//! simplified to a plain value struct threaded explicitly through the
//! program instead of a process-global `OnceLock<RwLock<_>>` context --
//! ada has no privilege-mode/socket-activation concerns that would justify
//! the teacher's heavier singleton.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, LOCK_FILE_NAME, LOG_DIR_NAME, PID_DIR_NAME, STATE_DIR_NAME,
    SUPERVISOR_LOG_NAME,
};

#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Resolves the ada home directory: `$ADA_HOME` if set, else `$HOME/.ada`.
    pub fn resolve() -> io::Result<Self> {
        let root = match std::env::var_os("ADA_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = std::env::var_os("HOME").ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "HOME is not set and ADA_HOME is not set",
                    )
                })?;
                Path::new(&home).join(".ada")
            }
        };
        Ok(Self { root })
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(self.root.join(PID_DIR_NAME))?;
        fs::create_dir_all(self.root.join(LOG_DIR_NAME))?;
        fs::create_dir_all(self.root.join(STATE_DIR_NAME))?;
        Ok(())
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE_NAME)
    }

    pub fn supervisor_log_file(&self) -> PathBuf {
        self.root.join(SUPERVISOR_LOG_NAME)
    }

    pub fn pid_file(&self, service: &str) -> PathBuf {
        self.root.join(PID_DIR_NAME).join(format!("{service}.pid"))
    }

    pub fn log_file(&self, service: &str) -> PathBuf {
        self.root.join(LOG_DIR_NAME).join(format!("{service}.log"))
    }

    pub fn state_file(&self, service: &str) -> PathBuf {
        self.root
            .join(STATE_DIR_NAME)
            .join(format!("{service}.json"))
    }
}

/// Writes `contents` to `path` atomically: write to a sibling `.tmp` file
/// in the same directory, then rename over the destination.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;
    fs::create_dir_all(dir)?;
    let tmp_name = format!(
        ".{}.{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("ada"),
        std::process::id()
    );
    let tmp_path = dir.join(tmp_name);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Expands a leading `~` or `~/...` in `dir` against `$HOME`. Any other
/// path is returned unchanged.
pub fn expand_tilde(dir: &str) -> PathBuf {
    if dir == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = dir.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(dir)
}
