//! Per-service log file writing, rotation and tailing.
//!
//! Grounded on the teacher's `logs.rs` (log path resolution, append-mode
//! writer, tailing) generalized to ada's single merged stdout+stderr file
//! per service and the 2 MiB size-based rotation this spec requires.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use chrono::Local;

use crate::constants::{LOG_ROTATE_KEEP_FRACTION, MAX_LOG_BYTES, STATUS_LOG_LINE_WIDTH, STATUS_LOG_TAIL_LINES};

/// Opens the service log file in append mode, creating it if needed.
pub fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Appends a timestamped marker line such as
/// `[2026-07-28 10:15:00] === ada starting web ===`.
pub fn append_marker(path: &Path, name: &str, event: &str) -> io::Result<()> {
    let mut file = open_append(path)?;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{timestamp}] === ada {event} {name} ===")
}

/// Appends a plain timestamped line to the supervisor's own event log.
pub fn log_supervisor_event(path: &Path, message: &str) -> io::Result<()> {
    let mut file = open_append(path)?;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{timestamp}] {message}")
}

/// Rotates `path` if it exceeds `MAX_LOG_BYTES`, keeping the newest
/// `LOG_ROTATE_KEEP_FRACTION` of that cap. A no-op if the file is absent
/// or under the cap.
pub fn rotate_if_needed(path: &Path) -> io::Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if metadata.len() <= MAX_LOG_BYTES {
        return Ok(());
    }

    let keep_bytes = (MAX_LOG_BYTES as f64 * LOG_ROTATE_KEEP_FRACTION) as u64;
    let skip = metadata.len().saturating_sub(keep_bytes);

    let contents = fs::read(path)?;
    let tail = &contents[skip as usize..];
    // Avoid starting mid-line: drop up to the first newline in the tail.
    let tail = match tail.iter().position(|&b| b == b'\n') {
        Some(idx) => &tail[idx + 1..],
        None => tail,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = dir.join(format!(
        ".{}.{}.rotate.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("ada"),
        std::process::id()
    ));
    fs::write(&tmp_path, tail)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Returns up to `n` of the most recent lines in `path`, in file order.
pub fn tail_lines(path: &Path, n: usize) -> io::Result<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let reader = BufReader::new(file);
    let mut buffer: std::collections::VecDeque<String> = std::collections::VecDeque::with_capacity(n);
    for line in reader.lines() {
        let line = line?;
        if buffer.len() == n {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }
    Ok(buffer.into_iter().collect())
}

/// Returns the last non-marker, non-blank line of the service log, truncated
/// to `STATUS_LOG_LINE_WIDTH` columns, for display in `status`.
pub fn last_meaningful_line(path: &Path) -> io::Result<Option<String>> {
    let lines = tail_lines(path, STATUS_LOG_TAIL_LINES)?;
    let found = lines
        .into_iter()
        .rev()
        .find(|line| !line.trim().is_empty() && !is_marker_line(line));
    Ok(found.map(|line| truncate(&line, STATUS_LOG_LINE_WIDTH)))
}

fn is_marker_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('[') && trimmed.contains("=== ada ")
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        line.to_string()
    } else {
        let mut truncated: String = line.chars().take(width.saturating_sub(1)).collect();
        truncated.push('\u{2026}');
        truncated
    }
}
