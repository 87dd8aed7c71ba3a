//! A minimal `KEY=VALUE` env file parser.
//!
//! Per the redesign note carried into SPEC_FULL.md §9, env files are parsed
//! in-process rather than sourced through a shell. Malformed lines are
//! skipped with a warning, never fatal.

use std::fs;
use std::path::Path;

use tracing::warn;

/// Parses a `KEY=VALUE` env file. Blank lines and lines starting with `#`
/// are skipped. A single layer of matching `'...'` or `"..."` quoting
/// around the value is stripped.
pub fn parse(path: &Path) -> std::io::Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)?;
    let mut vars = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match trimmed.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                vars.push((key.trim().to_string(), unquote(value.trim())));
            }
            _ => {
                warn!(
                    path = %path.display(),
                    line = lineno + 1,
                    "skipping malformed env file line"
                );
            }
        }
    }
    Ok(vars)
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
