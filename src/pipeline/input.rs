//! Job-file parsing: JSONL → raw job records.
//!
//! The job file is line-delimited JSON: one self-describing object per
//! non-blank line. Parsing is strict — a malformed line aborts the whole run
//! with the file path and 1-based line number, because a silently skipped job
//! means a silently missing badge. Blank (whitespace-only) lines are allowed
//! so job files can be grouped visually.
//!
//! Records keep their line number through normalisation so validation errors
//! can point back at the file.

use crate::error::BadgeGenError;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// One raw record from the job file, before normalisation.
///
/// Every field is optional here; [`crate::pipeline::normalize`] decides what
/// is required and what falls back to the run defaults. Fields deserialize as
/// loose [`Value`]s because job files in the wild carry numbers where strings
/// are expected (`"output_compression": 75` and `"output_compression": "75"`
/// both occur) and the normaliser coerces both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub quality: Option<Value>,
    #[serde(default)]
    pub background: Option<Value>,
    #[serde(default)]
    pub output_format: Option<Value>,
    #[serde(default)]
    pub output_compression: Option<Value>,
    #[serde(default)]
    pub n: Option<Value>,
}

/// Read a JSONL job file into raw records, preserving file order.
///
/// Returns `(line_number, record)` tuples with 1-based line numbers.
///
/// # Errors
/// - [`BadgeGenError::JobFileNotFound`] / [`BadgeGenError::JobFileRead`] for
///   path problems
/// - [`BadgeGenError::MalformedJobLine`] for the first line that is not a
///   valid JSON object, reported with file and line
pub fn read_jobs(path: &Path) -> Result<Vec<(usize, RawJob)>, BadgeGenError> {
    if !path.exists() {
        return Err(BadgeGenError::JobFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|source| BadgeGenError::JobFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut jobs = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let job: RawJob =
            serde_json::from_str(raw).map_err(|source| BadgeGenError::MalformedJobLine {
                path: path.to_path_buf(),
                line: line_no,
                source,
            })?;
        jobs.push((line_no, job));
    }

    debug!("Parsed {} job records from {}", jobs.len(), path.display());
    Ok(jobs)
}
