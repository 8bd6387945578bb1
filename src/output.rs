//! Result types returned by a batch run.
//!
//! [`BatchOutput`] is what [`crate::batch::run_batch`] hands back on success:
//! one [`JobOutcome`] per job, in file order, plus aggregate [`BatchStats`].
//! Everything is `Serialize` so the CLI's `--json` flag can print the whole
//! run summary as a machine-readable document.

use serde::Serialize;
use std::path::PathBuf;

/// Complete result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    /// Per-job outcomes, in job-file order.
    pub outcomes: Vec<JobOutcome>,
    /// Aggregate counters for the run.
    pub stats: BatchStats,
}

/// Files produced for one job.
///
/// In dry-run mode `files` is empty; the job still appears here so callers
/// can see what would have been processed.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// The job's resolved id.
    pub job_id: String,
    /// Paths written for this job, 1-indexed order matching the API response.
    pub files: Vec<PathBuf>,
}

/// Aggregate counters for a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    /// Jobs processed (equals the number of non-blank input lines).
    pub jobs: usize,
    /// Image files written to disk.
    pub images_written: usize,
    /// Written files that were resized in place.
    pub images_downscaled: usize,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serialises_to_json() {
        let output = BatchOutput {
            outcomes: vec![JobOutcome {
                job_id: "dispatch".into(),
                files: vec![PathBuf::from("out/badge-dispatch.webp")],
            }],
            stats: BatchStats {
                jobs: 1,
                images_written: 1,
                images_downscaled: 1,
                duration_ms: 1234,
                dry_run: false,
            },
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"job_id\":\"dispatch\""));
        assert!(json.contains("badge-dispatch.webp"));
        assert!(json.contains("\"images_written\":1"));
    }
}
