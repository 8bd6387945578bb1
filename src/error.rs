//! Error types for the badgegen library.
//!
//! A batch run has no partial-success mode: the first failure aborts the
//! whole run, so a single fatal enum covers every stage. Each variant carries
//! the context a user needs to act — the file and line for a bad job record,
//! the job id for an API failure, the output path for a write failure —
//! rather than a bare message.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the badgegen library.
///
/// Every variant aborts the batch; there is no per-job isolation.
#[derive(Debug, Error)]
pub enum BadgeGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Job file was not found at the given path.
    #[error("Job file not found: '{path}'\nCheck the path exists and is readable.")]
    JobFileNotFound { path: PathBuf },

    /// Job file exists but could not be read.
    #[error("Failed to read job file '{path}': {source}")]
    JobFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank line in the job file is not a valid JSON object.
    #[error("Invalid JSONL at {path}:{line}: {source}")]
    MalformedJobLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    // ── Job validation errors ─────────────────────────────────────────────
    /// A job record has no usable `id`, `key`, or `name` field.
    #[error("Job on line {line} must include an 'id' field (e.g. dispatch, triage).")]
    MissingJobId { line: usize },

    /// A job record has no non-empty `prompt`.
    #[error("Job '{job_id}' is missing a non-empty 'prompt'.")]
    MissingPrompt { job_id: String },

    // ── Credential / API errors ───────────────────────────────────────────
    /// Live mode requires `OPENAI_API_KEY`.
    #[error("OPENAI_API_KEY is not set.\nExport it in your shell environment and re-run, or pass --dry-run.")]
    MissingApiKey,

    /// The HTTP request itself failed (DNS, TLS, connection reset, …).
    #[error("Image request for job '{job_id}' failed: {source}")]
    RequestFailed {
        job_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Images API returned HTTP {status} for job '{job_id}': {message}")]
    ApiError {
        job_id: String,
        status: u16,
        message: String,
    },

    /// A returned payload was not valid base64.
    #[error("Image {index} for job '{job_id}' is not valid base64: {source}")]
    InvalidImagePayload {
        job_id: String,
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// The response contained no decodable image payloads.
    #[error("No image data returned for job '{job_id}'.")]
    NoImageData { job_id: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write an image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The written image could not be opened, resized, or saved in place.
    #[error("Failed to downscale '{path}': {source}")]
    DownscaleFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_line_display_includes_path_and_line() {
        let source = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let e = BadgeGenError::MalformedJobLine {
            path: PathBuf::from("jobs.jsonl"),
            line: 7,
            source,
        };
        let msg = e.to_string();
        assert!(msg.contains("jobs.jsonl:7"), "got: {msg}");
    }

    #[test]
    fn missing_api_key_display_is_actionable() {
        let msg = BadgeGenError::MissingApiKey.to_string();
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("--dry-run"));
    }

    #[test]
    fn api_error_display() {
        let e = BadgeGenError::ApiError {
            job_id: "dispatch".into(),
            status: 400,
            message: "invalid size".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("HTTP 400"));
        assert!(msg.contains("dispatch"));
        assert!(msg.contains("invalid size"));
    }

    #[test]
    fn no_image_data_display() {
        let e = BadgeGenError::NoImageData {
            job_id: "triage".into(),
        };
        assert!(e.to_string().contains("triage"));
    }
}
