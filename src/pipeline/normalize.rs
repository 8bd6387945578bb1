//! Job normalisation: raw record + run defaults → validated [`Job`].
//!
//! Every generation parameter resolves here, once, before any request is
//! sent: the generator and writer downstream never see an unresolved field.
//! The id accepts `id`, `key`, or `name` so job files can reuse whatever
//! naming their dashboard config already carries.
//!
//! Per-job overrides for `quality`/`background`/`output_format` are plain
//! strings passed to the API verbatim. Only the run defaults are
//! enum-constrained (by CLI parsing); an invalid override surfaces as the
//! API's own 4xx response.

use crate::config::BatchConfig;
use crate::error::BadgeGenError;
use crate::pipeline::input::RawJob;
use serde_json::Value;

/// One fully-resolved generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Non-empty identifier, used in output file names.
    pub id: String,
    /// Non-empty prompt text.
    pub prompt: String,
    pub model: String,
    /// `WIDTHxHEIGHT`, e.g. "1024x1024".
    pub size: String,
    pub quality: String,
    pub background: String,
    /// Also the file extension of written images.
    pub output_format: String,
    /// Omitted from the request when `None`.
    pub output_compression: Option<u8>,
    /// Variant count, ≥ 1.
    pub n: u32,
}

/// Resolve a raw record against the run defaults.
///
/// # Errors
/// - [`BadgeGenError::MissingJobId`] when `id`, `key`, and `name` are all
///   empty or absent
/// - [`BadgeGenError::MissingPrompt`] when `prompt` is empty after trimming
pub fn normalize_job(
    raw: &RawJob,
    line: usize,
    config: &BatchConfig,
) -> Result<Job, BadgeGenError> {
    let id = coerce_string(raw.id.as_ref())
        .or_else(|| coerce_string(raw.key.as_ref()))
        .or_else(|| coerce_string(raw.name.as_ref()))
        .ok_or(BadgeGenError::MissingJobId { line })?;

    let prompt =
        coerce_string(raw.prompt.as_ref()).ok_or_else(|| BadgeGenError::MissingPrompt {
            job_id: id.clone(),
        })?;

    let model = coerce_string(raw.model.as_ref()).unwrap_or_else(|| config.model.clone());
    let size = coerce_string(raw.size.as_ref()).unwrap_or_else(|| config.size.clone());
    let quality =
        coerce_string(raw.quality.as_ref()).unwrap_or_else(|| config.quality.as_str().to_string());
    let background = coerce_string(raw.background.as_ref())
        .unwrap_or_else(|| config.background.as_str().to_string());
    let output_format = coerce_string(raw.output_format.as_ref())
        .unwrap_or_else(|| config.output_format.as_str().to_string());

    // An absent override falls back to the run default; a present but
    // unparsable one drops the parameter from the request altogether.
    let output_compression = match raw.output_compression.as_ref() {
        None => config.output_compression,
        Some(value) => coerce_compression(value),
    };

    let n = raw
        .n
        .as_ref()
        .and_then(coerce_positive_int)
        .unwrap_or(config.n)
        .max(1);

    Ok(Job {
        id,
        prompt,
        model,
        size,
        quality,
        background,
        output_format,
        output_compression,
        n,
    })
}

/// Coerce a loose JSON value to a trimmed, non-empty string.
///
/// Strings trim; numbers render. Anything else (null, bool, arrays, objects)
/// counts as absent, as does an empty or whitespace-only string.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Coerce a compression override to 0–100, or `None` when unparsable or out
/// of range.
fn coerce_compression(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u8::try_from(n).ok().filter(|&c| c <= 100)
}

/// Coerce a variant-count override to a positive integer.
fn coerce_positive_int(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|&n| n > 0)
}
