//! Image generation: submit one Images API request per job and decode the
//! returned payloads.
//!
//! This is the only stage with network I/O. The client is deliberately thin:
//! one POST to `/v1/images/generations`, bearer auth, JSON in and out. The
//! API returns images as base64 (`b64_json`); URL-only items can appear when
//! a caller asks for URL delivery, and are skipped here rather than fetched —
//! this tool always requests inline payloads.
//!
//! Request parameters mirror the job record one-to-one. `output_compression`
//! is omitted from the body entirely when unset; the API rejects `null` for
//! it.

use crate::error::BadgeGenError;
use crate::pipeline::normalize::Job;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Client for the OpenAI Images API.
///
/// Construct once per run via [`ImagesClient::from_env`]; construction fails
/// fast when the credential is missing, before any request is attempted.
pub struct ImagesClient {
    http: reqwest::Client,
    api_key: String,
}

impl ImagesClient {
    /// Build a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    /// [`BadgeGenError::MissingApiKey`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self, BadgeGenError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(BadgeGenError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Build a client with an explicit credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Generate images for one job and decode every returned payload.
    ///
    /// # Errors
    /// - [`BadgeGenError::RequestFailed`] on transport failure
    /// - [`BadgeGenError::ApiError`] on a non-success HTTP status
    /// - [`BadgeGenError::InvalidImagePayload`] on undecodable base64
    /// - [`BadgeGenError::NoImageData`] when the response holds zero
    ///   decodable images
    pub async fn generate(&self, job: &Job) -> Result<Vec<Vec<u8>>, BadgeGenError> {
        let request = ImagesRequest {
            model: &job.model,
            prompt: &job.prompt,
            size: &job.size,
            quality: &job.quality,
            background: &job.background,
            output_format: &job.output_format,
            n: job.n,
            output_compression: job.output_compression,
        };

        debug!(
            "Requesting {}×'{}' for job '{}' (model={}, size={})",
            job.n, job.output_format, job.id, job.model, job.size
        );

        let response = self
            .http
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| BadgeGenError::RequestFailed {
                job_id: job.id.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BadgeGenError::ApiError {
                job_id: job.id.clone(),
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let parsed: ImagesResponse =
            response
                .json()
                .await
                .map_err(|source| BadgeGenError::RequestFailed {
                    job_id: job.id.clone(),
                    source,
                })?;

        decode_payloads(&job.id, &parsed)
    }
}

/// Decode every `b64_json` payload in the response to raw bytes.
///
/// Items without an inline payload (URL delivery) are skipped with a warning;
/// a response with zero decodable images is an error because the caller would
/// otherwise write nothing and report success.
fn decode_payloads(job_id: &str, response: &ImagesResponse) -> Result<Vec<Vec<u8>>, BadgeGenError> {
    let mut images = Vec::with_capacity(response.data.len());
    for (idx, item) in response.data.iter().enumerate() {
        if let Some(revised) = item.revised_prompt.as_deref() {
            debug!("Job '{}': item {} revised prompt: {}", job_id, idx + 1, revised);
        }
        let Some(b64) = item.b64_json.as_deref().filter(|s| !s.is_empty()) else {
            if item.url.is_some() {
                warn!(
                    "Job '{}': response item {} carries a URL instead of inline data, skipping",
                    job_id,
                    idx + 1
                );
            } else {
                warn!("Job '{}': response item {} has no image payload, skipping", job_id, idx + 1);
            }
            continue;
        };
        let bytes = STANDARD
            .decode(b64)
            .map_err(|source| BadgeGenError::InvalidImagePayload {
                job_id: job_id.to_string(),
                index: idx + 1,
                source,
            })?;
        images.push(bytes);
    }

    if images.is_empty() {
        return Err(BadgeGenError::NoImageData {
            job_id: job_id.to_string(),
        });
    }
    Ok(images)
}

/// Pull the human-readable message out of an OpenAI error envelope,
/// falling back to the raw body.
fn extract_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Option<EnvelopeError>,
    }
    #[derive(Deserialize)]
    struct EnvelopeError {
        message: Option<String>,
    }

    serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "(empty response body)".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    background: &'a str,
    output_format: &'a str,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_compression: Option<u8>,
}

/// Response body of `/v1/images/generations`.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

/// One generated image in the response.
#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job {
            id: "dispatch".into(),
            prompt: "a badge".into(),
            model: "gpt-image-1.5".into(),
            size: "1024x1024".into(),
            quality: "high".into(),
            background: "transparent".into(),
            output_format: "webp".into(),
            output_compression: Some(80),
            n: 1,
        }
    }

    #[test]
    fn request_body_carries_all_parameters() {
        let j = job();
        let request = ImagesRequest {
            model: &j.model,
            prompt: &j.prompt,
            size: &j.size,
            quality: &j.quality,
            background: &j.background,
            output_format: &j.output_format,
            n: j.n,
            output_compression: j.output_compression,
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"model\":\"gpt-image-1.5\""));
        assert!(body.contains("\"background\":\"transparent\""));
        assert!(body.contains("\"output_compression\":80"));
        assert!(body.contains("\"n\":1"));
    }

    #[test]
    fn unset_compression_is_omitted_from_body() {
        let j = job();
        let request = ImagesRequest {
            model: &j.model,
            prompt: &j.prompt,
            size: &j.size,
            quality: &j.quality,
            background: &j.background,
            output_format: &j.output_format,
            n: j.n,
            output_compression: None,
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(!body.contains("output_compression"));
    }

    #[test]
    fn decode_skips_url_items_and_decodes_inline_ones() {
        let response: ImagesResponse = serde_json::from_str(
            r#"{"created": 1, "data": [
                {"url": "https://example.com/a.webp"},
                {"b64_json": "aGVsbG8="}
            ]}"#,
        )
        .unwrap();

        let images = decode_payloads("dispatch", &response).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0], b"hello");
    }

    #[test]
    fn empty_data_is_an_error() {
        let response: ImagesResponse = serde_json::from_str(r#"{"created": 1, "data": []}"#).unwrap();
        let err = decode_payloads("dispatch", &response).unwrap_err();
        assert!(matches!(err, BadgeGenError::NoImageData { .. }));
    }

    #[test]
    fn missing_data_field_is_tolerated_then_errors_as_empty() {
        let response: ImagesResponse = serde_json::from_str(r#"{"created": 1}"#).unwrap();
        let err = decode_payloads("dispatch", &response).unwrap_err();
        assert!(err.to_string().contains("dispatch"));
    }

    #[test]
    fn bad_base64_reports_item_index() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{"data": [{"b64_json": "!!!not-base64!!!"}]}"#).unwrap();
        let err = decode_payloads("dispatch", &response).unwrap_err();
        assert!(matches!(
            err,
            BadgeGenError::InvalidImagePayload { index: 1, .. }
        ));
    }

    #[test]
    fn api_error_envelope_extraction() {
        let body = r#"{"error": {"message": "Invalid size parameter", "type": "invalid_request_error"}}"#;
        assert_eq!(extract_api_error(body), "Invalid size parameter");

        // Non-JSON bodies fall back verbatim.
        assert_eq!(extract_api_error("gateway timeout"), "gateway timeout");
        assert_eq!(extract_api_error("  "), "(empty response body)");
    }
}
