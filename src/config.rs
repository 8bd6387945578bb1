//! Configuration types for batch badge generation.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a run's defaults with the normalizer, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! The enum fields ([`Quality`], [`Background`], [`OutputFormat`]) constrain
//! the *run defaults* only. Per-job overrides from the JSONL file are passed
//! through to the API as plain strings — the API is the authority on what it
//! accepts there.

use crate::error::BadgeGenError;
use crate::progress::BatchProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`].
///
/// # Example
/// ```rust
/// use badgegen::{BatchConfig, OutputFormat};
///
/// let config = BatchConfig::builder("out/badges")
///     .model("gpt-image-1.5")
///     .output_format(OutputFormat::Png)
///     .downscale_max_dim(128)
///     .dry_run(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory all output files are written under. Created on run start.
    pub out_dir: PathBuf,

    /// Default model identifier. Default: "gpt-image-1.5".
    pub model: String,

    /// Default image size as `WIDTHxHEIGHT`. Default: "1024x1024".
    pub size: String,

    /// Default rendering quality. Default: [`Quality::High`].
    pub quality: Quality,

    /// Default background treatment. Default: [`Background::Transparent`].
    ///
    /// Badges are composited onto dashboard panels of varying colour, so a
    /// transparent background is the only default that works everywhere.
    pub background: Background,

    /// Default output format. Default: [`OutputFormat::Webp`].
    pub output_format: OutputFormat,

    /// Default output compression, 0–100. Default: Some(80).
    ///
    /// Only meaningful for jpeg/webp; the API ignores it for png. `None`
    /// omits the parameter from requests entirely.
    pub output_compression: Option<u8>,

    /// Default variant count per prompt. Default: 1.
    pub n: u32,

    /// Bound on the longest side of written images, in pixels. Default: 256.
    ///
    /// The API's smallest render (1024×1024) is far larger than a dashboard
    /// badge slot, so every written file is downscaled in place unless its
    /// longest side already fits. 0 disables downscaling.
    pub downscale_max_dim: u32,

    /// Log intended requests without calling the API or writing files. Default: false.
    pub dry_run: bool,

    /// Optional per-job progress callback (drives the CLI progress bar).
    pub progress: Option<BatchProgress>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            model: "gpt-image-1.5".to_string(),
            size: "1024x1024".to_string(),
            quality: Quality::High,
            background: Background::Transparent,
            output_format: OutputFormat::Webp,
            output_compression: Some(80),
            n: 1,
            downscale_max_dim: 256,
            dry_run: false,
            progress: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("out_dir", &self.out_dir)
            .field("model", &self.model)
            .field("size", &self.size)
            .field("quality", &self.quality)
            .field("background", &self.background)
            .field("output_format", &self.output_format)
            .field("output_compression", &self.output_compression)
            .field("n", &self.n)
            .field("downscale_max_dim", &self.downscale_max_dim)
            .field("dry_run", &self.dry_run)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgressCallback>"))
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder with the given output directory.
    pub fn builder(out_dir: impl Into<PathBuf>) -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: BatchConfig {
                out_dir: out_dir.into(),
                ..Self::default()
            },
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.config.size = size.into();
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.config.quality = quality;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.config.background = background;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set the default compression (clamped to 0–100), or `None` to omit the
    /// parameter from requests.
    pub fn output_compression(mut self, compression: Option<u8>) -> Self {
        self.config.output_compression = compression.map(|c| c.min(100));
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.config.n = n;
        self
    }

    pub fn downscale_max_dim(mut self, max_dim: u32) -> Self {
        self.config.downscale_max_dim = max_dim;
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    pub fn progress(mut self, progress: BatchProgress) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BadgeGenError> {
        let c = &self.config;
        if c.n == 0 {
            return Err(BadgeGenError::InvalidConfig(
                "Variant count n must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(BadgeGenError::InvalidConfig("Model must not be empty".into()));
        }
        if c.size.trim().is_empty() {
            return Err(BadgeGenError::InvalidConfig("Size must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Rendering quality requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
    /// Let the API pick per prompt.
    Auto,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Auto => "auto",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background treatment requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Transparent,
    Opaque,
    Auto,
}

impl Background {
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Transparent => "transparent",
            Background::Opaque => "opaque",
            Background::Auto => "auto",
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded format the API returns and the file extension written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    #[default]
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_cli_defaults() {
        let config = BatchConfig::builder("out").build().unwrap();
        assert_eq!(config.model, "gpt-image-1.5");
        assert_eq!(config.size, "1024x1024");
        assert_eq!(config.quality, Quality::High);
        assert_eq!(config.background, Background::Transparent);
        assert_eq!(config.output_format, OutputFormat::Webp);
        assert_eq!(config.output_compression, Some(80));
        assert_eq!(config.n, 1);
        assert_eq!(config.downscale_max_dim, 256);
        assert!(!config.dry_run);
    }

    #[test]
    fn builder_rejects_zero_variants() {
        let err = BatchConfig::builder("out").n(0).build().unwrap_err();
        assert!(err.to_string().contains("n must be"));
    }

    #[test]
    fn builder_clamps_compression() {
        let config = BatchConfig::builder("out")
            .output_compression(Some(200))
            .build()
            .unwrap();
        assert_eq!(config.output_compression, Some(100));
    }

    #[test]
    fn enum_strings_match_wire_values() {
        assert_eq!(Quality::Auto.as_str(), "auto");
        assert_eq!(Background::Opaque.as_str(), "opaque");
        assert_eq!(OutputFormat::Webp.as_str(), "webp");
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpeg");
    }
}
