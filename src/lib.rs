//! # badgegen
//!
//! Batch-generate UI badge assets (dashboard HUD badges) via the OpenAI
//! Images API, driven by a line-delimited JSONL job file.
//!
//! ## Why this crate?
//!
//! Badge art needs to be *reproducible*: when the dashboard gains a panel,
//! the new badge must match the existing set. Driving generation from a
//! checked-in job file — one prompt per badge, shared style defaults on the
//! command line — makes the whole asset set regenerable with one invocation,
//! with predictable file names a dashboard config can reference directly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! jobs.jsonl
//!  │
//!  ├─ 1. Input      parse one JSON job per non-blank line
//!  ├─ 2. Normalize  merge per-job overrides with run defaults, validate
//!  ├─ 3. Generate   one Images API request per job, decode base64 payloads
//!  └─ 4. Write      badge-<id>[-<n>].<format>, optional downscale in place
//! ```
//!
//! Jobs run strictly sequentially; the first failure aborts the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use badgegen::{run_batch, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Requires OPENAI_API_KEY unless dry_run is set.
//!     let config = BatchConfig::builder("out/badges").build()?;
//!     let output = run_batch("badges.jsonl", &config).await?;
//!     eprintln!(
//!         "{} images written ({} downscaled)",
//!         output.stats.images_written, output.stats.images_downscaled
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `badgegen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! badgegen = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::run_batch;
pub use config::{Background, BatchConfig, BatchConfigBuilder, OutputFormat, Quality};
pub use error::BadgeGenError;
pub use output::{BatchOutput, BatchStats, JobOutcome};
pub use pipeline::normalize::Job;
pub use progress::{BatchProgress, BatchProgressCallback, NoopProgressCallback};
