//! CLI binary for badgegen.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`
//! and prints results.

use anyhow::{Context, Result};
use badgegen::{
    run_batch, Background, BatchConfig, BatchProgress, BatchProgressCallback, OutputFormat,
    Quality,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the batch, a log line per job.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading jobs…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_jobs: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} jobs  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_jobs as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Generating");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting batch of {total_jobs} jobs…"))
        ));
    }

    fn on_job_start(&self, _index: usize, _total_jobs: usize, job_id: &str) {
        self.bar.set_message(job_id.to_string());
    }

    fn on_job_complete(&self, index: usize, total_jobs: usize, job_id: &str, images_written: usize) {
        self.bar.println(format!(
            "  {} Job {:>3}/{:<3}  {:<20}  {}",
            green("✓"),
            index,
            total_jobs,
            job_id,
            dim(&format!("{images_written} image(s)")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total_jobs: usize, _images_written: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate every badge described in badges.jsonl
  badgegen generate-batch --input badges.jsonl --out-dir assets/badges

  # Preview what would be generated, no API key needed
  badgegen generate-batch --input badges.jsonl --out-dir assets/badges --dry-run

  # PNG output at full size (downscale disabled)
  badgegen generate-batch --input badges.jsonl --out-dir assets/badges \
      --output-format png --downscale-max-dim 0

  # Two variants per prompt, machine-readable summary
  badgegen generate-batch --input badges.jsonl --out-dir assets/badges --n 2 --json

JOB FILE FORMAT (JSONL, one job per non-blank line):
  {"id": "dispatch", "prompt": "flat orange radio tower badge"}
  {"id": "triage",   "prompt": "flat teal clipboard badge", "quality": "medium"}

  Required: an id ("id", "key", or "name") and a "prompt".
  Optional per-job overrides: model, size, quality, background,
  output_format, output_compression, n.

OUTPUT NAMING:
  <out-dir>/badge-<id>.<format>        first image of a job
  <out-dir>/badge-<id>-<n>.<format>    variants beyond the first

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY   API credential, required unless --dry-run
  RUST_LOG         Log filter (e.g. badgegen=debug), overrides -v/-q

SETUP:
  1. Set API key:   export OPENAI_API_KEY=sk-...
  2. Generate:      badgegen generate-batch --input badges.jsonl --out-dir out
"#;

/// Batch-generate UI badge assets via the OpenAI Images API.
#[derive(Parser, Debug)]
#[command(
    name = "badgegen",
    version,
    about = "Batch-generate UI badge assets via the OpenAI Images API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate images from a JSONL job file (one job per line).
    GenerateBatch(GenerateBatchArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateBatchArgs {
    /// Path to the JSONL job file.
    #[arg(long, env = "BADGEGEN_INPUT")]
    input: PathBuf,

    /// Directory output files are written under.
    #[arg(long, env = "BADGEGEN_OUT_DIR")]
    out_dir: PathBuf,

    /// Default model for jobs that don't override it.
    #[arg(long, env = "BADGEGEN_MODEL", default_value = "gpt-image-1.5")]
    model: String,

    /// Default image size as WIDTHxHEIGHT.
    #[arg(long, env = "BADGEGEN_SIZE", default_value = "1024x1024")]
    size: String,

    /// Default rendering quality.
    #[arg(long, env = "BADGEGEN_QUALITY", value_enum, default_value = "high")]
    quality: QualityArg,

    /// Default background treatment.
    #[arg(long, env = "BADGEGEN_BACKGROUND", value_enum, default_value = "transparent")]
    background: BackgroundArg,

    /// Default output format (also the file extension).
    #[arg(long, env = "BADGEGEN_OUTPUT_FORMAT", value_enum, default_value = "webp")]
    output_format: OutputFormatArg,

    /// Default compression, 0–100 (jpeg/webp only).
    #[arg(long, env = "BADGEGEN_OUTPUT_COMPRESSION", default_value_t = 80,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    output_compression: u8,

    /// Variants per prompt.
    #[arg(long, env = "BADGEGEN_N", default_value_t = 1)]
    n: u32,

    /// Downscale written images so the longest side is at most this many
    /// pixels. 0 disables downscaling.
    #[arg(long, env = "BADGEGEN_DOWNSCALE_MAX_DIM", default_value_t = 256)]
    downscale_max_dim: u32,

    /// Log planned jobs without calling the API or writing files.
    #[arg(long, env = "BADGEGEN_DRY_RUN")]
    dry_run: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "BADGEGEN_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "BADGEGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BADGEGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BADGEGEN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum QualityArg {
    Low,
    Medium,
    High,
    Auto,
}

impl From<QualityArg> for Quality {
    fn from(v: QualityArg) -> Self {
        match v {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
            QualityArg::Auto => Quality::Auto,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum BackgroundArg {
    Transparent,
    Opaque,
    Auto,
}

impl From<BackgroundArg> for Background {
    fn from(v: BackgroundArg) -> Self {
        match v {
            BackgroundArg::Transparent => Background::Transparent,
            BackgroundArg::Opaque => Background::Opaque,
            BackgroundArg::Auto => Background::Auto,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(v: OutputFormatArg) -> Self {
        match v {
            OutputFormatArg::Png => OutputFormat::Png,
            OutputFormatArg::Jpeg => OutputFormat::Jpeg,
            OutputFormatArg::Webp => OutputFormat::Webp,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let Command::GenerateBatch(args) = cli.command;

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user. Dry-run keeps
    // INFO so the planned jobs are visible.
    let show_progress = !args.quiet && !args.no_progress && !args.json && !args.dry_run;
    let filter = if args.verbose {
        "debug"
    } else if args.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<BatchProgress> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = BatchConfig::builder(&args.out_dir)
        .model(&args.model)
        .size(&args.size)
        .quality(args.quality.clone().into())
        .background(args.background.clone().into())
        .output_format(args.output_format.clone().into())
        .output_compression(Some(args.output_compression))
        .n(args.n)
        .downscale_max_dim(args.downscale_max_dim)
        .dry_run(args.dry_run);

    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let output = run_batch(&args.input, &config)
        .await
        .context("Batch generation failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    }

    // Summary line (the callback already printed the per-job log).
    if !args.quiet {
        if output.stats.dry_run {
            eprintln!(
                "{} dry-run: {} jobs planned, nothing written",
                cyan("◆"),
                bold(&output.stats.jobs.to_string()),
            );
        } else {
            eprintln!(
                "{} {} jobs  {} images ({} downscaled)  {}ms  →  {}",
                green("✔"),
                bold(&output.stats.jobs.to_string()),
                output.stats.images_written,
                output.stats.images_downscaled,
                output.stats.duration_ms,
                bold(&args.out_dir.display().to_string()),
            );
        }
    }

    Ok(())
}
