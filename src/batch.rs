//! Batch orchestration: the sequential job loop.
//!
//! One entry point, [`run_batch`], ties the pipeline stages together:
//! read → normalize → generate → write, one job at a time, in file order.
//! The whole job file is validated before the first request is sent, so a
//! typo on line 40 surfaces before lines 1–39 have cost API credits. The
//! first failure of any kind aborts the run — there is no retry, rollback,
//! or partial-job isolation.

use crate::config::BatchConfig;
use crate::error::BadgeGenError;
use crate::output::{BatchOutput, BatchStats, JobOutcome};
use crate::pipeline::{generate, input, normalize, write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run a full batch from a JSONL job file.
///
/// # Arguments
/// * `input_path` — path to the line-delimited job file
/// * `config`     — run defaults, output directory, and mode flags
///
/// # Errors
/// Any [`BadgeGenError`] aborts the batch: malformed or invalid job records,
/// a missing credential in live mode, API failures, undecodable payloads,
/// and write or downscale failures. Images written before the failure stay
/// on disk.
pub async fn run_batch(
    input_path: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchOutput, BadgeGenError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting batch: {}", input_path.display());

    // ── Step 1: Read and normalize every job up front ────────────────────
    let records = input::read_jobs(input_path)?;
    let jobs = records
        .iter()
        .map(|(line, raw)| normalize::normalize_job(raw, *line, config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Normalized {} jobs", jobs.len());

    // ── Step 2: Prepare the output directory ─────────────────────────────
    tokio::fs::create_dir_all(&config.out_dir)
        .await
        .map_err(|source| BadgeGenError::OutputWriteFailed {
            path: config.out_dir.clone(),
            source,
        })?;

    // ── Step 3: Resolve the API client (live mode only) ──────────────────
    // Constructed before the loop so a missing credential aborts before any
    // request is sent. Dry runs never touch the environment or the network.
    let client = if config.dry_run {
        None
    } else {
        Some(generate::ImagesClient::from_env()?)
    };

    if let Some(ref cb) = config.progress {
        cb.on_batch_start(jobs.len());
    }

    // ── Step 4: Process jobs sequentially ────────────────────────────────
    let mut outcomes = Vec::with_capacity(jobs.len());
    let mut images_written = 0usize;
    let mut images_downscaled = 0usize;

    for (pos, job) in jobs.iter().enumerate() {
        if let Some(ref cb) = config.progress {
            cb.on_job_start(pos + 1, jobs.len(), &job.id);
        }

        let Some(client) = client.as_ref() else {
            info!(
                "[dry-run] generate {}: model={} size={} format={}",
                job.id, job.model, job.size, job.output_format
            );
            outcomes.push(JobOutcome {
                job_id: job.id.clone(),
                files: Vec::new(),
            });
            if let Some(ref cb) = config.progress {
                cb.on_job_complete(pos + 1, jobs.len(), &job.id, 0);
            }
            continue;
        };

        let images = client.generate(job).await?;

        let mut files = Vec::with_capacity(images.len());
        for (idx, bytes) in images.iter().enumerate() {
            let out_path =
                write::build_out_path(&config.out_dir, &job.id, idx + 1, &job.output_format);
            write::write_image(&out_path, bytes).await?;
            images_written += 1;

            if config.downscale_max_dim > 0
                && write::downscale_in_place(&out_path, config.downscale_max_dim).await?
            {
                images_downscaled += 1;
            }

            info!("Wrote {}", out_path.display());
            files.push(out_path);
        }

        if let Some(ref cb) = config.progress {
            cb.on_job_complete(pos + 1, jobs.len(), &job.id, files.len());
        }
        outcomes.push(JobOutcome {
            job_id: job.id.clone(),
            files,
        });
    }

    if let Some(ref cb) = config.progress {
        cb.on_batch_complete(outcomes.len(), images_written);
    }

    // ── Step 5: Assemble stats ───────────────────────────────────────────
    let stats = BatchStats {
        jobs: outcomes.len(),
        images_written,
        images_downscaled,
        duration_ms: total_start.elapsed().as_millis() as u64,
        dry_run: config.dry_run,
    };
    info!(
        "Batch complete: {} jobs, {} images ({} downscaled) in {}ms",
        stats.jobs, stats.images_written, stats.images_downscaled, stats.duration_ms
    );

    Ok(BatchOutput { outcomes, stats })
}
