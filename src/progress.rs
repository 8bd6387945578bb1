//! Progress-callback trait for per-job batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress`] to receive events as the
//! batch processes each job. The callback approach is the least-invasive
//! integration point: callers can forward events to a terminal progress bar,
//! a log aggregator, or a CI annotation without the library knowing anything
//! about how the host application communicates.
//!
//! Jobs are processed strictly in order, so events arrive in order too; the
//! trait is still `Send + Sync` so the same implementation can back an async
//! caller.

use std::sync::Arc;

/// Called by the batch pipeline as it processes each job.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The first job failure aborts the batch, so there is
/// no per-job error event; failures surface as the batch's returned error.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the job file has been read and validated.
    ///
    /// # Arguments
    /// * `total_jobs` — number of jobs that will be processed
    fn on_batch_start(&self, total_jobs: usize) {
        let _ = total_jobs;
    }

    /// Called just before a job's generation request is sent (or, in
    /// dry-run mode, logged).
    ///
    /// # Arguments
    /// * `index`      — 1-indexed job position
    /// * `total_jobs` — total jobs in the batch
    /// * `job_id`     — the job's resolved id
    fn on_job_start(&self, index: usize, total_jobs: usize, job_id: &str) {
        let _ = (index, total_jobs, job_id);
    }

    /// Called when a job's images have all been written (and downscaled,
    /// where requested). Dry-run jobs report zero images.
    ///
    /// # Arguments
    /// * `index`          — 1-indexed job position
    /// * `total_jobs`     — total jobs in the batch
    /// * `job_id`         — the job's resolved id
    /// * `images_written` — files written for this job
    fn on_job_complete(&self, index: usize, total_jobs: usize, job_id: &str, images_written: usize) {
        let _ = (index, total_jobs, job_id, images_written);
    }

    /// Called once after every job has completed.
    ///
    /// # Arguments
    /// * `total_jobs`     — jobs processed
    /// * `images_written` — files written across the whole batch
    fn on_batch_complete(&self, total_jobs: usize, images_written: usize) {
        let _ = (total_jobs, images_written);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type BatchProgress = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        total_seen: AtomicUsize,
        images_seen: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_jobs: usize) {
            self.total_seen.store(total_jobs, Ordering::SeqCst);
        }

        fn on_job_start(&self, _index: usize, _total_jobs: usize, _job_id: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_job_complete(
            &self,
            _index: usize,
            _total_jobs: usize,
            _job_id: &str,
            images_written: usize,
        ) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.images_seen.fetch_add(images_written, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(5);
        cb.on_job_start(1, 5, "dispatch");
        cb.on_job_complete(1, 5, "dispatch", 2);
        cb.on_batch_complete(5, 10);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            total_seen: AtomicUsize::new(0),
            images_seen: AtomicUsize::new(0),
        };

        tracker.on_batch_start(2);
        tracker.on_job_start(1, 2, "dispatch");
        tracker.on_job_complete(1, 2, "dispatch", 1);
        tracker.on_job_start(2, 2, "triage");
        tracker.on_job_complete(2, 2, "triage", 3);

        assert_eq!(tracker.total_seen.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.images_seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_job_start(1, 10, "dispatch");
        cb.on_job_complete(1, 10, "dispatch", 1);
    }
}
