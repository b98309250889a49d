//! Tracing integration.
//!
//! Enabled by the `tracing` feature. Each worker thread runs inside a
//! `worker` span and each job inside a `job_execution` span tagged with its
//! priority. The events in [`metrics`] use the `counter.`, `gauge.` and
//! `histogram.` field prefixes understood by tracing metrics layers.
//!
//! # Example
//!
//! ```rust,ignore
//! use priority_thread_pool::prelude::*;
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::new("priority_thread_pool=trace"))
//!     .init();
//!
//! let pool = ThreadPool::with_threads(4)?;
//! pool.submit_with_priority(|| rebuild_index(), Priority::High)?;
//! ```

/// Events emitted at scheduling points.
pub mod metrics {
    use crate::core::Priority;
    use crate::pool::ShutdownMode;
    use std::time::Duration;

    /// How a job left the worker
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum JobOutcome {
        /// `execute` returned `Ok`
        Completed,
        /// `execute` returned `Err`
        Failed,
        /// `execute` panicked
        Panicked,
    }

    impl JobOutcome {
        fn as_str(self) -> &'static str {
            match self {
                JobOutcome::Completed => "completed",
                JobOutcome::Failed => "failed",
                JobOutcome::Panicked => "panicked",
            }
        }
    }

    /// A job entered its priority queue; `pending` counts all queued jobs.
    #[inline]
    pub fn job_queued(priority: Priority, pending: usize) {
        tracing::trace!(
            counter.jobs_queued = 1u64,
            gauge.pending_jobs = pending as u64,
            priority = priority.as_str(),
            "job queued"
        );
    }

    /// A worker finished running a job.
    #[inline]
    pub fn job_finished(priority: Priority, outcome: JobOutcome, elapsed: Duration) {
        tracing::trace!(
            counter.jobs_finished = 1u64,
            histogram.job_duration_us = elapsed.as_micros() as u64,
            priority = priority.as_str(),
            outcome = outcome.as_str(),
            "job finished"
        );
    }

    /// Worker switched between running a job and waiting for one.
    #[inline]
    pub fn worker_busy(worker_id: usize, busy: bool) {
        let delta: i64 = if busy { 1 } else { -1 };
        tracing::trace!(gauge.busy_workers = delta, worker_id, "worker state");
    }

    /// All workers of a pool were spawned.
    #[inline]
    pub fn pool_started(name: &str, workers: usize) {
        tracing::info!(pool = name, workers, "thread pool started");
    }

    /// Shutdown was initiated; `discarded` queued jobs were dropped.
    #[inline]
    pub fn shutdown_signalled(name: &str, mode: ShutdownMode, discarded: usize) {
        tracing::info!(
            pool = name,
            mode = ?mode,
            counter.jobs_discarded = discarded as u64,
            "thread pool shutting down"
        );
    }

    /// Every worker was joined.
    #[inline]
    pub fn pool_stopped(name: &str, processed: u64, failed: u64, panicked: u64) {
        tracing::info!(
            pool = name,
            processed,
            failed,
            panicked,
            "thread pool stopped"
        );
    }
}
