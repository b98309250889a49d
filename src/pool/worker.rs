//! Worker thread implementation

use crate::core::job::panic_message;
use crate::core::{BoxedJob, Priority, Result, ThreadError};
use crate::pool::scheduler::SchedulerCore;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of jobs that completed successfully
    pub jobs_processed: AtomicU64,
    /// Total number of jobs that returned an error
    pub jobs_failed: AtomicU64,
    /// Total number of jobs that panicked
    pub jobs_panicked: AtomicU64,
    /// Total time spent processing jobs (microseconds)
    pub total_processing_time_us: AtomicU64,
    /// Jobs run per priority level, indexed by `Priority::value()`
    pub jobs_by_priority: [AtomicU64; Priority::COUNT],
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, priority: Priority, elapsed_us: u64) {
        self.jobs_by_priority[priority.index()].fetch_add(1, Ordering::Relaxed);
        self.total_processing_time_us
            .fetch_add(elapsed_us, Ordering::Relaxed);
    }

    /// Get total jobs processed
    pub fn get_jobs_processed(&self) -> u64 {
        self.jobs_processed.load(Ordering::Relaxed)
    }

    /// Get total jobs failed
    pub fn get_jobs_failed(&self) -> u64 {
        self.jobs_failed.load(Ordering::Relaxed)
    }

    /// Get total jobs panicked
    pub fn get_jobs_panicked(&self) -> u64 {
        self.jobs_panicked.load(Ordering::Relaxed)
    }

    /// Jobs of one priority level run by this worker, whatever their outcome
    pub fn get_jobs_at(&self, priority: Priority) -> u64 {
        self.jobs_by_priority[priority.index()].load(Ordering::Relaxed)
    }

    /// Get average processing time per job in microseconds
    pub fn get_average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count: u64 = Priority::DESCENDING
            .iter()
            .map(|&priority| self.get_jobs_at(priority))
            .sum();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> WorkerStatSnapshot {
        WorkerStatSnapshot {
            jobs_processed: self.get_jobs_processed(),
            jobs_failed: self.get_jobs_failed(),
            jobs_panicked: self.get_jobs_panicked(),
            normal_jobs: self.get_jobs_at(Priority::Normal),
            high_jobs: self.get_jobs_at(Priority::High),
            critical_jobs: self.get_jobs_at(Priority::Critical),
            average_processing_time_us: self.get_average_processing_time_us(),
        }
    }
}

/// Serializable copy of [`WorkerStats`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerStatSnapshot {
    /// Jobs that completed successfully
    pub jobs_processed: u64,
    /// Jobs that returned an error
    pub jobs_failed: u64,
    /// Jobs that panicked
    pub jobs_panicked: u64,
    /// Jobs run at `Priority::Normal`
    pub normal_jobs: u64,
    /// Jobs run at `Priority::High`
    pub high_jobs: u64,
    /// Jobs run at `Priority::Critical`
    pub critical_jobs: u64,
    /// Mean wall time per job
    pub average_processing_time_us: f64,
}

/// A worker thread that runs jobs handed out by the scheduler core
#[derive(Debug)]
pub(crate) struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a worker thread named `name`
    ///
    /// The thread waits on `core` for work until shutdown has been signalled
    /// and no queued job remains.
    pub(crate) fn spawn(id: usize, name: String, core: Arc<SchedulerCore>) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || {
                Self::run(id, &core, &stats_clone);
            })
            .map_err(|e| ThreadError::spawn_with_source(id, "Cannot create worker thread", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// OS thread running this worker, until it has been joined
    pub(crate) fn thread_id(&self) -> Option<thread::ThreadId> {
        self.thread.as_ref().map(|handle| handle.thread().id())
    }

    /// Get worker statistics
    pub(crate) fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub(crate) fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|panic_info| {
                ThreadError::join(self.id, panic_message(panic_info.as_ref()))
            })?;
        }
        Ok(())
    }

    /// Main worker loop
    ///
    /// A job already taken from the queue always runs to completion; the
    /// shutdown flag is only consulted when looking for the next one.
    fn run(id: usize, core: &SchedulerCore, stats: &WorkerStats) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        log::debug!("worker {} started", id);

        while let Some((priority, mut job)) = core.next_job() {
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::worker_busy(id, true);

            Self::execute_job(id, priority, &mut job, stats);

            #[cfg(feature = "tracing")]
            crate::tracing::metrics::worker_busy(id, false);
        }

        log::debug!(
            "worker {} exiting: {} processed, {} failed, {} panicked",
            id,
            stats.get_jobs_processed(),
            stats.get_jobs_failed(),
            stats.get_jobs_panicked()
        );
    }

    /// Execute a single job with panic protection
    fn execute_job(id: usize, priority: Priority, job: &mut BoxedJob, stats: &WorkerStats) {
        #[cfg(feature = "tracing")]
        let job_span = span!(
            Level::DEBUG,
            "job_execution",
            job_type = job.job_type(),
            priority = priority.as_str()
        );
        #[cfg(feature = "tracing")]
        let _job_guard = job_span.enter();

        log::trace!("worker {} running {} job {}", id, priority, job.job_type());

        let start = std::time::Instant::now();
        let panic_result = catch_unwind(AssertUnwindSafe(|| job.execute()));
        let elapsed = start.elapsed();

        #[cfg(feature = "tracing")]
        use crate::tracing::metrics::{job_finished, JobOutcome};

        match panic_result {
            Ok(Ok(())) => {
                stats.jobs_processed.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                job_finished(priority, JobOutcome::Completed, elapsed);
            }
            Ok(Err(e)) => {
                log::warn!("worker {}: {} job failed: {}", id, job.job_type(), e);
                stats.jobs_failed.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                job_finished(priority, JobOutcome::Failed, elapsed);
            }
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                log::error!("worker {}: {} job panicked: {}", id, job.job_type(), panic_msg);
                stats.jobs_panicked.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                job_finished(priority, JobOutcome::Panicked, elapsed);
            }
        }

        stats.record(priority, elapsed.as_micros() as u64);
    }
}
