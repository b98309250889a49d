//! Thread pool implementation

use crate::core::handle::package;
use crate::core::{Job, JobHandle, Priority, Result, ThreadError};
use crate::pool::scheduler::SchedulerCore;
use crate::pool::worker::{Worker, WorkerStatSnapshot, WorkerStats};
use crate::queue::QueueDepths;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// What happens to jobs that are still queued when shutdown begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownMode {
    /// Workers keep running queued jobs until every queue is empty
    #[default]
    Drain,
    /// Queued jobs are dropped; their handles report `JobDiscarded`.
    /// Jobs already running still finish.
    Discard,
}

/// Configuration for thread pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    /// Number of worker threads, fixed for the lifetime of the pool
    pub num_threads: usize,
    /// Thread name prefix; workers are named `{prefix}-{id}`
    pub thread_name_prefix: String,
    /// Treatment of queued jobs at shutdown.
    /// Default: Drain
    pub shutdown_mode: ShutdownMode,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get().max(1),
            thread_name_prefix: "worker".to_string(),
            shutdown_mode: ShutdownMode::default(),
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with specified number of threads
    ///
    /// A count of 0 is raised to 1 so the pool can never be left without a
    /// worker.
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
            ..Default::default()
        }
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set what happens to queued jobs at shutdown
    ///
    /// # Example
    ///
    /// ```
    /// use priority_thread_pool::prelude::*;
    ///
    /// let config = ThreadPoolConfig::new(4).with_shutdown_mode(ShutdownMode::Discard);
    /// assert_eq!(config.shutdown_mode, ShutdownMode::Discard);
    /// ```
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_shutdown_mode(mut self, mode: ShutdownMode) -> Self {
        self.shutdown_mode = mode;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(ThreadError::invalid_config(
                "num_threads",
                "Number of threads must be greater than 0",
            ));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ThreadError::invalid_config(
                "thread_name_prefix",
                "Thread name prefix must not be empty",
            ));
        }
        Ok(())
    }
}

/// A fixed-size pool of worker threads with priority scheduling
///
/// Workers start when the pool is built and are joined by
/// [`shutdown`](Self::shutdown), which also runs on drop. The pool is not
/// `Clone`; share it behind an `Arc` to submit from several threads.
///
/// # Example
///
/// ```
/// use priority_thread_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::with_threads(4)?;
///
/// let normal = pool.submit(|| "background")?;
/// let urgent = pool.submit_with_priority(|| "urgent", Priority::Critical)?;
///
/// assert_eq!(urgent.wait()?, "urgent");
/// assert_eq!(normal.wait()?, "background");
///
/// pool.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct ThreadPool {
    config: ThreadPoolConfig,
    core: Arc<SchedulerCore>,
    workers: Mutex<Vec<Worker>>,
    stats: Vec<Arc<WorkerStats>>,
    total_jobs_submitted: AtomicU64,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("running", &self.core.is_running())
            .field("queue_depths", &self.core.depths())
            .field(
                "total_jobs_submitted",
                &self.total_jobs_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl ThreadPool {
    /// Create a thread pool with one worker per available CPU
    pub fn new() -> Result<Self> {
        Self::with_config(ThreadPoolConfig::default())
    }

    /// Create a thread pool with specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads))
    }

    /// Create a thread pool with custom configuration and start its workers
    ///
    /// # Errors
    ///
    /// - `ThreadError::InvalidConfig` - the configuration failed validation
    /// - `ThreadError::SpawnError` - a worker thread could not be created;
    ///   workers spawned before the failure are stopped and joined first
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        let core = Arc::new(SchedulerCore::new());
        let mut workers = Vec::with_capacity(config.num_threads);

        for id in 0..config.num_threads {
            let name = format!("{}-{}", config.thread_name_prefix, id);
            match Worker::spawn(id, name, Arc::clone(&core)) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    log::error!("thread pool '{}': {}", config.thread_name_prefix, e);
                    core.signal_shutdown(ShutdownMode::Drain);
                    for worker in workers {
                        if let Err(join_err) = worker.join() {
                            log::error!("thread pool '{}': {}", config.thread_name_prefix, join_err);
                        }
                    }
                    return Err(e);
                }
            }
        }

        log::info!(
            "thread pool '{}' started with {} workers",
            config.thread_name_prefix,
            config.num_threads
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::pool_started(&config.thread_name_prefix, config.num_threads);

        let stats = workers.iter().map(Worker::stats).collect();

        Ok(Self {
            config,
            core,
            workers: Mutex::new(workers),
            stats,
            total_jobs_submitted: AtomicU64::new(0),
        })
    }

    /// Submit a closure at `Priority::Normal`
    ///
    /// Returns immediately with a handle to the closure's return value. A
    /// panic inside the closure is delivered through the handle as
    /// `ThreadError::JobPanicked`.
    ///
    /// # Errors
    ///
    /// - `ThreadError::ShuttingDown` - shutdown has started
    pub fn submit<F, T>(&self, f: F) -> Result<JobHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit_with_priority(f, Priority::Normal)
    }

    /// Submit a closure with a specific priority
    ///
    /// Queued jobs of a higher priority always run first; jobs of the same
    /// priority run in submission order.
    pub fn submit_with_priority<F, T>(&self, f: F, priority: Priority) -> Result<JobHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit_fallible_with_priority(move || Ok(f()), priority)
    }

    /// Submit a fallible closure at `Priority::Normal`
    ///
    /// An `Err` returned by the closure becomes the handle's outcome.
    ///
    /// # Example
    ///
    /// ```
    /// use priority_thread_pool::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let pool = ThreadPool::with_threads(1)?;
    ///
    /// let handle = pool.submit_fallible(|| -> Result<u32> {
    ///     Err(ThreadError::execution("parse", "not a number"))
    /// })?;
    /// assert!(matches!(handle.wait(), Err(ThreadError::ExecutionError { .. })));
    ///
    /// // The pool is unaffected by the failure
    /// assert_eq!(pool.submit(|| 1 + 1)?.wait()?, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn submit_fallible<F, T>(&self, f: F) -> Result<JobHandle<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.submit_fallible_with_priority(f, Priority::Normal)
    }

    /// Submit a fallible closure with a specific priority
    pub fn submit_fallible_with_priority<F, T>(
        &self,
        f: F,
        priority: Priority,
    ) -> Result<JobHandle<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (job, handle) = package(priority, f);
        let depth = self.core.enqueue(job, priority)?;
        self.on_submitted(priority, depth);
        Ok(handle)
    }

    /// Submit a caller-defined job without a result handle
    ///
    /// Errors and panics from the job are counted in the worker statistics
    /// and logged by the worker.
    pub fn submit_job<J: Job + 'static>(&self, job: J, priority: Priority) -> Result<()> {
        let depth = self.core.enqueue(Box::new(job), priority)?;
        self.on_submitted(priority, depth);
        Ok(())
    }

    fn on_submitted(&self, priority: Priority, depth: usize) {
        self.total_jobs_submitted.fetch_add(1, Ordering::Relaxed);
        log::trace!("queued {} job, {} pending", priority, depth);
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::job_queued(priority, depth);
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Get the configuration the pool was built with
    pub fn config(&self) -> &ThreadPoolConfig {
        &self.config
    }

    /// Check if the pool still accepts jobs
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    /// Number of jobs waiting to be picked up by a worker
    ///
    /// The value may change as soon as it is returned.
    pub fn pending_jobs(&self) -> usize {
        self.core.pending()
    }

    /// Per-priority breakdown of [`pending_jobs`](Self::pending_jobs)
    pub fn queue_depths(&self) -> QueueDepths {
        self.core.depths()
    }

    /// Get total number of jobs submitted
    pub fn total_jobs_submitted(&self) -> u64 {
        self.total_jobs_submitted.load(Ordering::Relaxed)
    }

    /// Get statistics for all workers
    pub fn get_stats(&self) -> Vec<WorkerStatSnapshot> {
        self.stats.iter().map(|s| s.snapshot()).collect()
    }

    /// Get total jobs processed across all workers
    pub fn total_jobs_processed(&self) -> u64 {
        self.stats.iter().map(|s| s.get_jobs_processed()).sum()
    }

    /// Get total jobs failed across all workers
    pub fn total_jobs_failed(&self) -> u64 {
        self.stats.iter().map(|s| s.get_jobs_failed()).sum()
    }

    /// Get total jobs panicked across all workers
    pub fn total_jobs_panicked(&self) -> u64 {
        self.stats.iter().map(|s| s.get_jobs_panicked()).sum()
    }

    /// Shutdown the thread pool and wait for all workers to finish
    ///
    /// 1. Stops accepting new jobs
    /// 2. Wakes every worker
    /// 3. Joins every worker; jobs already running always complete, and with
    ///    `ShutdownMode::Drain` every queued job runs as well
    ///
    /// Calling this again is a no-op. Concurrent callers all return only
    /// after the workers have been joined. When this runs on one of the
    /// pool's own workers (for example a job dropping the last `Arc` to the
    /// pool), that worker is detached instead of joined and exits on its own
    /// once the queues are empty.
    pub fn shutdown(&self) -> Result<()> {
        // Held across the joins so concurrent callers wait for completion
        let mut workers = self.workers.lock();

        let initiated = self.core.signal_shutdown(self.config.shutdown_mode);
        if let Some(discarded) = initiated {
            log::info!(
                "thread pool '{}' shutting down ({} queued jobs discarded)",
                self.config.thread_name_prefix,
                discarded
            );
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::shutdown_signalled(
                &self.config.thread_name_prefix,
                self.config.shutdown_mode,
                discarded,
            );
        }

        let current = thread::current().id();
        let mut first_error = None;
        for worker in workers.drain(..) {
            if worker.thread_id() == Some(current) {
                log::warn!(
                    "thread pool '{}': shutdown running on worker {}, detaching it",
                    self.config.thread_name_prefix,
                    worker.id()
                );
                continue;
            }
            if let Err(e) = worker.join() {
                log::error!("thread pool '{}': {}", self.config.thread_name_prefix, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        if initiated.is_some() {
            log::info!(
                "thread pool '{}' stopped: {} processed, {} failed, {} panicked",
                self.config.thread_name_prefix,
                self.total_jobs_processed(),
                self.total_jobs_failed(),
                self.total_jobs_panicked()
            );
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::pool_stopped(
                &self.config.thread_name_prefix,
                self.total_jobs_processed(),
                self.total_jobs_failed(),
                self.total_jobs_panicked(),
            );
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!(
                "Failed to shutdown thread pool '{}' during drop: {}",
                self.config.thread_name_prefix,
                e
            );
        }
    }
}
