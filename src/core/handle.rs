//! Job packaging and result handles
//!
//! [`package`] binds a closure into a [`BoxedJob`] that can sit in a queue and
//! a [`JobHandle`] through which the caller later observes the outcome. The
//! two halves are connected by a one-shot crossbeam channel: the job sends
//! exactly once, and a job dropped without running disconnects the channel,
//! which the handle reports as [`ThreadError::JobDiscarded`].

use crate::core::error::{Result, ThreadError};
use crate::core::job::{panic_message, BoxedJob, Job};
use crate::core::priority::Priority;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique job ID
fn next_job_id() -> u64 {
    NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed)
}

/// A handle to the outcome of a submitted job
///
/// The handle becomes ready exactly once, carrying either the job's return
/// value or the error it produced (including a captured panic).
///
/// # Example
///
/// ```
/// use priority_thread_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::with_threads(2)?;
///
/// let handle = pool.submit_with_priority(|| 3 * 4, Priority::High)?;
/// assert_eq!(handle.wait()?, 12);
/// # Ok(())
/// # }
/// ```
pub struct JobHandle<T> {
    job_id: u64,
    priority: Priority,
    receiver: Receiver<Result<T>>,
    outcome: Option<Result<T>>,
}

impl<T> fmt::Debug for JobHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("job_id", &self.job_id)
            .field("priority", &self.priority)
            .field("ready", &self.outcome.is_some())
            .finish()
    }
}

impl<T> JobHandle<T> {
    /// Get the unique job ID
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Priority the job was submitted with
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Check whether the outcome is available, without blocking
    pub fn is_ready(&mut self) -> bool {
        if self.outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(ThreadError::job_discarded(self.job_id)))
                }
            }
        }
        self.outcome.is_some()
    }

    /// Block for at most `timeout` waiting for the outcome
    ///
    /// Returns `true` if the outcome is now available; [`wait`](Self::wait)
    /// will then return without blocking.
    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        if self.outcome.is_none() {
            match self.receiver.recv_timeout(timeout) {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.outcome = Some(Err(ThreadError::job_discarded(self.job_id)))
                }
            }
        }
        self.outcome.is_some()
    }

    /// Block until the job has run and return its outcome
    ///
    /// # Errors
    ///
    /// - whatever error the job itself returned
    /// - `ThreadError::JobPanicked` if the job panicked
    /// - `ThreadError::JobDiscarded` if the job was dropped without running
    pub fn wait(mut self) -> Result<T> {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        let job_id = self.job_id;
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(ThreadError::job_discarded(job_id)))
    }
}

/// Job half of a packaged closure
struct PackagedJob<F, T> {
    job_id: u64,
    closure: Option<F>,
    sender: Sender<Result<T>>,
}

impl<F, T> Job for PackagedJob<F, T>
where
    F: FnOnce() -> Result<T> + Send,
    T: Send,
{
    fn execute(&mut self) -> Result<()> {
        let closure = self.closure.take().ok_or_else(|| {
            ThreadError::other("PackagedJob already executed - cannot execute twice")
        })?;

        let outcome = match catch_unwind(AssertUnwindSafe(closure)) {
            Ok(outcome) => outcome,
            Err(payload) => Err(ThreadError::job_panicked(
                self.job_id,
                panic_message(payload.as_ref()),
            )),
        };

        // The caller may have dropped the handle; the outcome is discarded then.
        let _ = self.sender.send(outcome);
        Ok(())
    }

    fn job_type(&self) -> &str {
        "PackagedJob"
    }
}

/// Bind `f` into a queueable job and the handle that observes its outcome
pub(crate) fn package<F, T>(priority: Priority, f: F) -> (BoxedJob, JobHandle<T>)
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let job_id = next_job_id();
    let (sender, receiver) = bounded(1);

    let job = PackagedJob {
        job_id,
        closure: Some(f),
        sender,
    };
    let handle = JobHandle {
        job_id,
        priority,
        receiver,
        outcome: None,
    };

    (Box::new(job), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_handle_not_ready_before_execution() {
        let (_job, mut handle) = package(Priority::Normal, || Ok(1));
        assert!(!handle.is_ready());
        assert!(!handle.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_handle_receives_value() {
        let (mut job, mut handle) = package(Priority::High, || Ok("done"));
        assert_eq!(handle.priority(), Priority::High);

        job.execute().expect("packaged job should execute");
        assert!(handle.is_ready());
        // Readiness is sticky
        assert!(handle.is_ready());
        assert_eq!(handle.wait().unwrap(), "done");
    }

    #[test]
    fn test_handle_receives_job_error() {
        let (mut job, handle) =
            package::<_, u32>(Priority::Normal, || Err(ThreadError::execution("parse", "bad")));

        // The failure belongs to the handle, not to the worker
        assert!(job.execute().is_ok());
        assert!(matches!(
            handle.wait(),
            Err(ThreadError::ExecutionError { ref message, .. }) if message == "bad"
        ));
    }

    #[test]
    fn test_handle_captures_panic() {
        let (mut job, handle) = package::<_, ()>(Priority::Critical, || panic!("exploded"));
        let job_id = handle.job_id();

        assert!(job.execute().is_ok());
        match handle.wait() {
            Err(ThreadError::JobPanicked { job_id: id, message }) => {
                assert_eq!(id, job_id);
                assert_eq!(message, "exploded");
            }
            other => panic!("expected JobPanicked, got {:?}", other),
        }
    }

    #[test]
    fn test_dropped_job_reports_discarded() {
        let (job, mut handle) = package(Priority::Normal, || Ok(5));
        let job_id = handle.job_id();
        drop(job);

        assert!(handle.is_ready());
        assert!(matches!(
            handle.wait(),
            Err(ThreadError::JobDiscarded { job_id: id }) if id == job_id
        ));
    }

    #[test]
    fn test_packaged_job_runs_once() {
        let (mut job, _handle) = package(Priority::Normal, || Ok(()));
        assert!(job.execute().is_ok());
        assert!(job.execute().is_err());
    }

    #[test]
    fn test_wait_blocks_until_executed_elsewhere() {
        let (mut job, handle) = package(Priority::Normal, || Ok(99u64));

        let runner = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            job.execute()
        });

        assert_eq!(handle.wait().unwrap(), 99);
        runner.join().unwrap().unwrap();
    }

    #[test]
    fn test_job_ids_are_unique() {
        let (_a, first) = package(Priority::Normal, || Ok(()));
        let (_b, second) = package(Priority::Normal, || Ok(()));
        assert_ne!(first.job_id(), second.job_id());
    }
}
