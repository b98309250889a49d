//! Shared coordination state between submitters and workers.
//!
//! The queue bank and the running flag sit behind a single mutex, paired with
//! a single condition variable. Nothing outside this type can touch either,
//! so every enqueue and every dequeue scan is serialized by the same lock.

use crate::core::{BoxedJob, Priority, Result, ThreadError};
use crate::pool::thread_pool::ShutdownMode;
use crate::queue::{QueueBank, QueueDepths};
use parking_lot::{Condvar, Mutex};

struct SchedulerState {
    bank: QueueBank,
    /// Cleared once at shutdown, never set again.
    running: bool,
}

impl SchedulerState {
    fn has_work_or_stopped(&self) -> bool {
        !self.running || !self.bank.is_empty()
    }

    fn try_dequeue_highest(&mut self) -> Option<(Priority, BoxedJob)> {
        self.bank.pop_highest()
    }
}

/// The scheduler core: queue bank, running flag, lock and wake-up signal.
pub(crate) struct SchedulerCore {
    state: Mutex<SchedulerState>,
    work_available: Condvar,
}

impl SchedulerCore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                bank: QueueBank::new(),
                running: true,
            }),
            work_available: Condvar::new(),
        }
    }

    /// Queue a job and wake one waiting worker.
    ///
    /// Returns the total number of queued jobs after the push.
    pub(crate) fn enqueue(&self, job: BoxedJob, priority: Priority) -> Result<usize> {
        let depth = {
            let mut state = self.state.lock();
            if !state.running {
                return Err(ThreadError::shutting_down(state.bank.len()));
            }
            state.bank.push(priority, job);
            state.bank.len()
        };

        self.work_available.notify_one();
        Ok(depth)
    }

    /// Wait for work or shutdown, then take the highest-priority job.
    ///
    /// `None` means the pool is shutting down and nothing is left to run.
    pub(crate) fn next_job(&self) -> Option<(Priority, BoxedJob)> {
        let mut state = self.state.lock();
        while !state.has_work_or_stopped() {
            self.work_available.wait(&mut state);
        }
        state.try_dequeue_highest()
    }

    /// Clear the running flag and wake every worker.
    ///
    /// Returns `None` if shutdown had already been signalled, otherwise the
    /// number of queued jobs dropped (always 0 for `ShutdownMode::Drain`).
    /// Discarded jobs are dropped after the lock is released, since their
    /// captured values may call back into the pool from `Drop`.
    pub(crate) fn signal_shutdown(&self, mode: ShutdownMode) -> Option<usize> {
        let discarded = {
            let mut state = self.state.lock();
            if !state.running {
                return None;
            }
            state.running = false;
            match mode {
                ShutdownMode::Drain => QueueBank::new(),
                ShutdownMode::Discard => state.bank.take_all(),
            }
        };

        self.work_available.notify_all();
        let count = discarded.len();
        drop(discarded);
        Some(count)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub(crate) fn pending(&self) -> usize {
        self.state.lock().bank.len()
    }

    pub(crate) fn depths(&self) -> QueueDepths {
        self.state.lock().bank.depths()
    }
}
