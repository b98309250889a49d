//! One FIFO queue per priority level.

use crate::core::{BoxedJob, Priority};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Per-priority FIFO queues, scanned from `Critical` down to `Normal`.
///
/// The bank is not synchronized; the scheduler core owns it behind its lock.
///
/// # Example
///
/// ```
/// use priority_thread_pool::queue::QueueBank;
/// use priority_thread_pool::{ClosureJob, Job, Priority};
///
/// let mut bank = QueueBank::new();
/// bank.push(Priority::Normal, Box::new(ClosureJob::with_name(|| Ok(()), "background")));
/// bank.push(Priority::Critical, Box::new(ClosureJob::with_name(|| Ok(()), "urgent")));
///
/// let (priority, job) = bank.pop_highest().unwrap();
/// assert_eq!(priority, Priority::Critical);
/// assert_eq!(job.job_type(), "urgent");
/// ```
pub struct QueueBank {
    queues: [VecDeque<BoxedJob>; Priority::COUNT],
}

impl QueueBank {
    /// Create a bank with an empty queue for every level
    pub fn new() -> Self {
        Self {
            queues: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
        }
    }

    /// Append a job to the back of its level's queue
    pub fn push(&mut self, priority: Priority, job: BoxedJob) {
        self.queues[priority.index()].push_back(job);
    }

    /// Take the oldest job of the highest non-empty level
    pub fn pop_highest(&mut self) -> Option<(Priority, BoxedJob)> {
        Priority::DESCENDING.iter().find_map(|&priority| {
            self.queues[priority.index()]
                .pop_front()
                .map(|job| (priority, job))
        })
    }

    /// Total number of queued jobs
    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Number of queued jobs at one level
    pub fn len_of(&self, priority: Priority) -> usize {
        self.queues[priority.index()].len()
    }

    /// True when every level is empty
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    /// Move every queued job out, leaving the bank empty
    ///
    /// The caller decides where the jobs are dropped, so destructors of
    /// captured values need not run wherever the bank itself is locked.
    pub fn take_all(&mut self) -> QueueBank {
        std::mem::take(self)
    }

    /// Snapshot of the per-level queue lengths
    pub fn depths(&self) -> QueueDepths {
        QueueDepths {
            normal: self.len_of(Priority::Normal),
            high: self.len_of(Priority::High),
            critical: self.len_of(Priority::Critical),
        }
    }
}

impl Default for QueueBank {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueueBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueBank")
            .field("depths", &self.depths())
            .finish()
    }
}

/// Number of jobs waiting at each priority level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepths {
    /// Jobs waiting at `Priority::Normal`
    pub normal: usize,
    /// Jobs waiting at `Priority::High`
    pub high: usize,
    /// Jobs waiting at `Priority::Critical`
    pub critical: usize,
}

impl QueueDepths {
    /// Jobs waiting at the given level
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Normal => self.normal,
            Priority::High => self.high,
            Priority::Critical => self.critical,
        }
    }

    /// Jobs waiting across all levels
    pub fn total(&self) -> usize {
        self.normal + self.high + self.critical
    }
}
