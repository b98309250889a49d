//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedJob, ClosureJob, Job, JobHandle, Priority, Result, ThreadError};
pub use crate::pool::{ShutdownMode, ThreadPool, ThreadPoolConfig, WorkerStatSnapshot};
pub use crate::queue::QueueDepths;
