//! # Priority Thread Pool
//!
//! A fixed-size worker pool with three priority levels and result handles.
//!
//! ## Features
//!
//! - **Fixed worker set**: threads start with the pool and are joined at shutdown
//! - **Priority scheduling**: `Critical` before `High` before `Normal`, FIFO within a level
//! - **Result handles**: every submission returns a [`JobHandle`] carrying the
//!   closure's value, its error, or its captured panic
//! - **Graceful shutdown**: running jobs always finish; queued jobs are drained
//!   or discarded according to [`ShutdownMode`]
//! - **Worker statistics**: per-worker and per-priority job counters
//!
//! ## Quick Start
//!
//! ```rust
//! use priority_thread_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(4)?;
//!
//! let squares: Vec<_> = (0..10u64)
//!     .map(|i| pool.submit(move || i * i))
//!     .collect::<Result<_>>()?;
//!
//! let report = pool.submit_with_priority(|| "urgent report", Priority::Critical)?;
//! assert_eq!(report.wait()?, "urgent report");
//!
//! let total: u64 = squares
//!     .into_iter()
//!     .map(JobHandle::wait)
//!     .sum::<Result<u64>>()?;
//! assert_eq!(total, 285);
//!
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors Travel Through the Handle
//!
//! ```rust
//! use priority_thread_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//!
//! let handle = pool.submit(|| -> u32 { panic!("bad input") })?;
//! assert!(matches!(handle.wait(), Err(ThreadError::JobPanicked { .. })));
//!
//! // Workers survive; the pool keeps accepting work
//! assert_eq!(pool.submit(|| 40 + 2)?.wait()?, 42);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use priority_thread_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = ThreadPoolConfig::new(8)
//!     .with_thread_name_prefix("render")
//!     .with_shutdown_mode(ShutdownMode::Discard);
//!
//! let pool = ThreadPool::with_config(config)?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use crate::core::{BoxedJob, ClosureJob, Job, JobHandle, Priority, Result, ThreadError};
pub use crate::pool::{ShutdownMode, ThreadPool, ThreadPoolConfig, WorkerStatSnapshot, WorkerStats};
