//! Core types and traits for the thread pool

pub mod error;
pub mod handle;
pub mod job;
pub mod priority;

pub use error::{Result, ThreadError};
pub use handle::JobHandle;
pub use job::{BoxedJob, ClosureJob, Job};
pub use priority::Priority;
