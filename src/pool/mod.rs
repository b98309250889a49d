//! Thread pool, scheduler core and worker implementations

mod scheduler;
pub mod thread_pool;
pub mod worker;

pub use thread_pool::{ShutdownMode, ThreadPool, ThreadPoolConfig};
pub(crate) use worker::Worker;
pub use worker::{WorkerStatSnapshot, WorkerStats};
