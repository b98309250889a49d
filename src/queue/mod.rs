//! Priority queue bank.
//!
//! Jobs wait in one FIFO per [`Priority`](crate::Priority) level. A worker
//! looking for work takes the front of the highest non-empty level, so a
//! queued `Critical` job always runs before any queued `High` or `Normal`
//! job, and jobs of equal priority run in submission order.
//!
//! There is no starvation protection between levels: a steady stream of
//! `Critical` work can hold back `Normal` work indefinitely.

mod bank;

pub use bank::{QueueBank, QueueDepths};
