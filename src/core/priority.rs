//! Job priority levels
//!
//! Three levels, totally ordered `Normal < High < Critical`. Workers always
//! scan the queues in [`Priority::DESCENDING`] order.

use crate::core::error::ThreadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job priority levels (higher number = higher priority)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Default for most work
    #[default]
    Normal = 0,
    /// Runs before any queued Normal job
    High = 1,
    /// Runs before anything else that is queued
    Critical = 2,
}

impl Priority {
    /// Number of priority levels
    pub const COUNT: usize = 3;

    /// All levels in the order workers scan them
    pub const DESCENDING: [Priority; Priority::COUNT] =
        [Priority::Critical, Priority::High, Priority::Normal];

    /// Get the numeric value of the priority
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Slot of this level in per-priority arrays
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used by `Display` and serde
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ThreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(ThreadError::InvalidPriority(s.to_string())),
        }
    }
}
