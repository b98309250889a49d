//! Error types for the thread pool

/// Result type for thread pool operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Errors that can occur in the thread pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ThreadError {
    /// Thread pool is shutting down and no longer accepts jobs
    #[error("Thread pool is shutting down ({pending_jobs} jobs pending)")]
    ShuttingDown {
        /// Number of jobs still queued when the submission was rejected
        pending_jobs: usize,
    },

    /// Failed to spawn a worker thread with details
    #[error("Failed to spawn worker thread #{thread_id}: {message}")]
    SpawnError {
        /// ID of the thread that failed to spawn
        thread_id: usize,
        /// Error message
        message: String,
        /// Error reported by the OS
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{thread_id}: {message}")]
    JoinError {
        /// ID of the thread that failed to join
        thread_id: usize,
        /// Error message
        message: String,
    },

    /// Job execution failed with job details
    ///
    /// Raised by job code itself, never by the pool. `job_id` is whatever
    /// label the job chose to report; it is unrelated to the numeric
    /// [`JobHandle::job_id`](crate::JobHandle::job_id).
    #[error("Job execution failed (job_id: {job_id}): {message}")]
    ExecutionError {
        /// Caller-chosen label of the failed job
        job_id: String,
        /// Error message
        message: String,
    },

    /// The submitted closure panicked
    #[error("Job #{job_id} panicked: {message}")]
    JobPanicked {
        /// ID of the job that panicked
        job_id: u64,
        /// Panic payload rendered as text
        message: String,
    },

    /// The job was dropped from the queue without being run
    #[error("Job #{job_id} was discarded before it could run")]
    JobDiscarded {
        /// ID of the discarded job
        job_id: u64,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// A priority name could not be parsed
    #[error("Unknown priority '{0}' (expected normal, high or critical)")]
    InvalidPriority(String),

    /// General error
    #[error("{0}")]
    Other(String),
}

impl ThreadError {
    /// Create a shutting down error
    pub fn shutting_down(pending_jobs: usize) -> Self {
        ThreadError::ShuttingDown { pending_jobs }
    }

    /// Create a spawn error carrying the OS error that caused it
    pub fn spawn_with_source(
        thread_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ThreadError::SpawnError {
            thread_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(thread_id: usize, message: impl Into<String>) -> Self {
        ThreadError::JoinError {
            thread_id,
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::ExecutionError {
            job_id: job_id.into(),
            message: message.into(),
        }
    }

    /// Create a job panicked error
    pub fn job_panicked(job_id: u64, message: impl Into<String>) -> Self {
        ThreadError::JobPanicked {
            job_id,
            message: message.into(),
        }
    }

    /// Create a job discarded error
    pub fn job_discarded(job_id: u64) -> Self {
        ThreadError::JobDiscarded { job_id }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ThreadError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ThreadError::shutting_down(3);
        assert!(matches!(err, ThreadError::ShuttingDown { pending_jobs: 3 }));

        let err = ThreadError::job_panicked(7, "boom");
        assert!(matches!(err, ThreadError::JobPanicked { job_id: 7, .. }));

        let err = ThreadError::execution("job_123", "bad input");
        assert!(matches!(err, ThreadError::ExecutionError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ThreadError::shutting_down(2);
        assert_eq!(
            err.to_string(),
            "Thread pool is shutting down (2 jobs pending)"
        );

        let err = ThreadError::execution("parse-config", "missing field");
        assert_eq!(
            err.to_string(),
            "Job execution failed (job_id: parse-config): missing field"
        );

        let err = ThreadError::job_discarded(42);
        assert_eq!(err.to_string(), "Job #42 was discarded before it could run");

        let err = ThreadError::InvalidPriority("urgent".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown priority 'urgent' (expected normal, high or critical)"
        );
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no threads left");
        let err = ThreadError::spawn_with_source(5, "Cannot create thread", io_err);

        assert!(matches!(err, ThreadError::SpawnError { .. }));
        assert!(err.to_string().contains("worker thread #5"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
