use thiserror::Error;

use crate::job::{JobId, JobStatus};

/// Errors surfaced by lifecycle and query calls. None of them are fatal to
/// the registry, and a failed call leaves every job unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Cannot {action} job {job_id} while {from}")]
    InvalidTransition {
        job_id: JobId,
        from: JobStatus,
        action: &'static str,
    },

    #[error("Registry is shut down")]
    ShutDown,
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("min_length ({min}) must not exceed max_length ({max})")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("threads_count must be at least 1")]
    InvalidThreads,

    #[error("success_probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("tick_interval must be non-zero")]
    InvalidTickInterval,

    #[error("max_progress_step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("attempts_per_tick range {start}..{end} is empty")]
    InvalidAttemptsRange { start: u64, end: u64 },

    #[error("event_capacity must be non-zero")]
    InvalidEventCapacity,

    #[error("Unknown attack method: {0}")]
    UnknownMethod(String),
}
