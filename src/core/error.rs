//! Error types for pool and dispatcher operations.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by object pools.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The resource factory failed to produce an instance.
    #[error("factory failed: {0}")]
    Factory(#[source] anyhow::Error),
    /// Instance was not checked out from this pool.
    #[error("invalid release: instance {instance} is not checked out from pool {pool}")]
    InvalidRelease {
        /// Pool the release was attempted on.
        pool: Uuid,
        /// Instance identifier within its originating pool.
        instance: u64,
    },
}

/// Errors produced by the event dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// One or more listeners failed during a publish.
    #[error("{failed} listener(s) failed for {event} ({delivered} delivered): {first}")]
    ListenerFailures {
        /// Event type name.
        event: &'static str,
        /// Number of listeners that failed or were skipped.
        failed: usize,
        /// Number of listeners notified successfully.
        delivered: usize,
        /// Message of the first failure.
        first: String,
    },
}

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Configuration parsed but failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
