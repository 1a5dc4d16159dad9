use std::io;
use thiserror::Error;

/// Error type for thread pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// IO error from spawning a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The pool was asked for zero worker threads.
    #[error("thread count must be at least 1, got {0}")]
    InvalidThreadCount(u32),
}

/// Result type alias for thread pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
