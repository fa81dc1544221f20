//! Error types for execution backends.

use thiserror::Error;

/// Faults raised while setting up or launching a pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Block size outside the supported lane range.
    #[error("Invalid block size {block_size}: must be in 1..={max}")]
    InvalidBlockSize { block_size: usize, max: usize },

    /// The launch would need more blocks than the grid can address.
    #[error("Grid too large: {nblock} blocks requested, limit is {max}")]
    GridTooLarge { nblock: usize, max: usize },

    /// Worker pool initialization failed.
    #[error("Worker pool initialization failed: {0}")]
    PoolInit(String),
}

impl BackendError {
    /// Create a pool initialization error from any displayable cause.
    pub fn pool_init(cause: impl ToString) -> Self {
        Self::PoolInit(cause.to_string())
    }
}
