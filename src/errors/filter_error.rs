use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised while preparing buffers or running a filter kernel.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Output buffer length mismatch: expected {expected} elements to match the input, got {actual}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    #[error("Thread count must be at least 1, got {count}")]
    InvalidThreadCount { count: usize },

    #[error("Unroll factor must be at least 1, got {factor}")]
    InvalidUnrollFactor { factor: usize },

    #[error("Schedule chunk size must be at least 1, got {chunk}")]
    InvalidChunkSize { chunk: usize },

    #[error("Unknown schedule '{name}'. Supported: static, static-<n>, dynamic[-<n>], guided[-<n>]")]
    UnknownSchedule { name: String },

    #[error("Failed to allocate a buffer of {len} u32 values")]
    AllocationFailed {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Worker thread panicked during parallel filtering")]
    ThreadPanicked,
}
