//! Error types for timing operations.

use thiserror::Error;

/// Errors that can occur when measuring an interval.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("Interval end precedes its start by {seconds} seconds and {micros} microseconds")]
    EndBeforeStart { seconds: u64, micros: u32 },
}
