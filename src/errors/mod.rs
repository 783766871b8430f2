//! Error types for the filter benchmark library.
//!
//! Each concern gets its own error enum instead of a generic wrapper like
//! `anyhow` or `Box<dyn Error>`, so callers can match on the exact failure.

mod filter_error;
mod timer_error;

pub use filter_error::FilterError;
pub use timer_error::TimerError;

/// Result type alias for buffer preparation and kernel execution.
pub type FilterResult<T> = std::result::Result<T, FilterError>;

/// Result type alias for interval measurement.
pub type TimerResult<T> = std::result::Result<T, TimerError>;
