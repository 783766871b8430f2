//! Error types for benchmark operations.

use std::error::Error;
use std::fmt;

use crate::errors::FilterError;

#[derive(Debug)]
pub enum BenchmarkError {
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },
    ConfigValidationError {
        field: String,
        message: String,
    },
    IoError {
        source: std::io::Error,
    },
    SinkOpenError {
        path: String,
        source: std::io::Error,
    },
    KernelError {
        source: FilterError,
    },
    UnknownBenchmark {
        name: String,
    },
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkError::ConfigParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration file '{}': {}",
                    path, source
                )
            }
            BenchmarkError::ConfigValidationError { field, message } => {
                write!(
                    f,
                    "Configuration validation error for field '{}': {}",
                    field, message
                )
            }
            BenchmarkError::IoError { source } => {
                write!(f, "IO error: {}", source)
            }
            BenchmarkError::SinkOpenError { path, source } => {
                write!(f, "Failed to open results file '{}': {}", path, source)
            }
            BenchmarkError::KernelError { source } => {
                write!(f, "Filter kernel error: {}", source)
            }
            BenchmarkError::UnknownBenchmark { name } => {
                write!(
                    f,
                    "Unknown benchmark '{}'. Supported: threads, unroll, schedule",
                    name
                )
            }
        }
    }
}

impl Error for BenchmarkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BenchmarkError::ConfigParseError { source, .. } => Some(source),
            BenchmarkError::IoError { source } => Some(source),
            BenchmarkError::SinkOpenError { source, .. } => Some(source),
            BenchmarkError::KernelError { source } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchmarkError {
    fn from(error: std::io::Error) -> Self {
        BenchmarkError::IoError { source: error }
    }
}

impl From<FilterError> for BenchmarkError {
    fn from(error: FilterError) -> Self {
        BenchmarkError::KernelError { source: error }
    }
}

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;
