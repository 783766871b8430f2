//! Tests for error types in the filter benchmark library.
//!
//! Covers the error variants the kernels, scheduler, timer and driver
//! actually produce, including their messages and source chains.

use filter_bench::benchmarks::{BenchmarkError, BenchmarkRunner, SweepConfig};
use filter_bench::errors::{FilterError, TimerError};
use filter_bench::timer::{Timestamp, elapsed};
use filter_bench::{FilterConfig, KernelVariant, Schedule, UnrollFactor};
use std::error::Error;

#[cfg(test)]
mod filter_error_tests {
    use super::*;

    #[test]
    fn test_output_length_mismatch() {
        let input = vec![1u32, 2, 3];
        let filter = vec![1u32];
        let mut output = vec![0u32; 2];

        let result = KernelVariant::ParallelDataFirst.run(
            &input,
            &filter,
            &mut output,
            &FilterConfig::new(),
        );
        assert!(matches!(
            result,
            Err(FilterError::OutputLengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_invalid_thread_count() {
        let input = vec![1u32; 4];
        let mut output = vec![0u32; 4];
        let config = FilterConfig::new().with_threads(0);

        let result = KernelVariant::ParallelFilterFirst.run(&input, &[1], &mut output, &config);
        let err = result.expect_err("Zero threads should be rejected");
        assert!(matches!(err, FilterError::InvalidThreadCount { count: 0 }));
        assert_eq!(err.to_string(), "Thread count must be at least 1, got 0");
    }

    #[test]
    fn test_invalid_unroll_factor() {
        let err = UnrollFactor::new(0).expect_err("Zero unroll should be rejected");
        assert_eq!(err.to_string(), "Unroll factor must be at least 1, got 0");
    }

    #[test]
    fn test_invalid_schedule_chunk_in_kernel() {
        let input = vec![1u32; 4];
        let mut output = vec![0u32; 4];
        let config = FilterConfig::new()
            .with_threads(2)
            .with_schedule(Schedule::StaticChunk(0));

        let result = KernelVariant::ParallelDataFirst.run(&input, &[1], &mut output, &config);
        assert!(matches!(result, Err(FilterError::InvalidChunkSize { chunk: 0 })));
    }

    #[test]
    fn test_unknown_schedule_message() {
        let err = "round-robin".parse::<Schedule>().expect_err("Unknown name should fail");
        assert!(err.to_string().contains("round-robin"));
    }

    #[test]
    fn test_allocation_failure_has_source() {
        let err = filter_bench::data_gen::generate_input(usize::MAX)
            .expect_err("Allocation of usize::MAX elements should fail");
        assert!(matches!(err, FilterError::AllocationFailed { .. }));
        assert!(err.source().is_some());
    }
}

#[cfg(test)]
mod timer_error_tests {
    use super::*;

    #[test]
    fn test_end_before_start_message() {
        let err = elapsed(Timestamp::new(2, 0), Timestamp::new(0, 500_000))
            .expect_err("Reversed interval should be flagged");
        assert_eq!(
            err,
            TimerError::EndBeforeStart {
                seconds: 1,
                micros: 500_000
            }
        );
        assert_eq!(
            err.to_string(),
            "Interval end precedes its start by 1 seconds and 500000 microseconds"
        );
    }
}

#[cfg(test)]
mod benchmark_error_tests {
    use super::*;

    #[test]
    fn test_unknown_benchmark() {
        let result = BenchmarkRunner::run_benchmark("histogram", &SweepConfig::default());
        match result {
            Err(BenchmarkError::UnknownBenchmark { name }) => assert_eq!(name, "histogram"),
            other => panic!("Expected UnknownBenchmark, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_allocation() {
        let config = SweepConfig {
            thread_counts: vec![0],
            ..SweepConfig::default()
        };
        let result = BenchmarkRunner::run_all_benchmarks(&config);
        assert!(matches!(
            result,
            Err(BenchmarkError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_kernel_error_conversion_keeps_source() {
        let err: BenchmarkError = FilterError::ThreadPanicked.into();
        assert!(matches!(err, BenchmarkError::KernelError { .. }));
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Worker thread panicked during parallel filtering".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BenchmarkError = io.into();
        assert!(err.to_string().starts_with("IO error"));
        assert!(err.source().is_some());
    }
}
