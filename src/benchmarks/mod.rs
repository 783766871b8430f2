//! Benchmark driver for the membership filter kernels.
//!
//! Sweeps thread counts, unroll factors and scheduling policies, times every
//! kernel invocation, checks each output against the serial baseline and
//! appends the measurements to per-dataset CSV files.

pub mod benchmark_errors;
pub mod benchmark_runner;
pub mod benchmark_types;
pub mod performance_metrics;
pub mod results_sink;

pub use benchmark_errors::{BenchmarkError, BenchmarkResult};
pub use benchmark_runner::{BenchmarkRunner, ConfigLoader, FilterWorkspace, SweepDriver};
pub use benchmark_types::{
    Dataset, Experiment, MeasurementRecord, MismatchReport, SweepConfig, SweepReport,
};
pub use performance_metrics::{LabelSummary, loop_order_comparison, median, summarize_dataset};
pub use results_sink::{CsvResultsSink, ResultsSink};
