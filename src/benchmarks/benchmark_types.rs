//! Benchmark type definitions and configuration structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use crate::oracle::CheckOutcome;
use crate::schedule::Schedule;
use crate::timer::Elapsed;

/// Sweep plan for the filter benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub name: String,
    pub description: String,
    /// Length of the data array.
    pub data_len: usize,
    /// Length of the generated filter array; each sweep point uses a prefix.
    pub filter_capacity: usize,
    pub filter_lens: Vec<usize>,
    pub thread_counts: Vec<usize>,
    pub unroll_factors: Vec<usize>,
    pub unroll_threads: usize,
    pub schedules: Vec<Schedule>,
    pub schedule_threads: usize,
    /// Measurements taken per configuration point.
    pub repetitions: u32,
    /// Directory that receives the CSV datasets.
    pub output_dir: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            name: "filter_sweep".to_string(),
            description: "Brute-force membership filter over loop order, threads, unrolling and scheduling"
                .to_string(),
            data_len: 512 * 512 * 256,
            filter_capacity: 1024,
            filter_lens: vec![512],
            thread_counts: vec![2, 4, 8, 16],
            unroll_factors: vec![2],
            unroll_threads: 16,
            schedules: vec![
                Schedule::Dynamic(1),
                Schedule::Guided(1),
                Schedule::StaticChunk(32),
                Schedule::StaticChunk(64),
            ],
            schedule_threads: 16,
            repetitions: 1,
            output_dir: ".".to_string(),
        }
    }
}

impl SweepConfig {
    /// Validates the configuration
    pub fn validate(&self) -> BenchmarkResult<()> {
        if self.repetitions == 0 {
            return Err(invalid("repetitions", "Repetitions must be greater than 0"));
        }

        if self.data_len == 0 {
            return Err(invalid("data_len", "Data length must be greater than 0"));
        }

        if self.filter_lens.is_empty() {
            return Err(invalid("filter_lens", "At least one filter length is required"));
        }

        if let Some(&len) = self
            .filter_lens
            .iter()
            .find(|&&len| len > self.filter_capacity)
        {
            return Err(invalid(
                "filter_lens",
                &format!(
                    "Filter length {} exceeds filter capacity {}",
                    len, self.filter_capacity
                ),
            ));
        }

        if self.thread_counts.contains(&0) {
            return Err(invalid("thread_counts", "Thread counts must be greater than 0"));
        }

        if self.unroll_factors.contains(&0) {
            return Err(invalid("unroll_factors", "Unroll factors must be greater than 0"));
        }

        if self.unroll_threads == 0 {
            return Err(invalid("unroll_threads", "Thread count must be greater than 0"));
        }

        if self.schedule_threads == 0 {
            return Err(invalid("schedule_threads", "Thread count must be greater than 0"));
        }

        for schedule in &self.schedules {
            schedule
                .validate()
                .map_err(|e| invalid("schedules", &e.to_string()))?;
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> BenchmarkError {
    BenchmarkError::ConfigValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// The experiments the driver can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Experiment {
    ThreadScaling,
    Unrolling,
    Scheduling,
}

impl Experiment {
    pub const ALL: [Experiment; 3] = [
        Experiment::ThreadScaling,
        Experiment::Unrolling,
        Experiment::Scheduling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Experiment::ThreadScaling => "threads",
            Experiment::Unrolling => "unroll",
            Experiment::Scheduling => "schedule",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Experiment::ThreadScaling => {
                "Serial and parallel filter-first / data-first across thread counts"
            }
            Experiment::Unrolling => "Parallel filter-first / data-first across unroll factors",
            Experiment::Scheduling => "Parallel data-first across scheduling policies",
        }
    }

    pub fn from_name(name: &str) -> Option<Experiment> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

/// One CSV dataset per experiment dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    SerialData,
    SerialFilter,
    ParallelData,
    ParallelFilter,
    ParallelDataUnrolled,
    ParallelFilterUnrolled,
    ParallelDataScheduled,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::SerialData,
        Dataset::SerialFilter,
        Dataset::ParallelData,
        Dataset::ParallelFilter,
        Dataset::ParallelDataUnrolled,
        Dataset::ParallelFilterUnrolled,
        Dataset::ParallelDataScheduled,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::SerialData => "serial-data.csv",
            Dataset::SerialFilter => "serial-filter.csv",
            Dataset::ParallelData => "parallel-data.csv",
            Dataset::ParallelFilter => "parallel-filter.csv",
            Dataset::ParallelDataUnrolled => "parallel-data-unrolled.csv",
            Dataset::ParallelFilterUnrolled => "parallel-filter-unrolled.csv",
            Dataset::ParallelDataScheduled => "parallel-data-scheduled.csv",
        }
    }

    /// Name of the configuration column.
    pub fn label_column(&self) -> &'static str {
        match self {
            Dataset::SerialData | Dataset::SerialFilter => "filter length",
            Dataset::ParallelData | Dataset::ParallelFilter => "threads",
            Dataset::ParallelDataUnrolled | Dataset::ParallelFilterUnrolled => "unroll",
            Dataset::ParallelDataScheduled => "schedule",
        }
    }

    pub fn header(&self) -> String {
        format!("{},sec,us,suspect", self.label_column())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".csv"))
    }
}

/// A single timed kernel invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub label: String,
    pub seconds: u64,
    pub micros: u32,
    /// Set when the output failed the baseline check or the interval could not
    /// be measured.
    pub suspect: bool,
}

impl MeasurementRecord {
    pub fn new(label: impl Into<String>, elapsed: Elapsed, suspect: bool) -> Self {
        Self {
            label: label.into(),
            seconds: elapsed.seconds,
            micros: elapsed.micros,
            suspect,
        }
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed {
            seconds: self.seconds,
            micros: self.micros,
        }
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.label,
            self.seconds,
            self.micros,
            u8::from(self.suspect)
        )
    }
}

/// A baseline check that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchReport {
    pub dataset: Dataset,
    pub label: String,
    pub filter_len: usize,
    pub outcome: CheckOutcome,
}

/// Everything a sweep produced, in recording order.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub records: Vec<(Dataset, MeasurementRecord)>,
    pub mismatches: Vec<MismatchReport>,
}

impl SweepReport {
    pub fn records_for(&self, dataset: Dataset) -> impl Iterator<Item = &MeasurementRecord> {
        self.records
            .iter()
            .filter(move |(d, _)| *d == dataset)
            .map(|(_, r)| r)
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}
