//! Core benchmark execution logic.

use std::fs;

use log::{error, info, warn};

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::{
    Dataset, Experiment, MeasurementRecord, MismatchReport, SweepConfig, SweepReport,
};
use super::performance_metrics::print_performance_analysis;
use super::results_sink::{CsvResultsSink, ResultsSink};
use crate::data_gen::{generate_filter, generate_input, reset, zeroed_buffer};
use crate::errors::{FilterResult, TimerResult};
use crate::kernels::{FilterConfig, KernelVariant, UnrollFactor};
use crate::oracle::{CheckOutcome, check};
use crate::timer::{self, Elapsed};

pub const DEFAULT_CONFIG_PATH: &str = "configs/filter_sweep.json";

/// Configuration loader that handles JSON files with fallbacks
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file with fallback to defaults
    pub fn load_config<T>(path: &str, config_name: &str) -> BenchmarkResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| BenchmarkError::ConfigParseError {
                    path: path.to_string(),
                    source: e,
                })
            }
            Err(_) => {
                warn!(
                    "Config file '{}' not found, using default configuration for {}",
                    path, config_name
                );
                Ok(T::default())
            }
        }
    }

    /// Load the sweep configuration, defaulting to `configs/filter_sweep.json`
    pub fn load_sweep_config(path: Option<&str>) -> BenchmarkResult<SweepConfig> {
        Self::load_config(path.unwrap_or(DEFAULT_CONFIG_PATH), "filter_sweep")
    }
}

/// Buffers shared by every measurement of a sweep.
///
/// Allocated once so allocation cost never lands inside a timed region.
pub struct FilterWorkspace {
    input: Vec<u32>,
    filter: Vec<u32>,
    output: Vec<u32>,
    baseline: Vec<u32>,
}

impl FilterWorkspace {
    pub fn allocate(data_len: usize, filter_capacity: usize) -> FilterResult<Self> {
        Ok(Self {
            input: generate_input(data_len)?,
            filter: generate_filter(filter_capacity)?,
            output: zeroed_buffer(data_len)?,
            baseline: zeroed_buffer(data_len)?,
        })
    }

    pub fn input(&self) -> &[u32] {
        &self.input
    }

    pub fn output(&self) -> &[u32] {
        &self.output
    }

    pub fn baseline(&self) -> &[u32] {
        &self.baseline
    }
}

/// One timed kernel run awaiting its record.
struct Sample {
    variant: KernelVariant,
    dataset: Dataset,
    filter_len: usize,
    threads: Option<usize>,
    interval: TimerResult<Elapsed>,
    outcome: CheckOutcome,
}

/// Runs the configured sweep and streams every record into a sink.
pub struct SweepDriver<'a, S: ResultsSink> {
    config: &'a SweepConfig,
    workspace: FilterWorkspace,
    sink: &'a mut S,
    report: SweepReport,
}

impl<'a, S: ResultsSink> SweepDriver<'a, S> {
    /// Validates `config` and allocates the working buffers.
    pub fn new(config: &'a SweepConfig, sink: &'a mut S) -> BenchmarkResult<Self> {
        config.validate()?;
        info!(
            "Allocating buffers: data length {}, filter capacity {}",
            config.data_len, config.filter_capacity
        );
        let workspace = FilterWorkspace::allocate(config.data_len, config.filter_capacity)?;
        Ok(Self {
            config,
            workspace,
            sink,
            report: SweepReport::default(),
        })
    }

    pub fn workspace(&self) -> &FilterWorkspace {
        &self.workspace
    }

    /// Runs `experiments` for every configured filter length.
    ///
    /// The serial baseline is computed once per filter length and reused by
    /// every comparison at that length.
    pub fn run(&mut self, experiments: &[Experiment]) -> BenchmarkResult<()> {
        let filter_lens = self.config.filter_lens.clone();
        for filter_len in filter_lens {
            info!("{}", "=".repeat(80));
            info!("Filter length {}", filter_len);
            info!("{}", "=".repeat(80));

            self.compute_baseline(filter_len)?;

            for experiment in experiments {
                info!("Running experiment '{}'", experiment.name());
                match experiment {
                    Experiment::ThreadScaling => self.run_thread_scaling(filter_len)?,
                    Experiment::Unrolling => self.run_unrolling(filter_len)?,
                    Experiment::Scheduling => self.run_scheduling(filter_len)?,
                }
            }
        }
        Ok(())
    }

    pub fn report(&self) -> &SweepReport {
        &self.report
    }

    pub fn into_report(self) -> SweepReport {
        self.report
    }

    fn run_thread_scaling(&mut self, filter_len: usize) -> BenchmarkResult<()> {
        self.measure(
            KernelVariant::SerialFilterFirst,
            Dataset::SerialFilter,
            filter_len,
            &FilterConfig::new(),
            filter_len.to_string(),
        )?;

        let thread_counts = self.config.thread_counts.clone();
        for threads in thread_counts {
            let config = FilterConfig::new().with_threads(threads);
            self.measure(
                KernelVariant::ParallelFilterFirst,
                Dataset::ParallelFilter,
                filter_len,
                &config,
                threads.to_string(),
            )?;
            self.measure(
                KernelVariant::ParallelDataFirst,
                Dataset::ParallelData,
                filter_len,
                &config,
                threads.to_string(),
            )?;
        }
        Ok(())
    }

    fn run_unrolling(&mut self, filter_len: usize) -> BenchmarkResult<()> {
        let unroll_factors = self.config.unroll_factors.clone();
        for factor in unroll_factors {
            let config = FilterConfig::new()
                .with_threads(self.config.unroll_threads)
                .with_unroll(UnrollFactor::new(factor)?);
            self.measure(
                KernelVariant::ParallelFilterFirst,
                Dataset::ParallelFilterUnrolled,
                filter_len,
                &config,
                factor.to_string(),
            )?;
            self.measure(
                KernelVariant::ParallelDataFirst,
                Dataset::ParallelDataUnrolled,
                filter_len,
                &config,
                factor.to_string(),
            )?;
        }
        Ok(())
    }

    fn run_scheduling(&mut self, filter_len: usize) -> BenchmarkResult<()> {
        let schedules = self.config.schedules.clone();
        for schedule in schedules {
            let config = FilterConfig::new()
                .with_threads(self.config.schedule_threads)
                .with_schedule(schedule);
            self.measure(
                KernelVariant::ParallelDataFirst,
                Dataset::ParallelDataScheduled,
                filter_len,
                &config,
                schedule.to_string(),
            )?;
        }
        Ok(())
    }

    fn compute_baseline(&mut self, filter_len: usize) -> BenchmarkResult<()> {
        let variant = KernelVariant::SerialDataFirst;
        let label = filter_len.to_string();
        for _ in 0..self.config.repetitions {
            let FilterWorkspace {
                input,
                filter,
                baseline,
                ..
            } = &mut self.workspace;
            reset(baseline);
            let (result, interval) = timer::measure(|| {
                variant.run(input, &filter[..filter_len], baseline, &FilterConfig::new())
            });
            result?;
            self.settle(
                &label,
                Sample {
                    variant,
                    dataset: Dataset::SerialData,
                    filter_len,
                    threads: None,
                    interval,
                    outcome: CheckOutcome::Match,
                },
            )?;
        }
        Ok(())
    }

    fn measure(
        &mut self,
        variant: KernelVariant,
        dataset: Dataset,
        filter_len: usize,
        config: &FilterConfig,
        label: String,
    ) -> BenchmarkResult<()> {
        let threads = variant.is_parallel().then(|| config.get_threads());
        for _ in 0..self.config.repetitions {
            let FilterWorkspace {
                input,
                filter,
                output,
                baseline,
            } = &mut self.workspace;
            reset(output);
            let (result, interval) =
                timer::measure(|| variant.run(input, &filter[..filter_len], output, config));
            result?;
            let outcome = check(baseline, output);
            self.settle(
                &label,
                Sample {
                    variant,
                    dataset,
                    filter_len,
                    threads,
                    interval,
                    outcome,
                },
            )?;
        }
        Ok(())
    }

    /// Logs and records one sample.
    ///
    /// A reversed interval or a disagreement with the baseline marks the record
    /// as suspect; it is still written and the sweep goes on.
    fn settle(&mut self, label: &str, sample: Sample) -> BenchmarkResult<()> {
        let (elapsed, mut suspect) = self.resolve_interval(sample.variant, sample.interval);
        self.log_measurement(sample.variant, sample.dataset, label, elapsed, sample.threads);

        if !sample.outcome.is_match() {
            suspect = true;
            self.report_mismatch(sample.dataset, label, sample.filter_len, sample.outcome);
        }
        self.record(sample.dataset, MeasurementRecord::new(label, elapsed, suspect))
    }

    /// A reversed interval is recorded as zero and flagged rather than aborting the sweep.
    fn resolve_interval(
        &self,
        variant: KernelVariant,
        interval: TimerResult<Elapsed>,
    ) -> (Elapsed, bool) {
        match interval {
            Ok(elapsed) => (elapsed, false),
            Err(e) => {
                warn!("{}: {}; recording as suspect", variant, e);
                (Elapsed::default(), true)
            }
        }
    }

    fn log_measurement(
        &self,
        variant: KernelVariant,
        dataset: Dataset,
        label: &str,
        elapsed: Elapsed,
        threads: Option<usize>,
    ) {
        match threads {
            Some(threads) => info!(
                "{} took {} seconds and {} microseconds.  {} = {} (threads = {})",
                variant,
                elapsed.seconds,
                elapsed.micros,
                dataset.label_column(),
                label,
                threads
            ),
            None => info!(
                "{} took {} seconds and {} microseconds.  {} = {}",
                variant,
                elapsed.seconds,
                elapsed.micros,
                dataset.label_column(),
                label
            ),
        }
    }

    fn report_mismatch(
        &mut self,
        dataset: Dataset,
        label: &str,
        filter_len: usize,
        outcome: CheckOutcome,
    ) {
        warn!("{} [{} = {}]: {}", dataset, dataset.label_column(), label, outcome);
        self.report.mismatches.push(MismatchReport {
            dataset,
            label: label.to_string(),
            filter_len,
            outcome,
        });
    }

    fn record(&mut self, dataset: Dataset, record: MeasurementRecord) -> BenchmarkResult<()> {
        self.sink.append(dataset, &record)?;
        self.report.records.push((dataset, record));
        Ok(())
    }
}

/// Main benchmark runner
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run all available benchmarks
    pub fn run_all_benchmarks(config: &SweepConfig) -> BenchmarkResult<SweepReport> {
        info!("Starting full filter benchmark sweep");
        Self::run_experiments(config, &Experiment::ALL)
    }

    /// Run a specific benchmark by name
    pub fn run_benchmark(benchmark_name: &str, config: &SweepConfig) -> BenchmarkResult<SweepReport> {
        match Experiment::from_name(benchmark_name) {
            Some(experiment) => Self::run_experiments(config, &[experiment]),
            None => Err(BenchmarkError::UnknownBenchmark {
                name: benchmark_name.to_string(),
            }),
        }
    }

    /// List available benchmarks
    pub fn list_benchmarks() {
        println!("Available benchmarks:");
        for experiment in Experiment::ALL {
            println!("  {:<9} - {}", experiment.name(), experiment.description());
        }
    }

    fn run_experiments(
        config: &SweepConfig,
        experiments: &[Experiment],
    ) -> BenchmarkResult<SweepReport> {
        config.validate()?;

        info!("{}", "=".repeat(80));
        info!("Membership Filter Benchmark");
        info!(
            "Data length: {}, filter lengths: {:?}",
            config.data_len, config.filter_lens
        );
        info!(
            "Threads: {:?}, unroll factors: {:?} @ {} threads, schedules: {:?} @ {} threads",
            config.thread_counts,
            config.unroll_factors,
            config.unroll_threads,
            config.schedules.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            config.schedule_threads
        );
        info!("Repetitions per point: {}", config.repetitions);
        info!("Results directory: {}", config.output_dir);
        info!("{}", "=".repeat(80));

        let mut sink = CsvResultsSink::open(&config.output_dir)?;
        let mut driver = SweepDriver::new(config, &mut sink)?;
        driver.run(experiments)?;
        let report = driver.into_report();

        print_performance_analysis(&report);

        if report.is_clean() {
            info!("All benchmarks completed successfully");
        } else {
            error!(
                "{} measurement(s) failed the baseline check and were flagged as suspect",
                report.mismatches.len()
            );
        }
        Ok(report)
    }
}
