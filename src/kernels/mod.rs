//! Membership filter kernels.
//!
//! Every kernel implements the same contract: for each data index `i` whose
//! value appears anywhere in the filter, `output[i] = input[i]`; all other
//! slots are left untouched (zero after a reset). Kernels differ only in how
//! the nested loop is organized: which dimension is outer, whether the outer
//! dimension is split across threads, how many inner iterations are unrolled
//! per step, and how the parallel work is scheduled.

mod parallel;
mod serial;
pub mod unroll;

use std::fmt;

pub use parallel::FilterConfig;
pub use unroll::UnrollFactor;

use crate::errors::{FilterError, FilterResult};

/// Which array drives the outer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopOrder {
    FilterFirst,
    DataFirst,
}

/// The kernel variants under measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    SerialFilterFirst,
    /// Trusted baseline for the correctness oracle.
    SerialDataFirst,
    ParallelFilterFirst,
    ParallelDataFirst,
}

impl KernelVariant {
    pub const ALL: [KernelVariant; 4] = [
        KernelVariant::SerialFilterFirst,
        KernelVariant::SerialDataFirst,
        KernelVariant::ParallelFilterFirst,
        KernelVariant::ParallelDataFirst,
    ];

    pub fn order(&self) -> LoopOrder {
        match self {
            KernelVariant::SerialFilterFirst | KernelVariant::ParallelFilterFirst => {
                LoopOrder::FilterFirst
            }
            KernelVariant::SerialDataFirst | KernelVariant::ParallelDataFirst => {
                LoopOrder::DataFirst
            }
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(
            self,
            KernelVariant::ParallelFilterFirst | KernelVariant::ParallelDataFirst
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            KernelVariant::SerialFilterFirst => "Serial filter first",
            KernelVariant::SerialDataFirst => "Serial data first",
            KernelVariant::ParallelFilterFirst => "Parallel filter first",
            KernelVariant::ParallelDataFirst => "Parallel data first",
        }
    }

    /// Runs this variant.
    ///
    /// `output` must be zeroed by the caller and have the same length as
    /// `input`. Serial variants ignore the thread count and schedule in
    /// `config` but honour its unroll factor.
    pub fn run(
        &self,
        input: &[u32],
        filter: &[u32],
        output: &mut [u32],
        config: &FilterConfig,
    ) -> FilterResult<()> {
        if output.len() != input.len() {
            return Err(FilterError::OutputLengthMismatch {
                expected: input.len(),
                actual: output.len(),
            });
        }

        if self.is_parallel() {
            parallel::filter_parallel(self.order(), input, filter, output, config)
        } else {
            serial::filter_serial(self.order(), input, filter, output, config.unroll());
            Ok(())
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Runs `variant` with default settings: no unrolling, static schedule, and
/// every available core for parallel variants.
pub fn apply_filter(
    variant: KernelVariant,
    input: &[u32],
    filter: &[u32],
    output: &mut [u32],
) -> FilterResult<()> {
    variant.run(input, filter, output, &FilterConfig::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_case() -> (Vec<u32>, Vec<u32>) {
        let input: Vec<u32> = (0..40).map(|i| i % 9).collect();
        let filter = vec![2, 5, 7];
        (input, filter)
    }

    fn expected(input: &[u32], filter: &[u32]) -> Vec<u32> {
        input
            .iter()
            .map(|v| if filter.contains(v) { *v } else { 0 })
            .collect()
    }

    #[test]
    fn test_every_variant_matches_reference() {
        let (input, filter) = small_case();
        let reference = expected(&input, &filter);
        for variant in KernelVariant::ALL {
            let mut output = vec![0u32; input.len()];
            let config = FilterConfig::new().with_threads(3);
            variant
                .run(&input, &filter, &mut output, &config)
                .unwrap();
            assert_eq!(output, reference, "{}", variant);
        }
    }

    #[test]
    fn test_output_length_checked() {
        let (input, filter) = small_case();
        let mut short = vec![0u32; input.len() - 1];
        for variant in KernelVariant::ALL {
            let result = apply_filter(variant, &input, &filter, &mut short);
            assert!(matches!(
                result,
                Err(FilterError::OutputLengthMismatch { expected: 40, actual: 39 })
            ));
        }
    }

    #[test]
    fn test_zero_threads_rejected_for_parallel_only() {
        let (input, filter) = small_case();
        let config = FilterConfig::new().with_threads(0);
        for variant in KernelVariant::ALL {
            let mut output = vec![0u32; input.len()];
            let result = variant.run(&input, &filter, &mut output, &config);
            assert_eq!(result.is_err(), variant.is_parallel(), "{}", variant);
        }
    }

    #[test]
    fn test_variant_metadata() {
        assert_eq!(KernelVariant::SerialDataFirst.order(), LoopOrder::DataFirst);
        assert_eq!(KernelVariant::ParallelFilterFirst.order(), LoopOrder::FilterFirst);
        assert!(!KernelVariant::SerialFilterFirst.is_parallel());
        assert_eq!(KernelVariant::ParallelDataFirst.to_string(), "Parallel data first");
    }
}
