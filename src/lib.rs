//! Brute-force membership filter kernels and their benchmark harness.
//!
//! The library copies every element of a large data array into an output array
//! when its value appears in a small filter array, using several variants of
//! the same nested loop: filter-first or data-first, serial or parallel,
//! unrolled, and under different scheduling policies. The `benchmarks` module
//! times each variant, cross-checks it against a serial baseline and records
//! the results.

pub mod benchmarks;
pub mod data_gen;
pub mod errors;
pub mod kernels;
pub mod oracle;
pub mod schedule;
pub mod timer;

pub use kernels::{FilterConfig, KernelVariant, LoopOrder, UnrollFactor, apply_filter};
pub use oracle::{CheckOutcome, check};
pub use schedule::Schedule;
