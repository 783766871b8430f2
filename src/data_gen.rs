//! Deterministic buffers for the filter benchmark.
//!
//! Values are derived from the element index alone so that every run, and every
//! reimplementation, sees the same data.

use crate::errors::{FilterError, FilterResult};

/// Input values cycle through `0..INPUT_VALUE_RANGE`.
pub const INPUT_VALUE_RANGE: u32 = 2048;

fn allocate(len: usize) -> FilterResult<Vec<u32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| FilterError::AllocationFailed { len, source })?;
    Ok(buffer)
}

/// Generates the data array: element `i` is `i mod 2048`.
pub fn generate_input(len: usize) -> FilterResult<Vec<u32>> {
    let mut input = allocate(len)?;
    input.extend((0..len).map(|i| (i % INPUT_VALUE_RANGE as usize) as u32));
    Ok(input)
}

/// Generates the filter array: element `j` is `j`.
pub fn generate_filter(len: usize) -> FilterResult<Vec<u32>> {
    let mut filter = allocate(len)?;
    filter.extend((0..len).map(|j| j as u32));
    Ok(filter)
}

/// Allocates an all-zero output buffer.
pub fn zeroed_buffer(len: usize) -> FilterResult<Vec<u32>> {
    let mut buffer = allocate(len)?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Clears every slot so no earlier match survives into the next run.
pub fn reset(output: &mut [u32]) {
    output.fill(0);
}
