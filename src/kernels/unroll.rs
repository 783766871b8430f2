//! Unrolled inner-loop blocks shared by every kernel.
//!
//! The unroll factor always applies to the inner loop: the data dimension for
//! filter-first kernels, the filter dimension for data-first kernels. Each
//! block handles `U` adjacent iterations per step and then finishes the
//! `len % U` leftover elements in a scalar remainder loop.

use crate::errors::{FilterError, FilterResult};

/// Number of adjacent inner-loop iterations processed per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnrollFactor(usize);

impl UnrollFactor {
    /// No unrolling: one iteration per step.
    pub const NONE: UnrollFactor = UnrollFactor(1);

    pub fn new(factor: usize) -> FilterResult<Self> {
        if factor == 0 {
            return Err(FilterError::InvalidUnrollFactor { factor });
        }
        Ok(Self(factor))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for UnrollFactor {
    fn default() -> Self {
        Self::NONE
    }
}

/// Calls `emit(base + k, value)` for every `data[k] == needle`.
#[inline(always)]
pub(crate) fn scan_matches<E>(unroll: UnrollFactor, needle: u32, data: &[u32], base: usize, emit: E)
where
    E: FnMut(usize, u32),
{
    match unroll.get() {
        1 => scan_block::<1, E>(needle, data, base, emit),
        2 => scan_block::<2, E>(needle, data, base, emit),
        4 => scan_block::<4, E>(needle, data, base, emit),
        8 => scan_block::<8, E>(needle, data, base, emit),
        16 => scan_block::<16, E>(needle, data, base, emit),
        32 => scan_block::<32, E>(needle, data, base, emit),
        width => scan_block_dyn(width, needle, data, base, emit),
    }
}

/// Returns whether `value` occurs in `filter`.
///
/// The whole filter is always scanned; there is no early exit, so the cost of
/// a lookup does not depend on where (or whether) the value matches.
#[inline(always)]
pub(crate) fn contains_all_scan(unroll: UnrollFactor, value: u32, filter: &[u32]) -> bool {
    match unroll.get() {
        1 => contains_block::<1>(value, filter),
        2 => contains_block::<2>(value, filter),
        4 => contains_block::<4>(value, filter),
        8 => contains_block::<8>(value, filter),
        16 => contains_block::<16>(value, filter),
        32 => contains_block::<32>(value, filter),
        width => contains_block_dyn(width, value, filter),
    }
}

#[inline(always)]
fn scan_block<const U: usize, E>(needle: u32, data: &[u32], base: usize, mut emit: E)
where
    E: FnMut(usize, u32),
{
    let mut blocks = data.chunks_exact(U);
    let mut offset = base;
    for block in &mut blocks {
        for k in 0..U {
            if block[k] == needle {
                emit(offset + k, block[k]);
            }
        }
        offset += U;
    }
    for (k, &value) in blocks.remainder().iter().enumerate() {
        if value == needle {
            emit(offset + k, value);
        }
    }
}

fn scan_block_dyn<E>(width: usize, needle: u32, data: &[u32], base: usize, mut emit: E)
where
    E: FnMut(usize, u32),
{
    let mut blocks = data.chunks_exact(width);
    let mut offset = base;
    for block in &mut blocks {
        for (k, &value) in block.iter().enumerate() {
            if value == needle {
                emit(offset + k, value);
            }
        }
        offset += width;
    }
    for (k, &value) in blocks.remainder().iter().enumerate() {
        if value == needle {
            emit(offset + k, value);
        }
    }
}

#[inline(always)]
fn contains_block<const U: usize>(value: u32, filter: &[u32]) -> bool {
    let mut blocks = filter.chunks_exact(U);
    let mut found = false;
    for block in &mut blocks {
        for k in 0..U {
            found |= block[k] == value;
        }
    }
    for &candidate in blocks.remainder() {
        found |= candidate == value;
    }
    found
}

fn contains_block_dyn(width: usize, value: u32, filter: &[u32]) -> bool {
    let mut blocks = filter.chunks_exact(width);
    let mut found = false;
    for block in &mut blocks {
        for &candidate in block {
            found |= candidate == value;
        }
    }
    for &candidate in blocks.remainder() {
        found |= candidate == value;
    }
    found
}
