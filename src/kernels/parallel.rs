use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use super::LoopOrder;
use super::unroll::{UnrollFactor, contains_all_scan, scan_matches};
use crate::errors::FilterResult;
use crate::schedule::{Schedule, run_workers};

#[derive(Clone, Copy)]
struct SendPtr {
    ptr: *mut u32,
}

impl SendPtr {
    fn new(ptr: *mut u32) -> Self {
        Self { ptr }
    }

    /// # Safety
    /// `offset..offset + len` must be in bounds and not aliased by any other
    /// live slice.
    unsafe fn as_slice_mut<'a>(self, offset: usize, len: usize) -> &'a mut [u32] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(offset), len) }
    }
}

unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}

/// Per-invocation settings for the filter kernels.
///
/// The thread count travels with each call; nothing is set process-wide.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    threads: Option<usize>,
    schedule: Schedule,
    unroll: UnrollFactor,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self {
            threads: None,
            schedule: Schedule::Static,
            unroll: UnrollFactor::NONE,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_unroll(mut self, unroll: UnrollFactor) -> Self {
        self.unroll = unroll;
        self
    }

    pub fn get_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn unroll(&self) -> UnrollFactor {
        self.unroll
    }
}

/// Views the output buffer as atomic cells for filter-first writers.
fn as_atomic_cells(output: &mut [u32]) -> &[AtomicU32] {
    // SAFETY: AtomicU32 has the same size, alignment and bit validity as u32,
    // and the exclusive borrow guarantees no non-atomic access for the
    // lifetime of the returned slice.
    unsafe { &*(output as *mut [u32] as *const [AtomicU32]) }
}

/// Stores a match found by a filter-first worker.
///
/// Several workers can reach the same slot when different filter entries
/// match the same data index. Every writer stores `input[index]`, so the
/// outcome does not depend on which store lands last. Any kernel that stores
/// an index- or worker-dependent value here would make the result racy.
#[inline(always)]
fn publish_match(cells: &[AtomicU32], index: usize, value: u32) {
    debug_assert!(
        {
            let current = cells[index].load(Ordering::Relaxed);
            current == 0 || current == value
        },
        "conflicting value written to output slot {}",
        index
    );
    cells[index].store(value, Ordering::Relaxed);
}

/// Runs the nested loop with the outer dimension split across worker threads.
///
/// Lengths are checked by the caller; the thread count and schedule are
/// checked by the scheduler.
pub(crate) fn filter_parallel(
    order: LoopOrder,
    input: &[u32],
    filter: &[u32],
    output: &mut [u32],
    config: &FilterConfig,
) -> FilterResult<()> {
    let threads = config.get_threads();
    let unroll = config.unroll();

    match order {
        LoopOrder::FilterFirst => {
            let cells = as_atomic_cells(output);
            run_workers(threads, filter.len(), config.schedule(), |range| {
                for &needle in &filter[range] {
                    scan_matches(unroll, needle, input, 0, |x, value| {
                        publish_match(cells, x, value)
                    });
                }
            })
        }
        LoopOrder::DataFirst => {
            let output_ptr = SendPtr::new(output.as_mut_ptr());
            run_workers(threads, input.len(), config.schedule(), |range| {
                // SAFETY: the dispenser hands out disjoint in-bounds ranges, so
                // each slice is owned by exactly one worker.
                let slots = unsafe { output_ptr.as_slice_mut(range.start, range.len()) };
                for (slot, &value) in slots.iter_mut().zip(&input[range]) {
                    if contains_all_scan(unroll, value, filter) {
                        *slot = value;
                    }
                }
            })
        }
    }
}
