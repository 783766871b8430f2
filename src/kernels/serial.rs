//! Single-threaded kernels.

use super::LoopOrder;
use super::unroll::{UnrollFactor, contains_all_scan, scan_matches};

/// Runs the nested loop on the calling thread.
///
/// Lengths are checked by the caller.
pub(crate) fn filter_serial(
    order: LoopOrder,
    input: &[u32],
    filter: &[u32],
    output: &mut [u32],
    unroll: UnrollFactor,
) {
    match order {
        LoopOrder::FilterFirst => {
            for &needle in filter {
                scan_matches(unroll, needle, input, 0, |x, value| output[x] = value);
            }
        }
        LoopOrder::DataFirst => {
            for (slot, &value) in output.iter_mut().zip(input) {
                if contains_all_scan(unroll, value, filter) {
                    *slot = value;
                }
            }
        }
    }
}
