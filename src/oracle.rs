//! Baseline comparison for kernel outputs.

use std::fmt;

/// Result of comparing a candidate output against the serial baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Match,
    /// First index at which the candidate differs from the baseline.
    Mismatch {
        index: usize,
        expected: u32,
        actual: u32,
    },
    LengthMismatch {
        baseline: usize,
        candidate: usize,
    },
}

impl CheckOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, CheckOutcome::Match)
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Match => write!(f, "match"),
            CheckOutcome::Mismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "data check failed at offset {}: expected {}, got {}",
                index, expected, actual
            ),
            CheckOutcome::LengthMismatch {
                baseline,
                candidate,
            } => write!(
                f,
                "data check failed: baseline has {} elements, candidate has {}",
                baseline, candidate
            ),
        }
    }
}

/// Scans both buffers and reports the first differing element.
///
/// Never panics on a mismatch; the caller decides what to do with it.
pub fn check(baseline: &[u32], candidate: &[u32]) -> CheckOutcome {
    if baseline.len() != candidate.len() {
        return CheckOutcome::LengthMismatch {
            baseline: baseline.len(),
            candidate: candidate.len(),
        };
    }

    baseline
        .iter()
        .zip(candidate)
        .position(|(b, c)| b != c)
        .map_or(CheckOutcome::Match, |index| CheckOutcome::Mismatch {
            index,
            expected: baseline[index],
            actual: candidate[index],
        })
}
