//! Wall-clock timestamps and normalized interval arithmetic.
//!
//! Timestamps carry whole seconds plus a microsecond fraction, the same shape
//! the CSV datasets record. Interval computation carries and borrows across the
//! sub-second boundary so the microsecond component always lands in
//! `[0, 1_000_000)`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{TimerError, TimerResult};

pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// A point in wall-clock time with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
    micros: i64,
}

impl Timestamp {
    /// Builds a timestamp, folding any out-of-range microsecond component into
    /// the seconds field.
    pub fn new(seconds: i64, micros: i64) -> Self {
        Self {
            seconds: seconds + micros.div_euclid(MICROS_PER_SECOND),
            micros: micros.rem_euclid(MICROS_PER_SECOND),
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn micros(&self) -> i64 {
        self.micros
    }

    fn total_micros(&self) -> i128 {
        self.seconds as i128 * MICROS_PER_SECOND as i128 + self.micros as i128
    }
}

/// A non-negative duration split into seconds and microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Elapsed {
    pub seconds: u64,
    pub micros: u32,
}

impl Elapsed {
    fn from_total_micros(total: u128) -> Self {
        let per_second = MICROS_PER_SECOND as u128;
        Self {
            seconds: (total / per_second) as u64,
            micros: (total % per_second) as u32,
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.micros as f64 / MICROS_PER_SECOND as f64
    }
}

/// Captures the current wall-clock time.
///
/// The clock is not monotonic. An interval only comes out reversed when the
/// system clock is stepped backwards during a measurement.
///
/// A system clock set before the Unix epoch yields a negative timestamp
/// rather than an error; `elapsed` still handles it.
pub fn now() -> Timestamp {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since) => Timestamp::new(since.as_secs() as i64, since.subsec_micros() as i64),
        Err(before) => {
            let behind = before.duration();
            Timestamp::new(
                -(behind.as_secs() as i64),
                -(behind.subsec_micros() as i64),
            )
        }
    }
}

/// Returns the interval from `start` to `end`.
///
/// When `end` precedes `start` (for instance after a wall-clock adjustment)
/// the magnitude of the reversed interval is reported through
/// [`TimerError::EndBeforeStart`] instead of a negative duration.
pub fn elapsed(start: Timestamp, end: Timestamp) -> TimerResult<Elapsed> {
    let difference = end.total_micros() - start.total_micros();
    let magnitude = Elapsed::from_total_micros(difference.unsigned_abs());
    if difference < 0 {
        return Err(TimerError::EndBeforeStart {
            seconds: magnitude.seconds,
            micros: magnitude.micros,
        });
    }
    Ok(magnitude)
}

/// Runs `f` and returns its result together with the measured interval.
pub fn measure<T, F>(f: F) -> (T, TimerResult<Elapsed>)
where
    F: FnOnce() -> T,
{
    let start = now();
    let value = f();
    let end = now();
    (value, elapsed(start, end))
}
