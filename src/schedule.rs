//! Work distribution for the parallel kernels.
//!
//! A parallel kernel splits one loop dimension into iteration ranges and hands
//! them to a fixed set of scoped worker threads. The [`Schedule`] decides how
//! the ranges are cut and who gets which one; it never changes which indices
//! are visited, only the order and the owner.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::errors::{FilterError, FilterResult};

/// Policy used to distribute loop iterations across worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Schedule {
    /// One contiguous block per worker, sizes differing by at most one.
    #[default]
    Static,
    /// Fixed-size chunks dealt round-robin: worker `w` takes chunks `w`,
    /// `w + threads`, `w + 2 * threads`, ...
    StaticChunk(usize),
    /// Fixed-size chunks claimed from a shared counter on demand.
    Dynamic(usize),
    /// Shrinking chunks claimed from a shared counter: each claim takes the
    /// remaining work divided by the worker count, never less than the minimum.
    Guided(usize),
}

impl Schedule {
    /// Returns the chunk size, or the minimum chunk size for guided scheduling.
    pub fn chunk(&self) -> Option<usize> {
        match *self {
            Schedule::Static => None,
            Schedule::StaticChunk(c) | Schedule::Dynamic(c) | Schedule::Guided(c) => Some(c),
        }
    }

    pub fn validate(&self) -> FilterResult<()> {
        match self.chunk() {
            Some(0) => Err(FilterError::InvalidChunkSize { chunk: 0 }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Schedule::Static => write!(f, "static"),
            Schedule::StaticChunk(c) => write!(f, "static-{}", c),
            Schedule::Dynamic(1) => write!(f, "dynamic"),
            Schedule::Dynamic(c) => write!(f, "dynamic-{}", c),
            Schedule::Guided(1) => write!(f, "guided"),
            Schedule::Guided(c) => write!(f, "guided-{}", c),
        }
    }
}

impl FromStr for Schedule {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || FilterError::UnknownSchedule {
            name: s.to_string(),
        };
        let normalized = s.trim().to_ascii_lowercase();
        let (kind, chunk) = match normalized.split_once('-') {
            Some((kind, chunk)) => (kind, Some(chunk.parse::<usize>().map_err(|_| unknown())?)),
            None => (normalized.as_str(), None),
        };

        let schedule = match (kind, chunk) {
            ("static", None) => Schedule::Static,
            ("static", Some(c)) => Schedule::StaticChunk(c),
            ("dynamic", c) => Schedule::Dynamic(c.unwrap_or(1)),
            ("guided", c) => Schedule::Guided(c.unwrap_or(1)),
            _ => return Err(unknown()),
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

impl TryFrom<String> for Schedule {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Schedule> for String {
    fn from(schedule: Schedule) -> Self {
        schedule.to_string()
    }
}

/// Hands out iteration ranges of `0..len` to `threads` workers.
pub(crate) struct ChunkDispenser {
    schedule: Schedule,
    len: usize,
    threads: usize,
    cursor: AtomicUsize,
}

impl ChunkDispenser {
    pub(crate) fn new(schedule: Schedule, len: usize, threads: usize) -> Self {
        Self {
            schedule,
            len,
            threads,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Iterator over the ranges claimed by one worker.
    pub(crate) fn chunks_for(&self, worker: usize) -> WorkerChunks<'_> {
        WorkerChunks {
            dispenser: self,
            worker,
            round: 0,
        }
    }

    fn static_block(&self, worker: usize) -> Range<usize> {
        let base = self.len / self.threads;
        let extra = self.len % self.threads;
        let start = worker * base + worker.min(extra);
        let size = base + usize::from(worker < extra);
        start..start + size
    }

    /// The cursor never moves past `len`, so oversized chunks cannot wrap it
    /// back onto ranges already handed out.
    fn claim_dynamic(&self, chunk: usize) -> Option<Range<usize>> {
        let mut start = self.cursor.load(Ordering::Relaxed);
        loop {
            if start >= self.len {
                return None;
            }
            let end = start.saturating_add(chunk).min(self.len);
            match self.cursor.compare_exchange_weak(
                start,
                end,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Some(start..end),
                Err(current) => start = current,
            }
        }
    }

    fn claim_guided(&self, min_chunk: usize) -> Option<Range<usize>> {
        let mut start = self.cursor.load(Ordering::Relaxed);
        loop {
            if start >= self.len {
                return None;
            }
            let remaining = self.len - start;
            let chunk = remaining
                .div_ceil(self.threads)
                .max(min_chunk)
                .min(remaining);
            match self.cursor.compare_exchange_weak(
                start,
                start + chunk,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Some(start..start + chunk),
                Err(current) => start = current,
            }
        }
    }
}

pub(crate) struct WorkerChunks<'a> {
    dispenser: &'a ChunkDispenser,
    worker: usize,
    round: usize,
}

impl Iterator for WorkerChunks<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let d = self.dispenser;
        let range = match d.schedule {
            Schedule::Static => {
                if self.round > 0 {
                    return None;
                }
                d.static_block(self.worker)
            }
            Schedule::StaticChunk(chunk) => {
                let start = (self.worker + self.round * d.threads).checked_mul(chunk)?;
                if start >= d.len {
                    return None;
                }
                start..start.saturating_add(chunk).min(d.len)
            }
            Schedule::Dynamic(chunk) => d.claim_dynamic(chunk)?,
            Schedule::Guided(min_chunk) => d.claim_guided(min_chunk)?,
        };
        self.round += 1;
        if range.is_empty() { None } else { Some(range) }
    }
}

/// Runs `body` over `0..len` on `threads` scoped workers using `schedule`.
///
/// Returns once every worker has finished. A panicking worker is reported as
/// [`FilterError::ThreadPanicked`] after all workers have been joined.
pub(crate) fn run_workers<F>(
    threads: usize,
    len: usize,
    schedule: Schedule,
    body: F,
) -> FilterResult<()>
where
    F: Fn(Range<usize>) + Sync,
{
    if threads == 0 {
        return Err(FilterError::InvalidThreadCount { count: 0 });
    }
    schedule.validate()?;

    let dispenser = ChunkDispenser::new(schedule, len, threads);

    thread::scope(|scope| {
        let dispenser_ref = &dispenser;
        let body_ref = &body;

        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                scope.spawn(move || {
                    for range in dispenser_ref.chunks_for(worker) {
                        body_ref(range);
                    }
                })
            })
            .collect();

        let mut panicked = false;
        for handle in handles {
            panicked |= handle.join().is_err();
        }
        if panicked {
            Err(FilterError::ThreadPanicked)
        } else {
            Ok(())
        }
    })
}
