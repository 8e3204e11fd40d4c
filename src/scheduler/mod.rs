// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel execution over a partitioned range.
//!
//! The scheduler splits `[start, end]` into one chunk per worker, spawns one
//! OS thread per chunk, and joins them all before reducing the per-worker
//! maxima into the final answer. There is no cooperative scheduling and no
//! cancellation: a run proceeds to completion or crashes.
//!
//! # Determinism
//!
//! Workers race on nothing but the memoization cache, whose races are benign
//! (see the [`cache`](crate::cache) module). Each worker scans its chunk in
//! increasing order and keeps the *first* value attaining its local maximum
//! (strictly-greater updates); the reduction scans partial results in chunk
//! order with the same strictly-greater rule. Chunks are contiguous and
//! ordered, so the reported value is the smallest starting value attaining
//! the global maximum, independent of thread scheduling and of the worker
//! count.

pub mod partition;

pub use partition::{partition, RangeJob};

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::cache::LengthCache;
use crate::engine::SequenceEngine;
use crate::state::Statistics;

/// Errors detected before any computation starts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// `start` exceeds `end`, leaving nothing to scan.
    #[error("empty range: start {start} exceeds end {end}")]
    EmptyRange { start: u64, end: u64 },

    /// A worker count of zero cannot make progress.
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// One worker's local maximum and private run counters.
///
/// Produced exactly once per worker, into the worker's own slot; consumed
/// exactly once by the reduction step.
#[derive(Debug, Clone, Copy)]
pub struct PartialResult {
    /// First value in the worker's chunk attaining `best_len`.
    pub best_n: u64,
    /// Longest sequence length seen in the worker's chunk.
    pub best_len: u32,
    /// The worker's engine counters.
    pub stats: Statistics,
}

/// The globally maximal sequence in the searched range.
#[derive(Debug, Clone, Copy)]
pub struct FinalResult {
    /// Smallest starting value attaining the maximum length.
    pub best_n: u64,
    /// The maximum sequence length across the range.
    pub best_len: u32,
    /// Wall-clock time of the parallel phase (spawn through join).
    pub elapsed: Duration,
    /// Counters merged across all workers.
    pub stats: Statistics,
}

/// Runs the search: partition, spawn, scan, join, reduce.
pub struct RangeScheduler<'a, C: LengthCache> {
    cache: &'a C,
}

impl<'a, C: LengthCache> RangeScheduler<'a, C> {
    /// Create a scheduler whose workers share the given cache.
    pub fn new(cache: &'a C) -> Self {
        Self { cache }
    }

    /// Search `[start, end]` with up to `worker_count` parallel workers.
    ///
    /// Requires `start <= end` and `worker_count >= 1`; violations are
    /// reported as [`SearchError`]s before any thread is spawned. The worker
    /// count is clamped to the range size, so small ranges simply use fewer
    /// workers.
    pub fn run(
        &self,
        start: u64,
        end: u64,
        worker_count: usize,
    ) -> Result<FinalResult, SearchError> {
        if start > end {
            return Err(SearchError::EmptyRange { start, end });
        }
        if worker_count == 0 {
            return Err(SearchError::NoWorkers);
        }

        let jobs = partition(start, end, worker_count);
        debug!(start, end, workers = jobs.len(), "partitioned range");

        let started = Instant::now();
        let partials: Vec<PartialResult> = thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|&job| scope.spawn(move || scan_chunk(self.cache, job)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(partial) => partial,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });
        let elapsed = started.elapsed();

        let mut stats = Statistics::new();
        let mut best_n = 0u64;
        let mut best_len = 0u32;
        for partial in &partials {
            stats.merge(&partial.stats);
            if partial.best_len > best_len {
                best_len = partial.best_len;
                best_n = partial.best_n;
            }
        }

        info!(best_n, best_len, ?elapsed, "range scan complete");
        Ok(FinalResult {
            best_n,
            best_len,
            elapsed,
            stats,
        })
    }
}

/// Scan one chunk in increasing order, tracking the first value attaining
/// the local maximum length.
fn scan_chunk<C: LengthCache>(cache: &C, job: RangeJob) -> PartialResult {
    let mut engine = SequenceEngine::new(cache);
    let mut best_n = 0u64;
    let mut best_len = 0u32;

    let mut n = job.sub_start;
    loop {
        let len = engine.length_of(n);
        if len > best_len {
            best_len = len;
            best_n = n;
        }
        // sub_end may be u64::MAX; compare before incrementing.
        if n == job.sub_end {
            break;
        }
        n += 1;
    }

    PartialResult {
        best_n,
        best_len,
        stats: *engine.statistics(),
    }
}
