// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel search for the longest Collatz sequence in an integer range.
//!
//! Given an inclusive range `[start, end]`, the crate computes the Collatz
//! sequence length of every starting value in the range and reports the value
//! attaining the maximum length, together with that length and the wall-clock
//! time of the parallel phase.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Shared tier: the sequence cache
//!
//! A bounded, direct-indexed memoization cache ([`SequenceCache`]) holds the
//! sequence length for every starting value below a configured bound that has
//! already been computed. It is constructed once before the parallel phase,
//! shared by reference across all workers, and read-only afterwards. Slots
//! are atomic, so concurrent workers share cache hits without locks; see the
//! [`cache`] module for the benign-race argument.
//!
//! ## Per-worker tier: engines and partial results
//!
//! Each worker owns a [`SequenceEngine`] and scans one contiguous chunk of
//! the range, tracking its local maximum and private run counters. The
//! [`RangeScheduler`] partitions the range, spawns one OS thread per chunk,
//! joins them all, and reduces the per-worker maxima in chunk order so that
//! ties always resolve to the smallest starting value.
//!
//! # Numeric model
//!
//! All sequence arithmetic is wrapping unsigned 64-bit: `3n + 1` can wrap for
//! starting values near `u64::MAX`, and results are numerically meaningless
//! once a sequence wraps. This matches the tool this crate reimplements and
//! is a documented limitation, not a defect; see [`engine::step`].

pub mod cache;
pub mod cli;
pub mod engine;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use cache::{LengthCache, SequenceCache, DEFAULT_CACHE_LIMIT};
pub use engine::{step, SequenceEngine};
pub use scheduler::{FinalResult, PartialResult, RangeJob, RangeScheduler, SearchError};
pub use state::{Counters, Statistics};
