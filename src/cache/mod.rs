// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bounded memoization cache for sequence lengths.
//!
//! The cache is a fixed-size slab of slots indexed directly by starting
//! value: slot `n` holds the sequence length previously computed for `n`, or
//! the sentinel 0 meaning "not yet computed". A length of 0 cannot occur
//! (every sequence contains at least its starting value), so the sentinel is
//! unambiguous. Slots are populated lazily and never evicted.
//!
//! Starting values at or above the configured bound bypass the cache entirely
//! and are recomputed on every visit. This is intentional: it keeps lookup at
//! O(1) array indexing and bounds the cache's memory to the expected working
//! set.
//!
//! # Concurrency
//!
//! All workers share one cache with no locks. Each slot is an [`AtomicU32`]
//! accessed with relaxed ordering. Two workers may race to fill the same
//! slot, but both compute the same length for the same starting value, so
//! the race is benign: a store either installs the value or overwrites it
//! with an identical one, and a load can never observe a torn slot. The
//! trade-off against sharded per-worker caches is full cross-worker hit
//! sharing at the cost of atomic (rather than plain) slot traffic.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

/// Default number of directly indexed slots.
pub const DEFAULT_CACHE_LIMIT: usize = 10_000_000;

/// Slot value meaning "not yet computed".
const UNSET: u32 = 0;

/// Capability interface for sequence-length memoization.
///
/// The engine and scheduler see only `get`/`put`, so the storage strategy
/// behind them (atomic slab, sharding, a locked table) can change without
/// touching either.
pub trait LengthCache: Sync {
    /// Cached sequence length for starting value `n`, if known.
    fn get(&self, n: u64) -> Option<u32>;

    /// Record the sequence length for starting value `n`.
    ///
    /// Values at or above the cache bound are silently ignored.
    fn put(&self, n: u64, len: u32);
}

/// Fixed-size, direct-indexed cache with atomic slots.
///
/// Owned by the caller for the duration of a run: constructed once before
/// the parallel phase, shared by reference across workers, read-only after
/// the last worker joins.
pub struct SequenceCache {
    slots: Vec<AtomicU32>,
}

impl SequenceCache {
    /// Create a cache with the default bound.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_CACHE_LIMIT)
    }

    /// Create a cache with `limit` directly indexed slots.
    ///
    /// A limit of 0 is allowed and yields a cache that never hits; every
    /// lookup misses and every store is ignored.
    pub fn with_limit(limit: usize) -> Self {
        debug!(slots = limit, "allocating sequence cache");
        let mut slots = Vec::new();
        slots.resize_with(limit, || AtomicU32::new(UNSET));
        Self { slots }
    }

    /// Number of directly indexed slots.
    pub fn limit(&self) -> usize {
        self.slots.len()
    }
}

impl Default for SequenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LengthCache for SequenceCache {
    fn get(&self, n: u64) -> Option<u32> {
        let slot = self.slots.get(usize::try_from(n).ok()?)?;
        match slot.load(Ordering::Relaxed) {
            UNSET => None,
            len => Some(len),
        }
    }

    fn put(&self, n: u64, len: u32) {
        if let Ok(index) = usize::try_from(n) {
            if let Some(slot) = self.slots.get(index) {
                slot.store(len, Ordering::Relaxed);
            }
        }
    }
}
