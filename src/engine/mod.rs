// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sequence-length computation with tail-length reuse.
//!
//! The engine walks a Collatz sequence from a starting value, consulting the
//! shared cache at every position: once the walk reaches a value whose
//! length is already known, the remaining length is known too, because any
//! two sequences that meet share the same tail. On completion the total
//! length is stored back, but only under the *original* starting value.
//! Intermediate values are not individually cached; they get their own slot
//! only if they are later scanned as starting values themselves. This keeps
//! cache traffic at one write per call instead of one per step.
//!
//! Each worker owns its own engine; the engine's counters are therefore
//! private and merged only after the parallel phase.

use crate::cache::LengthCache;
use crate::state::{Counters, Statistics};

/// One Collatz step: halve if even, else triple-and-add-one.
///
/// Arithmetic is wrapping: the odd branch can wrap for values near
/// `u64::MAX`, after which the walk is numerically meaningless. The original
/// tool behaves the same way; callers wanting exact results must stay below
/// the overflow threshold.
#[inline]
pub fn step(n: u64) -> u64 {
    if n & 1 == 1 {
        n.wrapping_mul(3).wrapping_add(1)
    } else {
        n >> 1
    }
}

/// Computes Collatz sequence lengths against a shared memoization cache.
pub struct SequenceEngine<'a, C: LengthCache> {
    cache: &'a C,

    /// Counters private to this engine (one engine per worker).
    stats: Statistics,
}

impl<'a, C: LengthCache> SequenceEngine<'a, C> {
    /// Create an engine reading and writing the given cache.
    pub fn new(cache: &'a C) -> Self {
        Self {
            cache,
            stats: Statistics::new(),
        }
    }

    /// Length of the Collatz sequence starting at `n`, counting both `n`
    /// itself and the terminal 1.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`. The step function is undefined at 0 (the even
    /// branch yields 0 again), so a zero input would loop forever; it is a
    /// precondition violation, not a computable case.
    pub fn length_of(&mut self, n: u64) -> u32 {
        assert_ne!(n, 0, "Collatz sequences are defined for n >= 1");
        self.stats.increment(Counters::ValuesScanned);

        let original = n;
        let mut n = n;
        let mut len: u32 = 1;

        while n != 1 {
            if let Some(cached) = self.cache.get(n) {
                // Tail-length reuse: `cached` counts n itself, which the
                // running length already includes.
                len += cached - 1;
                self.stats.increment(Counters::CacheHits);
                break;
            }
            n = step(n);
            len += 1;
            self.stats.increment(Counters::StepsComputed);
        }

        // Only the original input's slot is filled; see the module docs.
        self.cache.put(original, len);
        len
    }

    /// Counters accumulated by this engine so far.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SequenceCache;

    #[test]
    fn test_length_of_one_is_one() {
        let cache = SequenceCache::with_limit(16);
        let mut engine = SequenceEngine::new(&cache);
        assert_eq!(engine.length_of(1), 1);
    }

    #[test]
    fn test_known_lengths() {
        let cache = SequenceCache::with_limit(128);
        let mut engine = SequenceEngine::new(&cache);
        // 3 -> 10 -> 5 -> 16 -> 8 -> 4 -> 2 -> 1
        assert_eq!(engine.length_of(3), 8);
        assert_eq!(engine.length_of(2), 2);
        assert_eq!(engine.length_of(6), 9);
        assert_eq!(engine.length_of(7), 17);
        assert_eq!(engine.length_of(27), 112);
    }

    #[test]
    fn test_recurrence_holds_with_and_without_cache() {
        // length_of(n) == 1 + length_of(step(n)) for n != 1, whether the
        // walk is served from the cache or computed from scratch.
        let cached = SequenceCache::with_limit(1024);
        let uncached = SequenceCache::with_limit(0);
        let mut warm = SequenceEngine::new(&cached);
        let mut cold = SequenceEngine::new(&uncached);
        for n in 2..=300u64 {
            assert_eq!(warm.length_of(n), 1 + warm.length_of(step(n)), "n = {n}");
            assert_eq!(cold.length_of(n), 1 + cold.length_of(step(n)), "n = {n}");
        }
    }

    #[test]
    fn test_cold_and_warm_results_agree() {
        let cache = SequenceCache::with_limit(1024);
        let mut engine = SequenceEngine::new(&cache);
        let cold: Vec<u32> = (1..=1000).map(|n| engine.length_of(n)).collect();
        let warm: Vec<u32> = (1..=1000).map(|n| engine.length_of(n)).collect();
        assert_eq!(cold, warm);
    }

    #[test]
    fn test_cache_population_is_idempotent() {
        use crate::cache::LengthCache;

        let cache = SequenceCache::with_limit(64);
        let mut engine = SequenceEngine::new(&cache);
        let first = engine.length_of(27);
        // 27's walk passes through many cacheable values; only 27 itself
        // may be stored.
        assert_eq!(cache.get(27), Some(first));
        assert_eq!(cache.get(41), None);

        for _ in 0..3 {
            assert_eq!(engine.length_of(27), first);
            assert_eq!(cache.get(27), Some(first));
        }
    }

    #[test]
    fn test_values_above_bound_recompute_correctly() {
        let small = SequenceCache::with_limit(4);
        let big = SequenceCache::with_limit(1024);
        let mut bypassing = SequenceEngine::new(&small);
        let mut cached = SequenceEngine::new(&big);
        for n in 1..=500u64 {
            assert_eq!(bypassing.length_of(n), cached.length_of(n), "n = {n}");
        }
    }

    #[test]
    fn test_step_parity_branches() {
        assert_eq!(step(6), 3);
        assert_eq!(step(3), 10);
        assert_eq!(step(1), 4);
    }

    #[test]
    fn test_step_wraps_instead_of_panicking() {
        // (2^64 - 1) * 3 + 1 wraps to 2^64 - 2.
        assert_eq!(step(u64::MAX), u64::MAX - 1);
    }

    #[test]
    #[should_panic(expected = "n >= 1")]
    fn test_zero_is_rejected() {
        let cache = SequenceCache::with_limit(16);
        let mut engine = SequenceEngine::new(&cache);
        engine.length_of(0);
    }

    #[test]
    fn test_counters_track_hits_and_steps() {
        let cache = SequenceCache::with_limit(64);
        let mut engine = SequenceEngine::new(&cache);
        engine.length_of(8); // 8 -> 4 -> 2 -> 1, all computed
        assert_eq!(engine.statistics().get(Counters::ValuesScanned), 1);
        assert_eq!(engine.statistics().get(Counters::CacheHits), 0);
        assert_eq!(engine.statistics().get(Counters::StepsComputed), 3);

        engine.length_of(16); // 16 -> 8, then cached tail
        assert_eq!(engine.statistics().get(Counters::ValuesScanned), 2);
        assert_eq!(engine.statistics().get(Counters::CacheHits), 1);
        assert_eq!(engine.statistics().get(Counters::StepsComputed), 4);
    }
}
