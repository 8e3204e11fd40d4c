// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line surface: the argument model and the extent parser.
//!
//! Range endpoints accept either a plain unsigned integer or the
//! exponentiation shorthand `base**exp`, so large ranges can be written as
//! `collatz 1 2**30`. The shorthand is evaluated by repeated wrapping
//! multiplication, matching the engine's numeric model: overflow wraps
//! silently rather than erroring.

use std::num::NonZeroUsize;
use std::thread;

use clap::Parser;
use thiserror::Error;

use crate::cache::DEFAULT_CACHE_LIMIT;

/// Worker count used when the platform cannot report a parallelism hint.
const FALLBACK_WORKERS: usize = 4;

/// Search an integer range for the longest Collatz sequence.
#[derive(Debug, Parser)]
#[command(name = "collatz", version, about)]
pub struct Args {
    /// First value of the range, as an integer or `base**exp`.
    #[arg(value_parser = parse_extent)]
    pub start: u64,

    /// Last value of the range (inclusive), same forms as START.
    #[arg(value_parser = parse_extent)]
    pub end: u64,

    /// Worker threads; defaults to the available parallelism.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Number of directly indexed memoization slots.
    #[arg(long, default_value_t = DEFAULT_CACHE_LIMIT)]
    pub cache_limit: usize,
}

impl Args {
    /// The `--threads` override, else the platform hint, else a small
    /// positive constant when the platform cannot report one.
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(FALLBACK_WORKERS)
        })
    }
}

/// Failure to interpret a range endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{token}` is not an unsigned integer or base**exp expression")]
pub struct ParseExtentError {
    token: String,
}

/// Parse a range endpoint: a plain `u64`, or `base**exp` evaluated by
/// repeated multiplication.
pub fn parse_extent(s: &str) -> Result<u64, ParseExtentError> {
    let fail = || ParseExtentError {
        token: s.to_string(),
    };
    match s.split_once("**") {
        Some((base, exp)) => {
            let base: u64 = base.parse().map_err(|_| fail())?;
            let exp: u64 = exp.parse().map_err(|_| fail())?;
            let mut value: u64 = 1;
            for _ in 0..exp {
                value = value.wrapping_mul(base);
            }
            Ok(value)
        }
        None => s.parse().map_err(|_| fail()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer_passes_through() {
        assert_eq!(parse_extent("1000000"), Ok(1000000));
        assert_eq!(parse_extent("0"), Ok(0));
    }

    #[test]
    fn test_exponentiation_shorthand() {
        assert_eq!(parse_extent("2**10"), Ok(1024));
        assert_eq!(parse_extent("10**6"), Ok(1_000_000));
        assert_eq!(parse_extent("7**0"), Ok(1));
    }

    #[test]
    fn test_overflow_wraps_silently() {
        // 2^64 wraps to 0, one more doubling stays 0.
        assert_eq!(parse_extent("2**64"), Ok(0));
        assert_eq!(parse_extent("2**65"), Ok(0));
    }

    #[test]
    fn test_bad_tokens_name_the_input() {
        for token in ["", "x", "-3", "2**x", "x**2", "1.5", "2**3**4"] {
            let err = parse_extent(token).unwrap_err();
            assert!(err.to_string().contains(token), "{token}");
        }
    }

    #[test]
    fn test_args_require_both_positionals() {
        use clap::error::ErrorKind;

        let err = Args::try_parse_from(["collatz", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_args_parse_extents_and_flags() {
        let args =
            Args::try_parse_from(["collatz", "2**10", "1000000", "--threads", "8"]).unwrap();
        assert_eq!(args.start, 1024);
        assert_eq!(args.end, 1000000);
        assert_eq!(args.threads, Some(8));
        assert_eq!(args.cache_limit, DEFAULT_CACHE_LIMIT);
        assert_eq!(args.worker_count(), 8);
    }

    #[test]
    fn test_invalid_extent_is_a_usage_error() {
        use clap::error::ErrorKind;

        let err = Args::try_parse_from(["collatz", "nope", "10"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("nope"));
    }
}
