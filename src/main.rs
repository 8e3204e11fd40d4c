// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Binary entry point.
//!
//! Parses the command line, runs the scheduler, and prints the two result
//! lines. Logging goes to stderr and is controlled through `RUST_LOG`; the
//! result lines are the only stdout output.
//!
//! # Exit codes
//!
//! - 0: success
//! - 2: usage or parse error (missing arguments, invalid extent token)
//! - 1: invalid search configuration (`start > end`, zero workers)

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use collatz_search::cli::Args;
use collatz_search::{Counters, RangeScheduler, SequenceCache};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Usage and parse errors exit with code 2 here, naming the bad token.
    let args = Args::parse();

    let cache = SequenceCache::with_limit(args.cache_limit);
    let scheduler = RangeScheduler::new(&cache);

    let result = match scheduler.run(args.start, args.end, args.worker_count()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("collatz: {err}");
            return ExitCode::FAILURE;
        }
    };

    debug!(
        scanned = result.stats.get(Counters::ValuesScanned),
        cache_hits = result.stats.get(Counters::CacheHits),
        steps = result.stats.get(Counters::StepsComputed),
        "run counters"
    );

    println!(
        "Collatz {} to {} completed in {} seconds",
        args.start,
        args.end,
        result.elapsed.as_secs_f64()
    );
    println!("Max length: {} at n = {}", result.best_len, result.best_n);

    ExitCode::SUCCESS
}
