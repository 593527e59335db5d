//! Compares two ways of incrementing a shared counter.
//!
//! Run with `RUST_LOG=debug` to see per-candidate timings as they are taken.

use std::cell::Cell;
use std::hint::black_box;

use speedometer::{DEFAULT_REPEATS, SpeedContest};
use tracing_subscriber::EnvFilter;

const ITERATIONS: u64 = 100_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let counter = Cell::new(0_u64);

    let mut contest = SpeedContest::new();
    contest.add_function_with_setup(
        "simple_add",
        || counter.set(black_box(counter.get() + 1)),
        || counter.set(0),
    );
    contest.add_function_with_setup(
        "increment_add",
        || {
            counter.replace(black_box(counter.get().wrapping_add(1)));
        },
        || counter.set(0),
    );

    println!("Starting speed contest.");
    match contest.run_timed(ITERATIONS) {
        Ok(outcome) => outcome.print_to_stdout(),
        Err(error) => eprintln!("speed contest failed: {error}"),
    }

    println!("Starting repeated speed contest.");
    match contest.run_repeated(ITERATIONS, DEFAULT_REPEATS) {
        Ok(outcome) => outcome.print_to_stdout(),
        Err(error) => eprintln!("speed contest failed: {error}"),
    }
}
