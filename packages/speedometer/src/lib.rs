#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Lightweight meters for instrumenting a unit of work in-process.
//!
//! This package provides:
//! - [`RateMeter`] - Counts events and measures their rate (events per second) over one or
//!   more start/stop intervals
//! - [`ProgressMeter`] - A rate meter with a known total, reporting progress and the
//!   estimated time remaining
//! - [`SpeedContest`] - Times competing closures and ranks them, the fastest last
//!
//! All elapsed time is measured with a monotonic [`Clock`], so wall clock adjustments by
//! the operating system do not corrupt the measurements.
//!
//! # Measuring a rate
//!
//! ```
//! use speedometer::RateMeter;
//!
//! let mut meter = RateMeter::new();
//!
//! meter.start().unwrap();
//! for _ in 0..1000 {
//!     // Do some work.
//!     meter.add_event().unwrap();
//! }
//! meter.stop().unwrap();
//!
//! assert_eq!(meter.events(), Some(1000));
//! println!("{:?} events per second", meter.speed());
//! ```
//!
//! # Reporting progress
//!
//! ```
//! use speedometer::ProgressMeter;
//!
//! let items = ["a", "b", "c", "d"];
//! let mut meter = ProgressMeter::new(items.len() as u64).unwrap();
//!
//! meter.start().unwrap();
//! for item in items {
//!     if item == "b" {
//!         // Served from a cache - do not let it skew the estimates.
//!         meter.subtract_total_event().unwrap();
//!         continue;
//!     }
//!
//!     // Process the item.
//!     meter.add_event().unwrap();
//!     println!("{}", meter.statistics());
//! }
//! meter.stop().unwrap();
//!
//! assert_eq!(meter.progress(), Some(1.0));
//! ```
//!
//! # Errors
//!
//! Operations invoked in the wrong lifecycle state (see [`MeterState`]) or with arguments
//! outside their domain return an [`Error`] and leave the meter unchanged. Quantities that
//! are undefined, such as the speed before any time has elapsed, are `None` instead.
//!
//! # Threading
//!
//! The meters are plain values that take `&mut self` for every mutation. Share them between
//! threads only with external synchronization, and prefer one meter per unit of work.
//!
//! # Logging
//!
//! State transitions of the meters are logged at `trace` level and contest results at
//! `debug` and `info` level via the `tracing` crate. No subscriber is installed by this
//! package.

mod clock;
mod contest;
mod error;
mod pal;
mod progress_meter;
mod rate_meter;
mod state;
mod statistics;

pub use clock::Clock;
pub use contest::{
    ContestEntry, ContestOutcome, ContestResult, DEFAULT_ITERATIONS, DEFAULT_REPEATS,
    RankedEntry, SpeedContest,
};
pub use error::{Error, Result};
pub use progress_meter::ProgressMeter;
pub use rate_meter::RateMeter;
pub use state::MeterState;
pub use statistics::ProgressStatistics;
