//! Reports progress of a batch of simulated jobs, some of which are cache hits.
//!
//! Run with `RUST_LOG=trace` to see meter state transitions.

use std::thread;
use std::time::Duration;

use speedometer::{ProgressMeter, Result};
use tracing_subscriber::EnvFilter;

const JOBS: u64 = 20;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut meter = ProgressMeter::new(JOBS)?;
    meter.start()?;

    for job in 0..JOBS {
        if job % 5 == 0 {
            // Cached result, excluded from the rate.
            meter.subtract_total_event()?;
            continue;
        }

        thread::sleep(Duration::from_millis(20));
        meter.add_event()?;

        println!("{}", meter.statistics());
    }

    meter.stop()?;
    println!("done in {:.3} s", meter.seconds().unwrap_or_default());

    Ok(())
}
