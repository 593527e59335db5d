//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

/// Fake implementation of the platform abstraction for testing.
///
/// Time only moves when a test calls [`advance()`](Self::advance). Multiple clones of the
/// same `FakePlatform` share the same underlying timestamp, so a test can keep one clone
/// and hand another to the code under test (including closures that simulate work).
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    now: Arc<Mutex<Instant>>,
}

impl FakePlatform {
    /// Creates a new fake platform frozen at the current real time.
    pub(crate) fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the shared timestamp forward, affecting all clones of this platform.
    pub(crate) fn advance(&self, duration: Duration) {
        let mut now = self
            .now
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        *now = now
            .checked_add(duration)
            .expect("fake time advanced beyond what Instant can represent");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        *self
            .now
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn time_is_frozen_until_advanced() {
        let platform = FakePlatform::new();

        assert_eq!(platform.now(), platform.now());
    }

    #[test]
    fn advance_moves_time_forward() {
        let platform = FakePlatform::new();
        let before = platform.now();

        platform.advance(Duration::from_millis(150));

        assert_eq!(
            platform.now().duration_since(before),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();
        let before = platform2.now();

        platform1.advance(Duration::from_secs(2));

        assert_eq!(platform2.now().duration_since(before), Duration::from_secs(2));
    }
}
