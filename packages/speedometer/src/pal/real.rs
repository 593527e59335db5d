//! Real platform implementation backed by the standard library monotonic clock.

use std::time::Instant;

use crate::pal::abstractions::Platform;

#[derive(Clone, Copy, Debug)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
