//! Platform implementation that delegates to a caller-provided timer function.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::pal::abstractions::Platform;

type TimerFn = dyn Fn() -> Instant + Send + Sync;

/// Reads time from a timer function supplied by the caller.
///
/// Clones share the same function.
#[derive(Clone)]
pub(crate) struct FunctionPlatform {
    timer: Arc<TimerFn>,
}

impl FunctionPlatform {
    pub(crate) fn new(timer: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        Self {
            timer: Arc::new(timer),
        }
    }
}

impl Platform for FunctionPlatform {
    fn now(&self) -> Instant {
        (self.timer)()
    }
}

impl fmt::Debug for FunctionPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>()).finish_non_exhaustive()
    }
}
