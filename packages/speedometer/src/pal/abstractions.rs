//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Instant;

/// Provides the current monotonic timestamp.
///
/// Implementations must never go backwards. Wall-clock time is deliberately not part of
/// this trait: clock adjustments by the operating system must not affect elapsed time.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Gets the current monotonic timestamp.
    fn now(&self) -> Instant;
}
