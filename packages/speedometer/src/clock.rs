use std::time::Instant;

use crate::pal::{FunctionPlatform, Platform, PlatformFacade};

/// A monotonic clock that the meters and the speed contest read elapsed time from.
///
/// Timestamps produced by this clock never go backwards and do not follow wall clock
/// adjustments applied by the operating system (e.g. as part of clock synchronization),
/// which makes them suitable for elapsed time arithmetic. Use the wall clock for display
/// purposes only.
///
/// # Examples
///
/// ```
/// use speedometer::{Clock, RateMeter};
///
/// let clock = Clock::new();
///
/// let mut meter = RateMeter::new();
/// meter.start_at(clock.now()).unwrap();
/// meter.add_event().unwrap();
/// meter.stop_at(clock.now()).unwrap();
///
/// assert_eq!(meter.events(), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct Clock {
    platform: PlatformFacade,
}

impl Clock {
    /// Creates a clock backed by the monotonic clock of the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::from_pal(PlatformFacade::real())
    }

    /// Creates a clock that reads time from the given timer function.
    ///
    /// Use this to measure with a different time source, or to control time in tests of
    /// code that uses the meters or a [`SpeedContest`](crate::SpeedContest). The function
    /// must never return a timestamp earlier than one it returned before.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Instant;
    ///
    /// use speedometer::{Clock, RateMeter};
    ///
    /// let frozen = Instant::now();
    /// let clock = Clock::from_fn(move || frozen);
    ///
    /// let mut meter = RateMeter::with_clock(clock);
    /// meter.start().unwrap();
    /// meter.add_event().unwrap();
    ///
    /// // No time passes on a frozen clock, so there is no speed yet.
    /// assert_eq!(meter.speed(), None);
    /// ```
    #[must_use]
    pub fn from_fn(timer: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        Self::from_pal(PlatformFacade::function(FunctionPlatform::new(timer)))
    }

    #[must_use]
    pub(crate) fn from_pal(platform: PlatformFacade) -> Self {
        Self { platform }
    }

    /// Captures the current timestamp.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.platform.now()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
