use std::time::{Duration, Instant};

use crate::rate_meter::speed_over;
use crate::{Clock, Error, MeterState, ProgressStatistics, RateMeter, Result};

/// Measures the progress of a known amount of work and estimates the time remaining.
///
/// This is a [`RateMeter`] with a known total number of events. The event count can never
/// exceed the total. The total can be reduced while running, which is useful to exclude work
/// that turned out to be trivial (e.g. cache hits) so that the rate and the estimate of the
/// time remaining reflect only the real work.
///
/// # Examples
///
/// ```
/// use speedometer::ProgressMeter;
///
/// let mut meter = ProgressMeter::new(10).unwrap();
///
/// meter.start().unwrap();
/// meter.add_events(4).unwrap();
///
/// // Two of the remaining items were served from a cache.
/// meter.subtract_total_events(2).unwrap();
///
/// assert_eq!(meter.total_events(), 8);
/// assert_eq!(meter.progress(), Some(0.5));
///
/// println!("{}", meter.statistics());
/// ```
#[derive(Clone, Debug)]
pub struct ProgressMeter {
    meter: RateMeter,
    total_events: u64,

    // The total given at construction, restored by reset.
    initial_total_events: u64,
}

impl ProgressMeter {
    /// Creates an uninitialized meter for `total_events` events of work.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `total_events` is zero.
    pub fn new(total_events: u64) -> Result<Self> {
        Self::with_clock(total_events, Clock::new())
    }

    /// Creates an uninitialized meter that reads time from the given clock.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `total_events` is zero.
    pub fn with_clock(total_events: u64, clock: Clock) -> Result<Self> {
        if total_events == 0 {
            return Err(Error::zero_argument("total_events"));
        }

        Ok(Self {
            meter: RateMeter::with_clock(clock),
            total_events,
            initial_total_events: total_events,
        })
    }

    /// The current lifecycle state of the meter.
    #[must_use]
    pub fn state(&self) -> MeterState {
        self.meter.state()
    }

    /// Whether an interval is currently open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.meter.is_running()
    }

    /// Opens a new measurement interval starting now.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is already running.
    pub fn start(&mut self) -> Result<()> {
        self.meter.start()
    }

    /// Opens a new measurement interval starting at the given timestamp.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is already running.
    pub fn start_at(&mut self, at: Instant) -> Result<()> {
        self.meter.start_at(at)
    }

    /// Closes the open measurement interval now.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    pub fn stop(&mut self) -> Result<()> {
        self.meter.stop()
    }

    /// Closes the open measurement interval at the given timestamp.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    pub fn stop_at(&mut self, at: Instant) -> Result<()> {
        self.meter.stop_at(at)
    }

    /// Discards the event count and elapsed time and restores the total given at construction.
    pub fn reset(&mut self) {
        self.meter.reset();
        self.total_events = self.initial_total_events;
    }

    /// Adds one completed event.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    ///
    /// [`Error::OutOfRange`] if the event count would exceed the total.
    pub fn add_event(&mut self) -> Result<()> {
        self.add_events(1)
    }

    /// Adds `events` completed events.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    ///
    /// [`Error::InvalidArgument`] if `events` is zero.
    ///
    /// [`Error::OutOfRange`] if the event count would exceed the total.
    pub fn add_events(&mut self, events: u64) -> Result<()> {
        self.meter.ensure_running("add events to")?;

        if events == 0 {
            return Err(Error::zero_argument("events"));
        }

        let event_count = self.running_event_count();

        let within_total = event_count
            .checked_add(events)
            .is_some_and(|new_count| new_count <= self.total_events);

        if !within_total {
            return Err(Error::OutOfRange {
                problem: "event count would exceed the total",
                event_count,
                total_events: self.total_events,
                requested: events,
            });
        }

        self.meter.add_events(events)
    }

    /// Removes one event from the total.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    ///
    /// [`Error::OutOfRange`] if the total would fall below the event count.
    pub fn subtract_total_event(&mut self) -> Result<()> {
        self.subtract_total_events(1)
    }

    /// Removes `events` events from the total.
    ///
    /// Use this for work that completed without going through the measured code path, so
    /// that it does not skew the rate or the estimated time remaining.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    ///
    /// [`Error::InvalidArgument`] if `events` is zero.
    ///
    /// [`Error::OutOfRange`] if the total would fall below the event count.
    pub fn subtract_total_events(&mut self, events: u64) -> Result<()> {
        self.meter.ensure_running("subtract total events from")?;

        if events == 0 {
            return Err(Error::zero_argument("events"));
        }

        let event_count = self.running_event_count();

        let new_total = self
            .total_events
            .checked_sub(events)
            .filter(|new_total| *new_total >= event_count)
            .ok_or(Error::OutOfRange {
                problem: "total would fall below the event count",
                event_count,
                total_events: self.total_events,
                requested: events,
            })?;

        self.total_events = new_total;

        Ok(())
    }

    /// The expected total number of events.
    #[must_use]
    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    /// The number of events added since creation or the last reset.
    ///
    /// `None` if the meter has not been started since then.
    #[must_use]
    pub fn events(&self) -> Option<u64> {
        self.meter.events()
    }

    /// The elapsed time of all intervals since creation or the last reset.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.meter.elapsed()
    }

    /// The elapsed time in seconds.
    #[must_use]
    pub fn seconds(&self) -> Option<f64> {
        self.meter.seconds()
    }

    /// The rate of events per second over all intervals.
    ///
    /// `None` if the meter has not been started or no time has elapsed yet.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        self.meter.speed()
    }

    /// The completed fraction of the total, in the range `0.0..=1.0`.
    ///
    /// `None` if the meter has not been started. A total that was reduced to zero counts as
    /// fully complete.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        let event_count = self.events()?;

        if self.total_events == 0 {
            return Some(1.0);
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "event counts beyond 2^53 are not realistic and progress is approximate anyway"
        )]
        let progress = event_count as f64 / self.total_events as f64;

        Some(progress)
    }

    /// The estimated number of seconds until all remaining events are done, at the current speed.
    ///
    /// `None` if the speed is unknown or zero.
    #[must_use]
    pub fn seconds_left(&self) -> Option<f64> {
        self.seconds_left_at(self.events()?, self.speed()?)
    }

    fn seconds_left_at(&self, event_count: u64, speed: f64) -> Option<f64> {
        if speed <= 0.0 {
            return None;
        }

        let remaining = self
            .total_events
            .checked_sub(event_count)
            .expect("event count never exceeds the total");

        #[expect(
            clippy::cast_precision_loss,
            reason = "event counts beyond 2^53 are not realistic and the estimate is approximate anyway"
        )]
        let remaining = remaining as f64;

        Some(remaining / speed)
    }

    /// Captures a snapshot of the meter that renders as a human-readable summary.
    ///
    /// # Examples
    ///
    /// ```
    /// use speedometer::ProgressMeter;
    ///
    /// let meter = ProgressMeter::new(10).unwrap();
    ///
    /// assert_eq!(
    ///     meter.statistics().to_string(),
    ///     "events: none/10 (none), speed: none, event time: none, left: none"
    /// );
    /// ```
    #[must_use]
    pub fn statistics(&self) -> ProgressStatistics {
        // The clock is read once so that all derived quantities describe the same moment.
        let events = self.events();
        let speed = events
            .zip(self.elapsed())
            .and_then(|(event_count, elapsed)| speed_over(event_count, elapsed));
        let seconds_left = events
            .zip(speed)
            .and_then(|(event_count, speed)| self.seconds_left_at(event_count, speed));

        ProgressStatistics {
            events,
            total_events: self.total_events,
            progress: self.progress(),
            speed,
            seconds_left,
        }
    }

    fn running_event_count(&self) -> u64 {
        self.meter
            .events()
            .expect("a running meter always has an event count")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::{FakePlatform, MockPlatform, PlatformFacade};

    assert_impl_all!(ProgressMeter: Send, Sync, Clone);

    fn create_test_meter(total_events: u64) -> (ProgressMeter, FakePlatform) {
        let fake = FakePlatform::new();
        let clock = Clock::from_pal(PlatformFacade::fake(fake.clone()));
        (ProgressMeter::with_clock(total_events, clock).unwrap(), fake)
    }

    #[test]
    fn zero_total_is_invalid_argument() {
        assert!(matches!(
            ProgressMeter::new(0),
            Err(Error::InvalidArgument {
                argument: "total_events",
                ..
            })
        ));
    }

    #[test]
    fn subtract_total_scenario() {
        let (mut meter, _) = create_test_meter(10);

        meter.start().unwrap();
        meter.add_events(4).unwrap();
        meter.subtract_total_events(2).unwrap();

        assert_eq!(meter.total_events(), 8);
        assert_eq!(meter.progress(), Some(0.5));
    }

    #[test]
    fn progress_is_none_until_started() {
        let (mut meter, _) = create_test_meter(10);
        assert_eq!(meter.progress(), None);

        meter.start().unwrap();
        assert_eq!(meter.progress(), Some(0.0));
    }

    #[test]
    fn add_past_total_is_out_of_range_and_does_not_mutate() {
        let (mut meter, _) = create_test_meter(5);

        meter.start().unwrap();
        meter.add_events(4).unwrap();

        assert!(matches!(
            meter.add_events(2),
            Err(Error::OutOfRange {
                event_count: 4,
                total_events: 5,
                requested: 2,
                ..
            })
        ));
        assert_eq!(meter.events(), Some(4));

        meter.add_event().unwrap();
        assert_eq!(meter.progress(), Some(1.0));
        assert!(matches!(meter.add_event(), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn add_with_overflowing_count_is_out_of_range() {
        let (mut meter, _) = create_test_meter(u64::MAX);

        meter.start().unwrap();
        meter.add_events(10).unwrap();

        assert!(matches!(
            meter.add_events(u64::MAX),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn add_before_start_is_invalid_state() {
        let (mut meter, _) = create_test_meter(5);

        assert!(matches!(meter.add_event(), Err(Error::InvalidState { .. })));
        assert!(matches!(
            meter.add_events(3),
            Err(Error::InvalidState { .. })
        ));
        assert!(matches!(meter.stop(), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn subtract_when_not_running_is_invalid_state() {
        let (mut meter, _) = create_test_meter(5);

        assert!(matches!(
            meter.subtract_total_event(),
            Err(Error::InvalidState {
                state: MeterState::Uninitialized,
                ..
            })
        ));

        meter.start().unwrap();
        meter.stop().unwrap();

        assert!(matches!(
            meter.subtract_total_events(1),
            Err(Error::InvalidState {
                state: MeterState::Stopped,
                ..
            })
        ));
        assert_eq!(meter.total_events(), 5);
    }

    #[test]
    fn subtract_below_event_count_is_out_of_range() {
        let (mut meter, _) = create_test_meter(10);

        meter.start().unwrap();
        meter.add_events(6).unwrap();

        assert!(matches!(
            meter.subtract_total_events(5),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            meter.subtract_total_events(11),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(meter.total_events(), 10);

        meter.subtract_total_events(4).unwrap();
        assert_eq!(meter.total_events(), 6);
        assert_eq!(meter.progress(), Some(1.0));
    }

    #[test]
    fn subtract_zero_is_invalid_argument() {
        let (mut meter, _) = create_test_meter(10);
        meter.start().unwrap();

        assert!(matches!(
            meter.subtract_total_events(0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn total_reduced_to_zero_is_complete() {
        let (mut meter, _) = create_test_meter(3);

        meter.start().unwrap();
        meter.subtract_total_events(3).unwrap();

        assert_eq!(meter.total_events(), 0);
        assert_eq!(meter.progress(), Some(1.0));
    }

    #[test]
    fn seconds_left_follows_speed() {
        let (mut meter, fake) = create_test_meter(10);

        meter.start().unwrap();
        assert_eq!(meter.seconds_left(), None);

        meter.add_events(4).unwrap();
        assert_eq!(meter.seconds_left(), None);

        fake.advance(Duration::from_secs(2));

        assert_eq!(meter.speed(), Some(2.0));
        assert_eq!(meter.seconds_left(), Some(3.0));
    }

    #[test]
    fn seconds_left_is_none_at_zero_speed() {
        let (mut meter, fake) = create_test_meter(10);

        meter.start().unwrap();
        fake.advance(Duration::from_secs(1));

        assert_eq!(meter.speed(), Some(0.0));
        assert_eq!(meter.seconds_left(), None);
    }

    #[test]
    fn reset_restores_initial_total() {
        let (mut meter, _) = create_test_meter(10);

        meter.start().unwrap();
        meter.add_events(2).unwrap();
        meter.subtract_total_event().unwrap();
        meter.reset();

        assert_eq!(meter.state(), MeterState::Uninitialized);
        assert_eq!(meter.events(), None);
        assert_eq!(meter.total_events(), 10);
    }

    #[test]
    fn reset_after_total_reduced_to_zero_is_usable_again() {
        let (mut meter, _) = create_test_meter(3);

        meter.start().unwrap();
        meter.subtract_total_events(3).unwrap();
        meter.reset();
        meter.start().unwrap();

        assert_eq!(meter.total_events(), 3);
        assert_eq!(meter.progress(), Some(0.0));

        meter.add_event().unwrap();
        assert_eq!(meter.events(), Some(1));
    }

    #[test]
    fn statistics_read_clock_once() {
        let base = Instant::now();

        // Every read of the clock returns a later time than the previous one.
        let reads = AtomicU64::new(1);
        let mut mock = MockPlatform::new();
        mock.expect_now().times(1).returning(move || {
            base + Duration::from_secs(reads.fetch_add(1, Ordering::Relaxed))
        });

        let clock = Clock::from_pal(PlatformFacade::from_mock(mock));
        let mut meter = ProgressMeter::with_clock(10, clock).unwrap();
        meter.start_at(base).unwrap();
        meter.add_events(5).unwrap();

        let statistics = meter.statistics();

        assert_eq!(statistics.speed(), Some(5.0));
        assert_eq!(statistics.event_seconds(), Some(0.2));
        assert_eq!(statistics.seconds_left(), Some(1.0));
    }

    #[test]
    fn statistics_reflect_meter() {
        let (mut meter, fake) = create_test_meter(10);

        meter.start().unwrap();
        meter.add_events(4).unwrap();
        fake.advance(Duration::from_secs(2));

        let statistics = meter.statistics();

        assert_eq!(statistics.events(), Some(4));
        assert_eq!(statistics.total_events(), 10);
        assert_eq!(statistics.progress(), Some(0.4));
        assert_eq!(statistics.speed(), Some(2.0));
        assert_eq!(statistics.seconds_left(), Some(3.0));
        assert_eq!(
            statistics.to_string(),
            "events: 4/10 (40.00%), speed: 2.000 events/s, event time: 0.500 s, left: 3.000 s"
        );
    }
}
