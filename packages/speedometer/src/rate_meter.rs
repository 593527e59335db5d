use std::time::{Duration, Instant};

use tracing::trace;

use crate::{Clock, Error, MeterState, Result};

/// Measures the rate of events (events per second) over one or more measurement intervals.
///
/// A meter starts out uninitialized. [`start()`](Self::start) opens an interval, during
/// which events can be added, and [`stop()`](Self::stop) closes it. Starting again opens a
/// new interval whose duration and events are added on top of the previous totals, so a
/// meter can be paused around work that should not count towards the rate.
/// [`reset()`](Self::reset) discards all history.
///
/// Elapsed time is measured with a monotonic [`Clock`]. For deterministic measurements,
/// [`start_at()`](Self::start_at) and [`stop_at()`](Self::stop_at) accept explicit
/// timestamps instead of reading the clock.
///
/// # Examples
///
/// ```
/// use speedometer::RateMeter;
///
/// let mut meter = RateMeter::new();
/// assert_eq!(meter.events(), None);
///
/// meter.start().unwrap();
/// meter.add_event().unwrap();
/// meter.add_events(2).unwrap();
/// meter.stop().unwrap();
///
/// assert_eq!(meter.events(), Some(3));
///
/// // `None` if no time at all has passed between start and stop.
/// if let Some(speed) = meter.speed() {
///     println!("{speed:.1} events per second");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RateMeter {
    clock: Clock,

    // Set while an interval is open.
    running_since: Option<Instant>,

    // `None` until the first start after creation or reset.
    totals: Option<Totals>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Totals {
    event_count: u64,

    // Sum of all closed intervals. The open interval, if any, is not included.
    accumulated: Duration,
}

impl RateMeter {
    /// Creates an uninitialized meter that reads the monotonic clock of the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    /// Creates an uninitialized meter that reads time from the given clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            running_since: None,
            totals: None,
        }
    }

    /// The current lifecycle state of the meter.
    #[must_use]
    pub fn state(&self) -> MeterState {
        match (self.totals, self.running_since) {
            (None, _) => MeterState::Uninitialized,
            (Some(_), Some(_)) => MeterState::Running,
            (Some(_), None) => MeterState::Stopped,
        }
    }

    /// Whether an interval is currently open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Opens a new measurement interval starting now.
    ///
    /// The first start after creation or [`reset()`](Self::reset) initializes the event
    /// count and elapsed time to zero. Later starts keep the totals of previous intervals.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is already running.
    pub fn start(&mut self) -> Result<()> {
        self.ensure_not_running("start")?;

        let now = self.clock.now();
        self.start_at(now)
    }

    /// Opens a new measurement interval starting at the given timestamp.
    ///
    /// The timestamp must come from a monotonic source, typically [`Clock::now()`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is already running.
    pub fn start_at(&mut self, at: Instant) -> Result<()> {
        self.ensure_not_running("start")?;

        let totals = *self.totals.get_or_insert_with(Totals::default);
        self.running_since = Some(at);

        trace!(
            event_count = totals.event_count,
            accumulated_seconds = totals.accumulated.as_secs_f64(),
            "meter started"
        );

        Ok(())
    }

    /// Adds one event to the count.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    pub fn add_event(&mut self) -> Result<()> {
        self.add_events(1)
    }

    /// Adds `events` events to the count.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    ///
    /// [`Error::InvalidArgument`] if `events` is zero.
    ///
    /// [`Error::OutOfRange`] if the count would overflow `u64`.
    pub fn add_events(&mut self, events: u64) -> Result<()> {
        self.ensure_running("add events to")?;

        if events == 0 {
            return Err(Error::zero_argument("events"));
        }

        let totals = self
            .totals
            .as_mut()
            .expect("a running meter always has totals");

        totals.event_count =
            totals
                .event_count
                .checked_add(events)
                .ok_or(Error::OutOfRange {
                    problem: "event count would overflow",
                    event_count: totals.event_count,
                    total_events: u64::MAX,
                    requested: events,
                })?;

        Ok(())
    }

    /// Closes the open measurement interval now.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    pub fn stop(&mut self) -> Result<()> {
        self.ensure_running("stop")?;

        let now = self.clock.now();
        self.stop_at(now)
    }

    /// Closes the open measurement interval at the given timestamp.
    ///
    /// The duration of the interval is added to the accumulated elapsed time. A timestamp
    /// earlier than the start of the interval counts as a zero-length interval.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the meter is not running.
    pub fn stop_at(&mut self, at: Instant) -> Result<()> {
        self.ensure_running("stop")?;

        let running_since = self
            .running_since
            .take()
            .expect("guarded by ensure_running");

        let totals = self
            .totals
            .as_mut()
            .expect("a running meter always has totals");

        let interval = at.saturating_duration_since(running_since);

        totals.accumulated = totals
            .accumulated
            .checked_add(interval)
            .expect("accumulated time overflows Duration - this indicates an unrealistic scenario");

        trace!(
            event_count = totals.event_count,
            interval_seconds = interval.as_secs_f64(),
            accumulated_seconds = totals.accumulated.as_secs_f64(),
            "meter stopped"
        );

        Ok(())
    }

    /// Discards all counters and returns the meter to the uninitialized state.
    pub fn reset(&mut self) {
        self.running_since = None;
        self.totals = None;

        trace!("meter reset");
    }

    /// The number of events added since creation or the last reset.
    ///
    /// `None` if the meter has not been started since then.
    #[must_use]
    pub fn events(&self) -> Option<u64> {
        self.totals.map(|totals| totals.event_count)
    }

    /// The elapsed time of all intervals since creation or the last reset.
    ///
    /// While running, this includes the open interval up to now. Once stopped, the value is
    /// frozen until the next start. `None` if the meter has not been started.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let totals = self.totals?;

        let Some(running_since) = self.running_since else {
            return Some(totals.accumulated);
        };

        let open_interval = self.clock.now().saturating_duration_since(running_since);

        Some(
            totals
                .accumulated
                .checked_add(open_interval)
                .expect("elapsed time overflows Duration - this indicates an unrealistic scenario"),
        )
    }

    /// The elapsed time in seconds, as returned by [`elapsed()`](Self::elapsed).
    #[must_use]
    pub fn seconds(&self) -> Option<f64> {
        self.elapsed().map(|elapsed| elapsed.as_secs_f64())
    }

    /// The rate of events per second over all intervals.
    ///
    /// `None` if the meter has not been started or if no time has elapsed yet, such as
    /// immediately after the first start.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        speed_over(self.events()?, self.elapsed()?)
    }

    pub(crate) fn ensure_running(&self, operation: &'static str) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(Error::invalid_state(operation, self.state()))
        }
    }

    fn ensure_not_running(&self, operation: &'static str) -> Result<()> {
        if self.is_running() {
            Err(Error::invalid_state(operation, MeterState::Running))
        } else {
            Ok(())
        }
    }
}

/// Events per second for `event_count` events in `elapsed`, `None` if no time has elapsed.
pub(crate) fn speed_over(event_count: u64, elapsed: Duration) -> Option<f64> {
    if elapsed.is_zero() {
        return None;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "event counts beyond 2^53 are not realistic and a rate is approximate anyway"
    )]
    let event_count = event_count as f64;

    Some(event_count / elapsed.as_secs_f64())
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new()
    }
}
