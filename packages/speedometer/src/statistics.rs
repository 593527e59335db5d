use std::fmt;

/// A point-in-time snapshot of a [`ProgressMeter`](crate::ProgressMeter).
///
/// The [`Display`](fmt::Display) implementation renders a one-line summary. Quantities that
/// are not defined (e.g. the speed before any time has elapsed) render as `none`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressStatistics {
    pub(crate) events: Option<u64>,
    pub(crate) total_events: u64,
    pub(crate) progress: Option<f64>,
    pub(crate) speed: Option<f64>,
    pub(crate) seconds_left: Option<f64>,
}

impl ProgressStatistics {
    /// Events done, `None` if the meter was not started.
    #[must_use]
    pub fn events(&self) -> Option<u64> {
        self.events
    }

    /// The expected total number of events.
    #[must_use]
    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    /// The completed fraction of the total.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.progress
    }

    /// Events per second.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    /// Estimated seconds per event, the inverse of the speed.
    #[must_use]
    pub fn event_seconds(&self) -> Option<f64> {
        self.speed
            .filter(|speed| *speed > 0.0)
            .map(f64::recip)
    }

    /// Estimated seconds until all remaining events are done.
    #[must_use]
    pub fn seconds_left(&self) -> Option<f64> {
        self.seconds_left
    }
}

impl fmt::Display for ProgressStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "events: {}/{} ({}), speed: {}, event time: {}, left: {}",
            Placeholder(self.events),
            self.total_events,
            Placeholder(self.progress.map(Percent)),
            Placeholder(self.speed.map(|speed| Fixed(speed, " events/s"))),
            Placeholder(self.event_seconds().map(|seconds| Fixed(seconds, " s"))),
            Placeholder(self.seconds_left.map(|seconds| Fixed(seconds, " s"))),
        )
    }
}

/// Renders the inner value, or `none` if there is no value.
pub(crate) struct Placeholder<T>(pub(crate) Option<T>);

impl<T: fmt::Display> fmt::Display for Placeholder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("none"),
        }
    }
}

struct Percent(f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

struct Fixed(f64, &'static str);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}{}", self.0, self.1)
    }
}
