use std::fmt;

/// Lifecycle state of a [`RateMeter`](crate::RateMeter) or
/// [`ProgressMeter`](crate::ProgressMeter).
///
/// ```text
/// Uninitialized --start--> Running --stop--> Stopped
///                            ^                  |
///                            +------start-------+
///
/// any state --reset--> Uninitialized
/// ```
///
/// Events can only be added while `Running`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum MeterState {
    /// Never started, or reset since the last start. No counters exist.
    Uninitialized,

    /// An interval is open and events can be added.
    Running,

    /// No interval is open. Counters hold the frozen totals of all previous intervals.
    Stopped,
}

impl fmt::Display for MeterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };

        f.write_str(name)
    }
}
