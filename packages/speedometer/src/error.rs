use thiserror::Error;

use crate::MeterState;

/// Errors returned by the meters and the speed contest.
///
/// Every fallible operation validates its inputs and the current state before mutating
/// anything, so a returned error means the callee is unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation is not valid in the current lifecycle state of the meter.
    #[error("cannot {operation} a meter that is {state}")]
    InvalidState {
        /// The operation that was attempted, e.g. "stop".
        operation: &'static str,

        /// The state the meter was in when the operation was attempted.
        state: MeterState,
    },

    /// The operation would push the event count or the total outside its allowed range.
    #[error(
        "{problem}: {event_count} of {total_events} events done, requested change of {requested}"
    )]
    OutOfRange {
        /// A human-readable description of the violated limit.
        problem: &'static str,

        /// The event count at the time of the call.
        event_count: u64,

        /// The total event count at the time of the call. Rate meters have no total
        /// and report `u64::MAX` here.
        total_events: u64,

        /// The increment or decrement that was requested.
        requested: u64,
    },

    /// The caller provided an argument outside the domain of the operation.
    #[error("invalid argument '{argument}': {problem}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,

        /// A human-readable description of the problem.
        problem: &'static str,
    },

    /// A speed contest was run without any registered candidates.
    #[error("the speed contest has no candidates")]
    EmptyContest,
}

impl Error {
    pub(crate) fn invalid_state(operation: &'static str, state: MeterState) -> Self {
        Self::InvalidState { operation, state }
    }

    pub(crate) fn zero_argument(argument: &'static str) -> Self {
        Self::InvalidArgument {
            argument,
            problem: "must be a positive integer",
        }
    }
}

/// A specialized `Result` type for meter and contest operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
