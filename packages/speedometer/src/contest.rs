use std::any::type_name;
use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::statistics::Placeholder;
use crate::{Clock, Error, Result};

/// A reasonable number of calls per timing for operations that take nanoseconds.
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// A reasonable number of trials per candidate for [`SpeedContest::run_repeated()`].
pub const DEFAULT_REPEATS: u64 = 5;

/// Times competing implementations of the same operation and ranks them.
///
/// Each candidate is a closure, optionally paired with a setup closure that runs before each
/// timing. Candidates that need shared state (e.g. a counter) capture it, so that
/// independent contests never interfere with each other.
///
/// Rankings list the slowest candidate first and the winner last.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::hint::black_box;
///
/// use speedometer::SpeedContest;
///
/// let counter = Cell::new(0_u64);
///
/// let mut contest = SpeedContest::new();
/// contest.add_function_with_setup(
///     "set",
///     || counter.set(black_box(counter.get() + 1)),
///     || counter.set(0),
/// );
/// contest.add_function_with_setup(
///     "replace",
///     || {
///         counter.replace(black_box(counter.get() + 1));
///     },
///     || counter.set(0),
/// );
///
/// let outcome = contest.run_timed(10_000).unwrap();
/// println!("{outcome}");
///
/// assert_eq!(outcome.ranking().len(), 2);
/// assert!(outcome.min_time() <= outcome.max_time());
/// ```
pub struct SpeedContest<'a> {
    entries: Vec<ContestEntry<'a>>,
    clock: Clock,
}

impl<'a> SpeedContest<'a> {
    /// Creates an empty contest that measures time with the monotonic clock of the
    /// operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    /// Creates an empty contest that measures time with the given clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            entries: Vec::new(),
            clock,
        }
    }

    /// Registers a candidate that needs no setup.
    pub fn add_function(&mut self, name: impl Into<String>, test: impl FnMut() + 'a) {
        self.add_function_with_setup(name, test, || {});
    }

    /// Registers a candidate together with a setup closure.
    ///
    /// The setup runs once before each timing of the candidate, not before every call.
    pub fn add_function_with_setup(
        &mut self,
        name: impl Into<String>,
        test: impl FnMut() + 'a,
        setup: impl FnMut() + 'a,
    ) {
        self.entries.push(ContestEntry {
            name: name.into(),
            test: Box::new(test),
            setup: Box::new(setup),
            result: None,
        });
    }

    /// The registered candidates, in registration order, with the result of the last run.
    pub fn entries(&self) -> impl Iterator<Item = &ContestEntry<'a>> {
        self.entries.iter()
    }

    /// Times `iterations` calls of each candidate and ranks the candidates by the total.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `iterations` is zero.
    ///
    /// [`Error::EmptyContest`] if no candidates are registered.
    pub fn run_timed(&mut self, iterations: u64) -> Result<ContestOutcome> {
        self.validate(iterations, 1)?;

        for entry in &mut self.entries {
            (entry.setup)();
            let elapsed = time_iterations(&self.clock, &mut entry.test, iterations);

            debug!(
                candidate = entry.name.as_str(),
                iterations,
                seconds = elapsed.as_secs_f64(),
                "timed speed contest candidate"
            );

            entry.result = Some(ContestResult::Single(elapsed));
        }

        Ok(self.outcome())
    }

    /// Times `repeats` independent trials of `iterations` calls of each candidate and ranks
    /// the candidates by the sum of their trials.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `iterations` or `repeats` is zero.
    ///
    /// [`Error::EmptyContest`] if no candidates are registered.
    pub fn run_repeated(&mut self, iterations: u64, repeats: u64) -> Result<ContestOutcome> {
        self.validate(iterations, repeats)?;

        for entry in &mut self.entries {
            let trials = (0..repeats)
                .map(|_| {
                    (entry.setup)();
                    time_iterations(&self.clock, &mut entry.test, iterations)
                })
                .collect::<Vec<_>>();

            debug!(
                candidate = entry.name.as_str(),
                iterations,
                repeats,
                trial_seconds = ?trials,
                "timed speed contest candidate"
            );

            entry.result = Some(ContestResult::Trials(trials));
        }

        Ok(self.outcome())
    }

    fn validate(&self, iterations: u64, repeats: u64) -> Result<()> {
        if iterations == 0 {
            return Err(Error::zero_argument("iterations"));
        }

        if repeats == 0 {
            return Err(Error::zero_argument("repeats"));
        }

        if self.entries.is_empty() {
            return Err(Error::EmptyContest);
        }

        Ok(())
    }

    fn outcome(&self) -> ContestOutcome {
        let mut ranking = self
            .entries
            .iter()
            .map(|entry| RankedEntry {
                name: entry.name.clone(),
                result: entry
                    .result
                    .clone()
                    .expect("every entry has a result after a run"),
            })
            .collect::<Vec<_>>();

        // Slowest first, so the winner is last. Stable, so ties keep registration order.
        ranking.sort_by(|a, b| b.total().cmp(&a.total()));

        let max_time = ranking
            .iter()
            .map(RankedEntry::total)
            .max()
            .expect("validated that the contest has candidates");

        let min_time = ranking
            .iter()
            .map(RankedEntry::total)
            .min()
            .expect("validated that the contest has candidates");

        let outcome = ContestOutcome {
            ranking,
            max_time,
            min_time,
        };

        info!(
            winner = outcome.winner().name(),
            max_seconds = max_time.as_secs_f64(),
            min_seconds = min_time.as_secs_f64(),
            "speed contest finished"
        );

        outcome
    }
}

impl Default for SpeedContest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpeedContest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("entries", &self.entries)
            .field("clock", &self.clock)
            .finish()
    }
}

fn time_iterations(clock: &Clock, test: &mut dyn FnMut(), iterations: u64) -> Duration {
    let start = clock.now();

    for _ in 0..iterations {
        test();
    }

    clock.now().saturating_duration_since(start)
}

/// A candidate registered in a [`SpeedContest`].
pub struct ContestEntry<'a> {
    name: String,
    test: Box<dyn FnMut() + 'a>,
    setup: Box<dyn FnMut() + 'a>,
    result: Option<ContestResult>,
}

impl ContestEntry<'_> {
    /// The name the candidate was registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The result of the last run, `None` if the contest has not been run yet.
    #[must_use]
    pub fn result(&self) -> Option<&ContestResult> {
        self.result.as_ref()
    }
}

impl fmt::Debug for ContestEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("name", &self.name)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Measured time of one candidate in one contest run.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ContestResult {
    /// Total time of all iterations, from [`SpeedContest::run_timed()`].
    Single(Duration),

    /// Total time of all iterations of each trial, from [`SpeedContest::run_repeated()`].
    Trials(Vec<Duration>),
}

impl ContestResult {
    /// The time used for ranking: the single measurement or the sum of all trials.
    #[must_use]
    pub fn total(&self) -> Duration {
        match self {
            Self::Single(elapsed) => *elapsed,
            Self::Trials(trials) => trials.iter().sum(),
        }
    }
}

/// One candidate in the ranking of a [`ContestOutcome`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedEntry {
    name: String,
    result: ContestResult,
}

impl RankedEntry {
    /// The name the candidate was registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The measured time of the candidate.
    #[must_use]
    pub fn result(&self) -> &ContestResult {
        &self.result
    }

    /// The time used for ranking.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.result.total()
    }
}

/// The ranked result of a [`SpeedContest`] run.
///
/// The [`Display`](fmt::Display) implementation renders a report with one line per
/// candidate: name, total time in seconds, and the total relative to the slowest and to the
/// fastest candidate. The best candidate is the last line.
#[derive(Clone, Debug)]
pub struct ContestOutcome {
    ranking: Vec<RankedEntry>,
    max_time: Duration,
    min_time: Duration,
}

impl ContestOutcome {
    /// All candidates, slowest first and the winner last.
    #[must_use]
    pub fn ranking(&self) -> &[RankedEntry] {
        &self.ranking
    }

    /// The fastest candidate.
    #[must_use]
    pub fn winner(&self) -> &RankedEntry {
        self.ranking
            .last()
            .expect("a contest outcome always has at least one candidate")
    }

    /// The total time of the slowest candidate.
    #[must_use]
    pub fn max_time(&self) -> Duration {
        self.max_time
    }

    /// The total time of the fastest candidate.
    #[must_use]
    pub fn min_time(&self) -> Duration {
        self.min_time
    }

    /// Prints the ranking report to stdout.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        println!("{self}");
    }
}

impl fmt::Display for ContestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Speed contest winners (the best is the last).")?;
        writeln!(f, "name, result, relative to maximum, relative to minimum")?;

        for entry in &self.ranking {
            let total = entry.total();

            writeln!(
                f,
                "{} {:.3e} {} {}",
                entry.name,
                total.as_secs_f64(),
                Placeholder(relative(total, self.max_time)),
                Placeholder(relative(total, self.min_time)),
            )?;
        }

        Ok(())
    }
}

/// Ratio rendered with three decimals, `None` if the reference time is zero.
fn relative(time: Duration, reference: Duration) -> Option<Ratio> {
    if reference.is_zero() {
        return None;
    }

    Some(Ratio(time.as_secs_f64() / reference.as_secs_f64()))
}

struct Ratio(f64);

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
