//! Platform abstraction layer for reading the monotonic clock.
//!
//! The meters never read the operating system clock directly. They go through
//! [`PlatformFacade`], which is the real monotonic clock in production and a manually
//! advanced fake (or a `mockall` mock) in unit tests. Callers may also supply their own
//! timer function.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod function;
mod real;

pub(crate) use abstractions::Platform;
#[cfg(test)]
pub(crate) use abstractions::MockPlatform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use function::FunctionPlatform;
