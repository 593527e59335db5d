//! Platform facade for switching between real and test implementations.

#[cfg(test)]
use std::sync::Arc;
use std::time::Instant;

use crate::pal::abstractions::Platform;
#[cfg(test)]
use crate::pal::{FakePlatform, MockPlatform};
use crate::pal::FunctionPlatform;
use crate::pal::real::RealPlatform;

/// Facade that allows switching between real and test platform implementations.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    /// The monotonic clock of the operating system.
    Real(RealPlatform),

    /// A timer function supplied by the caller.
    Function(FunctionPlatform),

    /// Manually advanced time for deterministic tests.
    #[cfg(test)]
    Fake(FakePlatform),

    /// Expectation-driven time for tests that verify how often the clock is read.
    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform)
    }

    pub(crate) fn function(platform: FunctionPlatform) -> Self {
        Self::Function(platform)
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(platform) => platform.now(),
            Self::Function(platform) => platform.now(),
            #[cfg(test)]
            Self::Fake(platform) => platform.now(),
            #[cfg(test)]
            Self::Mock(platform) => platform.now(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn fake_facade_follows_fake_platform() {
        let fake = FakePlatform::new();
        let facade = PlatformFacade::fake(fake.clone());
        let before = facade.now();

        fake.advance(Duration::from_millis(300));

        assert_eq!(
            facade.now().duration_since(before),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn mock_facade_delegates_to_mock() {
        let expected = Instant::now();

        let mut mock = MockPlatform::new();
        mock.expect_now().times(1).return_const(expected);

        let facade = PlatformFacade::from_mock(mock);

        assert_eq!(facade.now(), expected);
    }
}
