use std::time::Duration;

use crate::frame::{FrameWaiter, IntervalClock};
use crate::resolver::Resolver;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// How long lenient injection waits for a load event before assuming success
    pub fallback: Duration,
    /// Deadline for resolvers created without an explicit timeout
    pub resolver_timeout: Duration,
    /// Refresh period of the default frame clock
    pub frame_period: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fallback: Duration::from_millis(1000),
            resolver_timeout: Duration::from_millis(5000),
            frame_period: Duration::from_millis(16),
        }
    }
}

impl LoaderConfig {
    pub fn with_fallback(mut self, ms: u64) -> Self {
        self.fallback = Duration::from_millis(ms);
        self
    }

    pub fn with_resolver_timeout(mut self, ms: u64) -> Self {
        self.resolver_timeout = Duration::from_millis(ms);
        self
    }

    pub fn with_frame_period(mut self, ms: u64) -> Self {
        self.frame_period = Duration::from_millis(ms);
        self
    }

    /// Resolver armed with `resolver_timeout`
    pub fn resolver<T: Clone + Send + Sync + 'static>(&self) -> Resolver<T> {
        Resolver::new(self.resolver_timeout)
    }

    /// Frame waiter ticking every `frame_period`
    pub fn frame_waiter(&self) -> FrameWaiter<IntervalClock> {
        FrameWaiter::new(IntervalClock::new(self.frame_period))
    }

    pub fn fast() -> Self {
        Self {
            fallback: Duration::from_millis(250),
            resolver_timeout: Duration::from_millis(1000),
            frame_period: Duration::from_millis(16),
        }
    }

    pub fn patient() -> Self {
        Self {
            fallback: Duration::from_millis(5000),
            resolver_timeout: Duration::from_millis(30000),
            frame_period: Duration::from_millis(16),
        }
    }
}
