use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};

/// Passing this to [`FrameWaiter::wait`] waits for a refresh tick instead of a timer
pub const DEFAULT_WAIT_MS: u64 = 16;

/// Stand-in for ticks too far out to represent
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Source of display refresh ticks
#[async_trait]
pub trait FrameClock: Send + Sync {
    /// Suspend until the next refresh tick
    async fn next_frame(&self);
}

/// Fixed-period ticks aligned to the instant the clock was created.
/// A call landing exactly on a tick waits for the following one.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    origin: Instant,
    period: Duration,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        Self {
            origin: Instant::now(),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn next_tick(&self, now: Instant) -> Instant {
        let period = self.period.as_nanos();
        let elapsed = now.saturating_duration_since(self.origin).as_nanos();
        let next = (elapsed / period + 1).saturating_mul(period);
        let next = Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX));
        self.origin
            .checked_add(next)
            .unwrap_or_else(|| now + FAR_FUTURE)
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_WAIT_MS))
    }
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn next_frame(&self) {
        if self.period.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        sleep_until(self.next_tick(Instant::now())).await;
    }
}

pub struct FrameWaiter<C = IntervalClock> {
    clock: C,
}

impl Default for FrameWaiter<IntervalClock> {
    fn default() -> Self {
        Self::new(IntervalClock::default())
    }
}

impl<C: FrameClock> FrameWaiter<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub async fn next_frame(&self) {
        self.clock.next_frame().await;
    }

    pub async fn wait_for<T>(&self, duration: Duration, value: T) -> T {
        sleep(duration).await;
        value
    }

    /// `DEFAULT_WAIT_MS` waits one frame and yields `None`, even when `value`
    /// is given. Any other `ms` sleeps that long and hands `value` back.
    pub async fn wait<T>(&self, ms: u64, value: Option<T>) -> Option<T> {
        if ms == DEFAULT_WAIT_MS {
            self.next_frame().await;
            return None;
        }
        self.wait_for(Duration::from_millis(ms), value).await
    }
}
