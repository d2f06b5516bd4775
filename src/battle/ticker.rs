use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Source of elapsed time for a battle run
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick and return the time since the previous one
    async fn tick(&mut self) -> Duration;
}

/// Wall-clock ticker backed by a tokio interval
pub struct IntervalTicker {
    interval: Interval,
    last: Instant,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            last: Instant::now(),
        }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> Duration {
        let now = self.interval.tick().await;
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Ticker that returns the same step every time without waiting
#[derive(Debug, Clone)]
pub struct StepTicker {
    step: Duration,
    ticks: u64,
}

impl StepTicker {
    pub fn new(step: Duration) -> Self {
        Self { step, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> Duration {
        self.step * u32::try_from(self.ticks).unwrap_or(u32::MAX)
    }
}

#[async_trait]
impl Ticker for StepTicker {
    async fn tick(&mut self) -> Duration {
        self.ticks += 1;
        self.step
    }
}
