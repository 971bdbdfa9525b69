//! Cancellable periodic tick for the countdown.
//!
//! Arming, re-arming and cancelling are plain field updates, so a session can
//! reschedule the ticker without a runtime. The underlying
//! [`tokio::time::Interval`] is created lazily inside [`Ticker::tick`], which
//! guarantees a single active schedule: re-arming drops the old interval and
//! the next period starts counting from the moment of the reset.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    armed: bool,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            armed: false,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start ticking if not already. An armed ticker keeps its schedule.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Restart the schedule: the next tick fires one full period from now.
    pub fn rearm(&mut self) {
        self.interval = None;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.interval = None;
        self.armed = false;
    }

    /// Resolves at the next tick. Never resolves while cancelled, which
    /// makes it safe to use as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        if !self.armed {
            std::future::pending::<()>().await;
        }
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut iv = interval_at(Instant::now() + period, period);
            iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
            iv
        });
        interval.tick().await;
    }
}
