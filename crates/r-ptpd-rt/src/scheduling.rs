//! ---
//! ptpd_section: "01-core-functionality"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Runtime helpers driving the alarm tick loop."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::warn;

/// Fixed-period ticker for the alarm update pass.
///
/// Missed ticks are delayed rather than bursted, so a stalled host never
/// ages alarms several times in quick succession.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Interval,
    period: Duration,
    ticks: u64,
}

impl RateLimiter {
    /// First tick fires immediately.
    pub fn new(period: Duration) -> Self {
        Self::with_initial_delay(period, Duration::ZERO)
    }

    /// First tick fires after `delay`, then every `period`.
    ///
    /// # Panics
    ///
    /// Panics when `period` is zero.
    pub fn with_initial_delay(period: Duration, delay: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + delay, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            period,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub async fn tick(&mut self) -> Instant {
        let scheduled = self.interval.tick().await;
        self.ticks += 1;
        let lag = Instant::now().saturating_duration_since(scheduled);
        if lag > self.period {
            warn!(lag_ms = lag.as_millis() as u64, tick = self.ticks, "alarm tick running late");
        }
        scheduled
    }
}
