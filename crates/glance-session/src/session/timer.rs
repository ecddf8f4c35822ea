use std::time::Duration;

use glance_core::display::DisplaySurface;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A running refresh timer for one surface.
///
/// Owning the value is owning the timer: dropping it cancels every future
/// tick, so a session that holds at most one `RefreshTimer` can never have
/// two live timers.
#[derive(Debug)]
pub(crate) struct RefreshTimer {
    surface: DisplaySurface,
    interval: Interval,
}

impl RefreshTimer {
    /// Starts a timer whose first tick is one `period` from now.
    pub(crate) fn start(surface: DisplaySurface, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { surface, interval }
    }

    pub(crate) fn surface(&self) -> DisplaySurface {
        self.surface
    }

    /// Waits for the next tick.
    pub(crate) async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let start = Instant::now();
        let mut timer = RefreshTimer::start(DisplaySurface::Main, Duration::from_secs(1));

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let timer = RefreshTimer::start(DisplaySurface::Expanded, Duration::ZERO);
        assert_eq!(timer.interval.period(), MIN_PERIOD);
        assert_eq!(timer.surface(), DisplaySurface::Expanded);
    }
}
