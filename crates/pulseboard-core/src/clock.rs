//! "On next frame" clocks that both frame loops wait on.
//!
//! The ingest side and the render thread each own a clock; the two are not
//! phase-locked.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{Interval, MissedTickBehavior};

/// Resolves once per display frame.
pub trait FrameClock {
    fn next_frame(&mut self) -> impl Future<Output = ()> + Send;
}

/// A [`FrameClock`] backed by a tokio interval at a fixed refresh rate.
///
/// Missed ticks are skipped rather than replayed, so a stalled runtime
/// never produces a burst of back-to-back frames.
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    /// Must be called from within a tokio runtime.
    pub fn new(refresh_hz: u32) -> Self {
        let mut interval = tokio::time::interval(frame_period(refresh_hz));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Frame period for a refresh rate, treating 0 Hz as 1 Hz.
pub fn frame_period(refresh_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / refresh_hz.max(1) as f64)
}

/// Wall-clock milliseconds since the unix epoch, the same clock producers
/// stamp payloads with.
pub fn epoch_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
        * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period_for_sixty_hz() {
        let period = frame_period(60);
        assert!((period.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(frame_period(0), Duration::from_secs(1));
    }

    #[test]
    fn epoch_millis_is_after_2020() {
        assert!(epoch_millis() > 1_577_836_800_000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_clock_paces_frames() {
        let mut clock = IntervalClock::new(50);
        let start = tokio::time::Instant::now();
        // First tick completes immediately.
        clock.next_frame().await;
        clock.next_frame().await;
        clock.next_frame().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
