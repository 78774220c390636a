//! Frame scheduler — drains the metric buffer once per display frame.
//!
//! The cadence comes from a [`FrameClock`], the "on next frame" primitive
//! the host supplies. `tick()` is the whole per-frame step and is
//! synchronous, so tests drive it directly without a clock.

use pulseboard_core::RenderRequest;
use pulseboard_core::clock::FrameClock;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use crate::buffer::MetricBuffer;

/// Sending half of the ingest → render channel.
pub type RenderSender = mpsc::UnboundedSender<RenderRequest>;

/// Drains [`MetricBuffer`] each frame and forwards one batch to the renderer.
pub struct FrameScheduler {
    buffer: MetricBuffer,
    channel: Option<RenderSender>,
    frames: u64,
    batches: u64,
    forwarded: u64,
}

impl FrameScheduler {
    pub fn new(buffer: MetricBuffer) -> Self {
        Self {
            buffer,
            channel: None,
            frames: 0,
            batches: 0,
            forwarded: 0,
        }
    }

    /// Attach the render channel. Until then drained payloads are discarded.
    pub fn with_channel(mut self, channel: RenderSender) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn attach(&mut self, channel: RenderSender) {
        self.channel = Some(channel);
    }

    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }

    /// One frame: drain the buffer and send the batch if there is one.
    ///
    /// Returns the number of payloads forwarded. Never waits on the renderer.
    pub fn tick(&mut self) -> usize {
        self.frames += 1;

        let updates = self.buffer.drain_all();
        if updates.is_empty() {
            return 0;
        }

        let Some(channel) = self.channel.as_ref() else {
            trace!(dropped = updates.len(), "no render channel; batch discarded");
            return 0;
        };

        let count = updates.len();
        if channel.send(RenderRequest::BatchUpdate { updates }).is_err() {
            warn!("render thread gone; detaching render channel");
            self.channel = None;
            return 0;
        }

        self.batches += 1;
        self.forwarded += count as u64;
        trace!(count, frame = self.frames, "batch forwarded");
        count
    }

    /// Run until the shutdown signal flips.
    pub async fn run<C: FrameClock>(
        &mut self,
        mut clock: C,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("frame scheduler started");

        loop {
            tokio::select! {
                _ = clock.next_frame() => {
                    self.tick();
                }
                _ = shutdown.changed() => {
                    info!("frame scheduler shutting down");
                    // Flush whatever arrived during the last frame.
                    self.tick();
                    break;
                }
            }
        }

        debug!(
            frames = self.frames,
            batches = self.batches,
            forwarded = self.forwarded,
            "frame scheduler stopped"
        );
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulseboard_core::MetricPayload;

    fn expect_batch(rx: &mut mpsc::UnboundedReceiver<RenderRequest>) -> Vec<MetricPayload> {
        match rx.try_recv() {
            Ok(RenderRequest::BatchUpdate { updates }) => updates,
            other => panic!("expected batch, got {other:?}"),
        }
    }

    #[test]
    fn empty_tick_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = FrameScheduler::new(MetricBuffer::new()).with_channel(tx);

        assert_eq!(scheduler.tick(), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(scheduler.frames(), 1);
        assert_eq!(scheduler.batches(), 0);
    }

    #[test]
    fn tick_sends_single_batch_in_arrival_order() {
        let buffer = MetricBuffer::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = FrameScheduler::new(buffer.clone()).with_channel(tx);

        buffer.add(MetricPayload::new("speed", 1.0, 1));
        buffer.add(MetricPayload::new("rpm", 2.0, 2));
        buffer.add(MetricPayload::new("speed", 3.0, 3));

        assert_eq!(scheduler.tick(), 3);
        let updates = expect_batch(&mut rx);
        let values: Vec<f64> = updates.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        // Exactly one message per frame.
        assert!(rx.try_recv().is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn unattached_scheduler_still_drains() {
        let buffer = MetricBuffer::new();
        let mut scheduler = FrameScheduler::new(buffer.clone());
        buffer.add(MetricPayload::new("speed", 1.0, 1));

        assert_eq!(scheduler.tick(), 0);
        assert!(buffer.is_empty());
        assert!(!scheduler.is_attached());
    }

    #[test]
    fn closed_channel_detaches() {
        let buffer = MetricBuffer::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut scheduler = FrameScheduler::new(buffer.clone()).with_channel(tx);
        drop(rx);

        buffer.add(MetricPayload::new("speed", 1.0, 1));
        assert_eq!(scheduler.tick(), 0);
        assert!(!scheduler.is_attached());
    }

    struct CountingClock {
        remaining: usize,
        shutdown: Option<watch::Sender<bool>>,
    }

    impl FrameClock for CountingClock {
        async fn next_frame(&mut self) {
            if self.remaining == 0 {
                if let Some(tx) = self.shutdown.take() {
                    let _ = tx.send(true);
                }
                std::future::pending::<()>().await;
            }
            self.remaining -= 1;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn run_ticks_until_shutdown_and_flushes() {
        let buffer = MetricBuffer::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut scheduler = FrameScheduler::new(buffer.clone()).with_channel(tx);

        buffer.add(MetricPayload::new("speed", 1.0, 1));
        let clock = CountingClock {
            remaining: 3,
            shutdown: Some(shutdown_tx),
        };
        scheduler.run(clock, shutdown_rx).await;

        // Three clock frames plus the flush on shutdown.
        assert_eq!(scheduler.frames(), 4);
        assert_eq!(expect_batch(&mut rx).len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
