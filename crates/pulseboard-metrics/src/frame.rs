//! Instantaneous frame rate from consecutive frame timestamps.

/// Derives fps as `1000 / (now - last_frame)`.
#[derive(Debug, Clone, Default)]
pub struct FrameRate {
    last_frame_ms: Option<f64>,
}

impl FrameRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms` and return the instantaneous rate.
    ///
    /// The first frame, and a frame with a non-positive delta, report 0.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let fps = match self.last_frame_ms {
            Some(last) if now_ms > last => 1000.0 / (now_ms - last),
            _ => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        fps
    }

    pub fn last_frame_ms(&self) -> Option<f64> {
        self.last_frame_ms
    }

    /// Forget the previous frame, e.g. after the loop was paused.
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
    }
}
