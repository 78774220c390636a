//! Latency tracker — sliding window of publish-to-render deltas.
//!
//! The window has a fixed capacity and evicts oldest-first. Quantiles are
//! recomputed from a sorted copy on every call, which is cheap because the
//! window is small and bounded.

use std::collections::VecDeque;

/// Default number of samples retained.
pub const DEFAULT_WINDOW: usize = 360;

/// Bounded FIFO window of latency samples in milliseconds.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyTracker {
    /// Create a tracker retaining at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting from the front while over capacity.
    pub fn observe(&mut self, delta_ms: f64) {
        self.samples.push_back(delta_ms);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Linearly interpolated order statistic over the current window.
    ///
    /// `q` is clamped to `[0, 1]`. Returns 0.0 for an empty window.
    pub fn quantile(&self, q: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_unstable_by(f64::total_cmp);

        let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
        let idx = (sorted.len() - 1) as f64 * q;
        let lo = idx.floor() as usize;
        let hi = idx.ceil() as usize;

        if lo == hi {
            return sorted[lo];
        }
        let frac = idx - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }

    pub fn p50(&self) -> f64 {
        self.quantile(0.5)
    }

    pub fn p95(&self) -> f64 {
        self.quantile(0.95)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples in arrival order, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
