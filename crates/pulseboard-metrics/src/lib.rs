//! pulseboard-metrics — live diagnostics for the render pipeline.
//!
//! Tracks publish-to-render latency over a sliding window, derives frame
//! rate from consecutive frame timestamps, and keeps the UI-side copy of
//! the render thread's debug statistics.
//!
//! # Architecture
//!
//! ```text
//! render thread
//!   ├── LatencyTracker.observe() ← one sample per applied update
//!   ├── LatencyTracker.quantile(0.5 / 0.95) → DebugStats
//!   └── FrameRate.tick(now) → fps
//!
//! ingest/UI side
//!   └── DebugOverlay.apply(DebugStats) → line()
//! ```

pub mod frame;
pub mod latency;
pub mod overlay;

pub use frame::FrameRate;
pub use latency::LatencyTracker;
pub use overlay::DebugOverlay;
