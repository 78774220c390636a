//! Debug overlay — the UI-side view of render diagnostics.
//!
//! Holds the most recent [`DebugStats`] reported by the render thread. The
//! stats are display-only and never feed back into scheduling.

use pulseboard_core::{DebugStats, RenderReport};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    stats: DebugStats,
    reports: u64,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take in one report from the render thread.
    pub fn handle(&mut self, report: RenderReport) {
        match report {
            RenderReport::Debug(stats) => self.apply(&stats),
        }
    }

    /// Overwrite the displayed stats field by field.
    pub fn apply(&mut self, stats: &DebugStats) {
        self.stats.update_from(stats);
        self.reports += 1;
    }

    pub fn stats(&self) -> &DebugStats {
        &self.stats
    }

    /// Number of reports received since creation.
    pub fn reports(&self) -> u64 {
        self.reports
    }

    /// One-line rendering, e.g. `fps 60.0 | render 0.42 ms | latency p50 12.0 ms p95 31.5 ms`.
    pub fn line(&self) -> String {
        format!(
            "fps {:.1} | render {:.2} ms | latency p50 {:.1} ms p95 {:.1} ms",
            self.stats.fps, self.stats.render_ms, self.stats.latency_p50, self.stats.latency_p95
        )
    }

    /// Emit the current stats as a structured log line.
    pub fn log(&self) {
        info!(
            fps = self.stats.fps,
            render_ms = self.stats.render_ms,
            latency_p50_ms = self.stats.latency_p50,
            latency_p95_ms = self.stats.latency_p95,
            reports = self.reports,
            "render diagnostics"
        );
    }
}
