//! Render engine — owns the drawing context and repaints the card grid.
//!
//! ```text
//! Uninitialized ──init──► Ready ──frame──► Rendering ◄──frame── Resizing
//!                                              │                   ▲
//!                                              └──────resize───────┘
//! any ──teardown──► TornDown
//! ```
//!
//! Each frame is either a full redraw (after init or resize) or a partial
//! redraw of the cards whose metrics changed since the previous frame.
//! Everything except `init` is best-effort and never fails.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use pulseboard_core::config::GridConfig;
use pulseboard_core::{
    DebugStats, DrawContext, DrawOp, MetricCatalog, MetricId, MetricPayload, MetricRenderState,
    Surface,
};
use pulseboard_metrics::latency::DEFAULT_WINDOW;
use pulseboard_metrics::{FrameRate, LatencyTracker};
use tracing::{debug, info, trace};

use crate::card::{card_ops, CardTheme};
use crate::error::{RenderError, RenderResult};
use crate::layout::GridLayout;

/// Pixels added around a card when clearing it, to wipe antialiasing fringes.
/// Never more than half the grid gap, so a clear stays off neighbouring cards.
pub const CLEAR_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    Ready,
    Rendering,
    Resizing,
    TornDown,
}

impl EnginePhase {
    /// Whether the engine holds a drawing context.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            EnginePhase::Ready | EnginePhase::Rendering | EnginePhase::Resizing
        )
    }
}

/// What the last render pass painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawPass {
    /// Nothing changed.
    Idle,
    /// Only the listed number of dirty cards.
    Partial(usize),
    /// Background and every card.
    Full(usize),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub latency_window: usize,
    pub theme: CardTheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            latency_window: DEFAULT_WINDOW,
            theme: CardTheme::default(),
        }
    }
}

pub struct RenderEngine {
    config: EngineConfig,
    phase: EnginePhase,
    context: Option<Box<dyn DrawContext>>,
    layout: GridLayout,
    /// Grid order: catalog entries first, then ids first seen in a batch.
    order: Vec<MetricId>,
    states: HashMap<MetricId, MetricRenderState>,
    dirty: HashSet<MetricId>,
    full_redraw: bool,
    latency: LatencyTracker,
    frame_rate: FrameRate,
    stats: DebugStats,
    last_pass: RedrawPass,
    frames: u64,
}

impl RenderEngine {
    pub fn new(config: EngineConfig) -> Self {
        let layout = GridLayout::compute(0.0, 0.0, &config.grid);
        let latency = LatencyTracker::new(config.latency_window);
        Self {
            config,
            phase: EnginePhase::Uninitialized,
            context: None,
            layout,
            order: Vec::new(),
            states: HashMap::new(),
            dirty: HashSet::new(),
            full_redraw: false,
            latency,
            frame_rate: FrameRate::new(),
            stats: DebugStats::default(),
            last_pass: RedrawPass::Idle,
            frames: 0,
        }
    }

    /// Take ownership of the surface and prepare the first full redraw.
    ///
    /// Fails if the engine was already initialized or the surface cannot
    /// provide a drawing context. The latter is fatal: there is nothing to
    /// render to.
    pub fn init(
        &mut self,
        surface: Box<dyn Surface>,
        catalog: MetricCatalog,
        width: f64,
        height: f64,
        pixel_ratio: f64,
    ) -> RenderResult<()> {
        if self.phase != EnginePhase::Uninitialized {
            return Err(RenderError::AlreadyInitialized);
        }

        let context = surface.acquire_context()?;
        self.context = Some(context);

        self.order.clear();
        self.states.clear();
        for descriptor in catalog.iter() {
            self.order.push(descriptor.id.clone());
            self.states.insert(
                descriptor.id.clone(),
                MetricRenderState::seeded(descriptor.clone()),
            );
        }
        self.dirty = self.order.iter().cloned().collect();

        self.apply_geometry(width, height, pixel_ratio);
        self.phase = EnginePhase::Ready;

        info!(
            metrics = catalog.len(),
            width,
            height,
            pixel_ratio,
            columns = self.layout.columns,
            card_width = self.layout.card_width,
            "render engine initialized"
        );
        Ok(())
    }

    /// Recompute geometry for a new viewport and schedule a full redraw.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        if !self.phase.is_live() {
            debug!(phase = ?self.phase, "resize ignored");
            return;
        }
        self.apply_geometry(width, height, pixel_ratio);
        self.phase = EnginePhase::Resizing;
        debug!(width, height, pixel_ratio, "viewport resized");
    }

    fn apply_geometry(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.layout = GridLayout::compute(width, height, &self.config.grid);
        if let Some(ctx) = self.context.as_mut() {
            ctx.resize(
                (width * pixel_ratio).round().max(0.0) as u32,
                (height * pixel_ratio).round().max(0.0) as u32,
            );
            ctx.set_scale(pixel_ratio);
        }
        self.full_redraw = true;
    }

    /// Apply a batch of updates in order; the last update per metric wins.
    ///
    /// Every update records one latency sample of `now_ms - timestamp` and
    /// marks its metric dirty. Unknown metrics are accepted and appended to
    /// the grid after the catalog entries.
    pub fn apply_batch(&mut self, updates: Vec<MetricPayload>, now_ms: f64) {
        if !self.phase.is_live() {
            debug!(phase = ?self.phase, dropped = updates.len(), "batch ignored");
            return;
        }

        for update in updates {
            match self.states.get_mut(&update.metric) {
                Some(state) => {
                    state.value = update.value;
                    state.timestamp = update.timestamp;
                }
                None => {
                    debug!(metric = %update.metric, "new metric outside catalog");
                    self.order.push(update.metric.clone());
                    self.states.insert(
                        update.metric.clone(),
                        MetricRenderState::from_payload(&update),
                    );
                }
            }
            self.latency.observe(now_ms - update.timestamp as f64);
            self.dirty.insert(update.metric);
        }
    }

    /// Run one render pass and compute this frame's debug statistics.
    ///
    /// Returns `None` before init and after teardown.
    pub fn render_frame(&mut self, now_ms: f64) -> Option<DebugStats> {
        if !self.phase.is_live() {
            return None;
        }
        let started = Instant::now();

        self.last_pass = if self.full_redraw {
            self.redraw_all()
        } else if !self.dirty.is_empty() {
            self.redraw_dirty()
        } else {
            RedrawPass::Idle
        };
        self.full_redraw = false;
        self.dirty.clear();

        if self.last_pass != RedrawPass::Idle {
            if let Some(ctx) = self.context.as_mut() {
                ctx.present();
            }
        }

        let fps = self.frame_rate.tick(now_ms);
        self.stats = DebugStats {
            fps,
            render_ms: started.elapsed().as_secs_f64() * 1000.0,
            latency_p50: self.latency.p50(),
            latency_p95: self.latency.p95(),
        };
        self.phase = EnginePhase::Rendering;
        self.frames += 1;

        trace!(pass = ?self.last_pass, render_ms = self.stats.render_ms, "frame rendered");
        Some(self.stats)
    }

    fn redraw_all(&mut self) -> RedrawPass {
        let Some(ctx) = self.context.as_mut() else {
            return RedrawPass::Idle;
        };
        let bounds = self.layout.bounds();
        ctx.draw(&DrawOp::Clear { rect: bounds });
        ctx.draw(&DrawOp::Fill {
            rect: bounds,
            color: self.config.theme.background,
        });

        let mut painted = 0;
        for (index, id) in self.order.iter().enumerate() {
            if let Some(state) = self.states.get(id) {
                for op in card_ops(state, self.layout.card_rect(index), &self.config.theme) {
                    ctx.draw(&op);
                }
                painted += 1;
            }
        }
        RedrawPass::Full(painted)
    }

    fn redraw_dirty(&mut self) -> RedrawPass {
        let Some(ctx) = self.context.as_mut() else {
            return RedrawPass::Idle;
        };

        let margin = CLEAR_MARGIN.min(self.layout.gap / 2.0).max(0.0);
        let mut painted = 0;
        for (index, id) in self.order.iter().enumerate() {
            if !self.dirty.contains(id) {
                continue;
            }
            let Some(state) = self.states.get(id) else {
                continue;
            };
            let rect = self.layout.card_rect(index);
            let cleared = rect.inflate(margin);
            ctx.draw(&DrawOp::Clear { rect: cleared });
            ctx.draw(&DrawOp::Fill {
                rect: cleared,
                color: self.config.theme.background,
            });
            for op in card_ops(state, rect, &self.config.theme) {
                ctx.draw(&op);
            }
            painted += 1;
        }
        RedrawPass::Partial(painted)
    }

    /// Release the drawing context. No further frames are rendered.
    pub fn teardown(&mut self) {
        if self.phase == EnginePhase::TornDown {
            return;
        }
        self.context = None;
        self.dirty.clear();
        self.full_redraw = false;
        self.phase = EnginePhase::TornDown;
        info!(frames = self.frames, "render engine torn down");
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn state(&self, id: &str) -> Option<&MetricRenderState> {
        self.states.get(id)
    }

    /// Metric ids in grid order.
    pub fn order(&self) -> &[MetricId] {
        &self.order
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    pub fn full_redraw_pending(&self) -> bool {
        self.full_redraw
    }

    pub fn latency(&self) -> &LatencyTracker {
        &self.latency
    }

    pub fn stats(&self) -> &DebugStats {
        &self.stats
    }

    pub fn last_pass(&self) -> RedrawPass {
        self.last_pass
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
