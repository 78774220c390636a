//! Handler table keyed by request kind.

use std::collections::HashMap;

use pulseboard_core::{RenderRequest, RequestKind};
use tracing::{trace, warn};

use crate::engine::RenderEngine;
use crate::error::RenderResult;

/// Whether the render loop keeps going after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

type Handler = fn(&mut RenderEngine, RenderRequest, f64) -> RenderResult<Flow>;

pub struct Dispatcher {
    handlers: HashMap<RequestKind, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut handlers: HashMap<RequestKind, Handler> = HashMap::new();
        handlers.insert(RequestKind::Init, handle_init);
        handlers.insert(RequestKind::Resize, handle_resize);
        handlers.insert(RequestKind::BatchUpdate, handle_batch);
        handlers.insert(RequestKind::Teardown, handle_teardown);
        Self { handlers }
    }

    /// Route one request to its handler.
    ///
    /// `now_ms` is the render thread's wall clock, used for latency samples.
    pub fn dispatch(
        &self,
        engine: &mut RenderEngine,
        request: RenderRequest,
        now_ms: f64,
    ) -> RenderResult<Flow> {
        let kind = request.kind();
        match self.handlers.get(&kind) {
            Some(handler) => handler(engine, request, now_ms),
            None => {
                warn!(kind = kind.as_str(), "no handler registered; request dropped");
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handles(&self, kind: RequestKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn handle_init(engine: &mut RenderEngine, request: RenderRequest, _now_ms: f64) -> RenderResult<Flow> {
    if let RenderRequest::Init {
        surface,
        catalog,
        width,
        height,
        pixel_ratio,
    } = request
    {
        engine.init(surface, catalog, width, height, pixel_ratio)?;
    }
    Ok(Flow::Continue)
}

fn handle_resize(engine: &mut RenderEngine, request: RenderRequest, _now_ms: f64) -> RenderResult<Flow> {
    if let RenderRequest::Resize {
        width,
        height,
        pixel_ratio,
    } = request
    {
        engine.resize(width, height, pixel_ratio);
    }
    Ok(Flow::Continue)
}

fn handle_batch(engine: &mut RenderEngine, request: RenderRequest, now_ms: f64) -> RenderResult<Flow> {
    if let RenderRequest::BatchUpdate { updates } = request {
        trace!(count = updates.len(), "applying batch");
        engine.apply_batch(updates, now_ms);
    }
    Ok(Flow::Continue)
}

fn handle_teardown(engine: &mut RenderEngine, _request: RenderRequest, _now_ms: f64) -> RenderResult<Flow> {
    engine.teardown();
    Ok(Flow::Stop)
}
