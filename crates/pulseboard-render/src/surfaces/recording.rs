//! Headless surface that records every drawing operation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pulseboard_core::{DrawContext, DrawOp, Surface, SurfaceError};

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<DrawOp>,
    size: Option<(u32, u32)>,
    scale: Option<f64>,
    presents: u64,
    acquired: bool,
    released: bool,
}

/// A surface whose context appends to a shared op log.
///
/// Clones share the log, so a caller can hand one clone to the render
/// thread and inspect what was painted through the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    shared: Arc<Mutex<Recording>>,
    unavailable: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose context can never be acquired.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            shared: Arc::default(),
            unavailable: Some(reason.into()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and return everything painted so far.
    pub fn take_ops(&self) -> Vec<DrawOp> {
        std::mem::take(&mut self.lock().ops)
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.lock().ops.clone()
    }

    /// Backing-store size in physical pixels.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.lock().size
    }

    pub fn scale(&self) -> Option<f64> {
        self.lock().scale
    }

    pub fn presents(&self) -> u64 {
        self.lock().presents
    }

    pub fn is_acquired(&self) -> bool {
        self.lock().acquired
    }

    /// Whether the context was dropped by its owner.
    pub fn is_released(&self) -> bool {
        self.lock().released
    }
}

impl Surface for RecordingSurface {
    fn acquire_context(self: Box<Self>) -> Result<Box<dyn DrawContext>, SurfaceError> {
        if let Some(reason) = self.unavailable {
            return Err(SurfaceError::Unavailable(reason));
        }
        self.lock().acquired = true;
        Ok(Box::new(RecordingContext {
            shared: self.shared,
        }))
    }
}

struct RecordingContext {
    shared: Arc<Mutex<Recording>>,
}

impl RecordingContext {
    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DrawContext for RecordingContext {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.lock().size = Some((width_px, height_px));
    }

    fn set_scale(&mut self, pixel_ratio: f64) {
        self.lock().scale = Some(pixel_ratio);
    }

    fn draw(&mut self, op: &DrawOp) {
        self.lock().ops.push(op.clone());
    }

    fn present(&mut self) {
        self.lock().presents += 1;
    }
}

impl Drop for RecordingContext {
    fn drop(&mut self) {
        self.lock().released = true;
    }
}
