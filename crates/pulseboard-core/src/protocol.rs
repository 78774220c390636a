//! Render protocol — the messages exchanged between the ingest side and the
//! render thread.
//!
//! Every message owns its data. Nothing is shared by reference across the
//! boundary: the catalog is cloned into `Init`, payload batches are moved,
//! and the surface itself changes hands exactly once.

use std::fmt;

use crate::catalog::MetricCatalog;
use crate::surface::Surface;
use crate::types::{DebugStats, MetricPayload};

/// Ingest → render.
pub enum RenderRequest {
    /// Sent once; transfers exclusive ownership of the surface.
    Init {
        surface: Box<dyn Surface>,
        catalog: MetricCatalog,
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    /// Viewport change. Forces a full redraw on the next frame.
    Resize {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    /// Everything drained from the metric buffer in one ingest frame.
    BatchUpdate { updates: Vec<MetricPayload> },
    /// Dashboard dismissed; release the surface and stop the frame loop.
    Teardown,
}

/// Message tag, used to key the render thread's handler table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Init,
    Resize,
    BatchUpdate,
    Teardown,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Init => "init",
            RequestKind::Resize => "resize",
            RequestKind::BatchUpdate => "batch_update",
            RequestKind::Teardown => "teardown",
        }
    }
}

impl RenderRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            RenderRequest::Init { .. } => RequestKind::Init,
            RenderRequest::Resize { .. } => RequestKind::Resize,
            RenderRequest::BatchUpdate { .. } => RequestKind::BatchUpdate,
            RenderRequest::Teardown => RequestKind::Teardown,
        }
    }
}

impl fmt::Debug for RenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderRequest::Init {
                catalog,
                width,
                height,
                pixel_ratio,
                ..
            } => f
                .debug_struct("Init")
                .field("metrics", &catalog.len())
                .field("width", width)
                .field("height", height)
                .field("pixel_ratio", pixel_ratio)
                .finish_non_exhaustive(),
            RenderRequest::Resize {
                width,
                height,
                pixel_ratio,
            } => f
                .debug_struct("Resize")
                .field("width", width)
                .field("height", height)
                .field("pixel_ratio", pixel_ratio)
                .finish(),
            RenderRequest::BatchUpdate { updates } => f
                .debug_struct("BatchUpdate")
                .field("updates", &updates.len())
                .finish(),
            RenderRequest::Teardown => f.write_str("Teardown"),
        }
    }
}

/// Render → UI overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderReport {
    /// Sent every render frame. Display only; never fed back into scheduling.
    Debug(DebugStats),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let batch = RenderRequest::BatchUpdate {
            updates: vec![MetricPayload::new("speed", 1.0, 0)],
        };
        assert_eq!(batch.kind(), RequestKind::BatchUpdate);
        assert_eq!(RenderRequest::Teardown.kind(), RequestKind::Teardown);
        let resize = RenderRequest::Resize {
            width: 800.0,
            height: 600.0,
            pixel_ratio: 2.0,
        };
        assert_eq!(resize.kind().as_str(), "resize");
    }

    #[test]
    fn debug_output_summarizes_batches() {
        let batch = RenderRequest::BatchUpdate {
            updates: vec![MetricPayload::new("speed", 1.0, 0); 3],
        };
        assert_eq!(format!("{batch:?}"), "BatchUpdate { updates: 3 }");
    }
}
