//! pulseboard-core — shared contracts for the Pulseboard pipeline.
//!
//! Everything that crosses a crate or thread boundary lives here: metric
//! descriptors and payloads, the render protocol, the drawing-surface
//! contract, and the dashboard configuration.
//!
//! # Architecture
//!
//! ```text
//! producer ──► MetricPayload ──► (ingest) ──► RenderRequest::BatchUpdate
//!                                                   │
//!                                   render thread ◄─┘
//!                                   Surface → DrawContext ← DrawOp
//!                                                   │
//!                 DebugOverlay ◄── RenderReport::Debug(DebugStats)
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod protocol;
pub mod surface;
pub mod types;

pub use catalog::MetricCatalog;
pub use clock::{FrameClock, IntervalClock};
pub use config::DashboardConfig;
pub use error::{CatalogError, ConfigError, ConfigResult};
pub use protocol::{RenderReport, RenderRequest, RequestKind};
pub use surface::{Color, DrawContext, DrawOp, Rect, Surface, SurfaceError, TextStyle};
pub use types::*;
