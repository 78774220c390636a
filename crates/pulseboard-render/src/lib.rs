//! pulseboard-render — the render side of the dashboard.
//!
//! Owns the drawing context on a dedicated thread, lays metrics out as a
//! fixed-column card grid, and repaints only the cards whose values
//! changed since the previous frame.
//!
//! # Architecture
//!
//! ```text
//! RenderRequest (mpsc) ──► RenderHost thread
//!                            └── run_render_loop (current-thread runtime)
//!                                  ├── FrameClock.next_frame()
//!                                  ├── Dispatcher: Init / Resize / BatchUpdate / Teardown
//!                                  ├── RenderEngine
//!                                  │     ├── GridLayout.card_rect(i)
//!                                  │     ├── dirty set → partial redraw
//!                                  │     └── card_ops → DrawContext
//!                                  └── RenderReport::Debug(DebugStats) (mpsc) ──► overlay
//! ```

pub mod card;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod host;
pub mod layout;
pub mod surfaces;

pub use card::{card_ops, format_value, CardTheme};
pub use dispatch::{Dispatcher, Flow};
pub use engine::{EngineConfig, EnginePhase, RedrawPass, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use host::{run_render_loop, HostConfig, RenderHost};
pub use layout::GridLayout;
pub use surfaces::{RecordingSurface, TerminalSurface};
