//! pulseboard-ingest — the ingest/UI side of the pipeline.
//!
//! Decodes producer payloads, accumulates them between display frames, and
//! forwards one batch per frame to the render thread.
//!
//! # Architecture
//!
//! ```text
//! producer bytes
//!   └── Ingestor.ingest() ── decode_payload() ──► MetricBuffer.add()
//!                      (malformed: warn + drop)         │
//!                                                       ▼
//! FrameClock.next_frame() ──► FrameScheduler.tick() ── drain_all()
//!                                   │
//!                                   └── RenderRequest::BatchUpdate ──► render thread
//! ```
//!
//! The channel towards the render thread is unbounded and fire-and-forget:
//! the ingest side never waits for the renderer.

pub mod buffer;
pub mod decode;
pub mod error;
pub mod scheduler;
pub mod source;

pub use buffer::MetricBuffer;
pub use decode::{decode_payload, validate_payload, Ingestor};
pub use error::{DecodeError, DecodeResult};
pub use pulseboard_core::clock::{FrameClock, IntervalClock};
pub use scheduler::{FrameScheduler, RenderSender};
pub use source::read_lines;
