//! Concrete drawing surfaces.

pub mod recording;
pub mod terminal;

pub use recording::RecordingSurface;
pub use terminal::TerminalSurface;
