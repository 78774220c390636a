//! Drawing-surface contract.
//!
//! A [`Surface`] is handed to the render thread exactly once and consumed
//! when its [`DrawContext`] is acquired. The engine only ever talks to the
//! context through [`DrawOp`] values, which keeps card painting a pure
//! function that tests can inspect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Text role, mapped to font size and weight by the context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Label,
    Value,
    Unit,
}

/// A single drawing primitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Reset a region to transparent.
    Clear { rect: Rect },
    /// Solid fill.
    Fill { rect: Rect, color: Color },
    /// Text with its top-left anchor at (`x`, `y`).
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
        color: Color,
    },
}

/// Errors raised while acquiring a drawing context.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("drawing context unavailable: {0}")]
    Unavailable(String),

    #[error("surface I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An exclusively-owned drawing target.
pub trait Surface: Send + 'static {
    /// Acquire the 2D drawing context, consuming the surface.
    fn acquire_context(self: Box<Self>) -> Result<Box<dyn DrawContext>, SurfaceError>;
}

/// The drawing interface the render engine paints through.
pub trait DrawContext: Send {
    /// Size the backing store in physical pixels.
    fn resize(&mut self, width_px: u32, height_px: u32);

    /// Map logical pixels to physical pixels.
    fn set_scale(&mut self, pixel_ratio: f64);

    fn draw(&mut self, op: &DrawOp);

    /// Flush a frame's worth of drawing to the output.
    fn present(&mut self) {}
}
