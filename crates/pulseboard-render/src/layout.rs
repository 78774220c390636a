//! Fixed-column card grid geometry.
//!
//! ```text
//! card_width = (width - gap * (columns + 1)) / columns
//! cell i     = row i / columns, column i % columns
//! origin     = (gap + col * (card_width + gap), gap + row * (card_height + gap))
//! ```

use pulseboard_core::config::GridConfig;
use pulseboard_core::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub width: f64,
    pub height: f64,
    pub columns: u32,
    pub gap: f64,
    pub card_width: f64,
    pub card_height: f64,
}

impl GridLayout {
    pub fn compute(width: f64, height: f64, grid: &GridConfig) -> Self {
        let columns = grid.columns.max(1);
        let usable = width - grid.gap * (columns as f64 + 1.0);
        let card_width = (usable / columns as f64).max(0.0);
        Self {
            width,
            height,
            columns,
            gap: grid.gap,
            card_width,
            card_height: grid.card_height,
        }
    }

    /// (row, column) of the card at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        let columns = self.columns as usize;
        (index / columns, index % columns)
    }

    /// Bounding rectangle of the card at `index`.
    pub fn card_rect(&self, index: usize) -> Rect {
        let (row, col) = self.cell(index);
        Rect::new(
            self.gap + col as f64 * (self.card_width + self.gap),
            self.gap + row as f64 * (self.card_height + self.gap),
            self.card_width,
            self.card_height,
        )
    }

    /// The whole viewport.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Rows needed for `count` cards.
    pub fn rows_for(&self, count: usize) -> usize {
        count.div_ceil(self.columns as usize)
    }
}
