//! Character-cell terminal surface.
//!
//! Each cell covers `CELL_WIDTH x CELL_HEIGHT` logical pixels. Fills paint a
//! cell background, text paints glyphs left to right from its anchor cell.
//! `present()` homes the cursor and rewrites the whole grid with 24-bit
//! colors through crossterm.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use pulseboard_core::{Color, DrawContext, DrawOp, Rect, Surface, SurfaceError};
use tracing::{trace, warn};

pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;

fn term_color(color: Color) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: Color::rgb(255, 255, 255),
            bg: Color::rgb(0, 0, 0),
        }
    }
}

/// A surface backed by any byte sink, normally stdout.
pub struct TerminalSurface {
    writer: Box<dyn Write + Send>,
}

impl TerminalSurface {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl Surface for TerminalSurface {
    fn acquire_context(self: Box<Self>) -> Result<Box<dyn DrawContext>, SurfaceError> {
        let mut writer = self.writer;
        queue!(writer, Clear(ClearType::All), Hide)?;
        writer.flush()?;
        Ok(Box::new(TerminalContext {
            writer,
            width_px: 0,
            height_px: 0,
            scale: 1.0,
            columns: 0,
            rows: 0,
            cells: Vec::new(),
            broken: false,
        }))
    }
}

pub struct TerminalContext {
    writer: Box<dyn Write + Send>,
    width_px: u32,
    height_px: u32,
    scale: f64,
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
    broken: bool,
}

impl TerminalContext {
    fn rebuild(&mut self) {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        self.columns = (self.width_px as f64 / scale / CELL_WIDTH).ceil() as usize;
        self.rows = (self.height_px as f64 / scale / CELL_HEIGHT).ceil() as usize;
        self.cells = vec![Cell::default(); self.columns * self.rows];
    }

    /// Cell span covered by a rectangle, clipped to the grid.
    fn span(&self, rect: &Rect) -> (usize, usize, usize, usize) {
        let clip = |v: f64, cell: f64, max: usize| ((v / cell).floor().max(0.0) as usize).min(max);
        let clip_end = |v: f64, cell: f64, max: usize| ((v / cell).ceil().max(0.0) as usize).min(max);
        (
            clip(rect.x, CELL_WIDTH, self.columns),
            clip(rect.y, CELL_HEIGHT, self.rows),
            clip_end(rect.right(), CELL_WIDTH, self.columns),
            clip_end(rect.bottom(), CELL_HEIGHT, self.rows),
        )
    }

    fn paint(&mut self, rect: &Rect, f: impl Fn(&mut Cell)) {
        let (x0, y0, x1, y1) = self.span(rect);
        for row in y0..y1 {
            for col in x0..x1 {
                f(&mut self.cells[row * self.columns + col]);
            }
        }
    }

    /// The cell at (column, row), if inside the grid.
    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Text content of one row, trailing blanks removed.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.columns;
        self.cells[start..start + self.columns]
            .iter()
            .map(|c| c.glyph)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn write_frame(&mut self) -> io::Result<()> {
        let mut out = Vec::with_capacity(self.cells.len() * 4);
        queue!(out, MoveTo(0, 0))?;
        for row in 0..self.rows {
            let mut current: Option<(Color, Color)> = None;
            for cell in &self.cells[row * self.columns..(row + 1) * self.columns] {
                if current != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(term_color(cell.fg)),
                        SetBackgroundColor(term_color(cell.bg))
                    )?;
                    current = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.glyph))?;
            }
            queue!(out, ResetColor, Print("\r\n"))?;
        }
        self.writer.write_all(&out)?;
        self.writer.flush()
    }
}

impl DrawContext for TerminalContext {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.width_px = width_px;
        self.height_px = height_px;
        self.rebuild();
    }

    fn set_scale(&mut self, pixel_ratio: f64) {
        self.scale = pixel_ratio;
        self.rebuild();
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Clear { rect } => self.paint(rect, |cell| *cell = Cell::default()),
            DrawOp::Fill { rect, color } => {
                let color = *color;
                self.paint(rect, move |cell| {
                    cell.bg = color;
                    cell.glyph = ' ';
                })
            }
            DrawOp::Text { x, y, text, color, .. } => {
                if *x < 0.0 || *y < 0.0 {
                    return;
                }
                let row = (*y / CELL_HEIGHT).floor() as usize;
                let col = (*x / CELL_WIDTH).floor() as usize;
                if row >= self.rows {
                    return;
                }
                for (offset, glyph) in text.chars().enumerate() {
                    let column = col + offset;
                    if column >= self.columns {
                        break;
                    }
                    let cell = &mut self.cells[row * self.columns + column];
                    cell.glyph = glyph;
                    cell.fg = *color;
                }
            }
        }
    }

    fn present(&mut self) {
        if self.broken {
            return;
        }
        if let Err(e) = self.write_frame() {
            warn!(error = %e, "terminal write failed; further frames discarded");
            self.broken = true;
        }
    }
}

impl Drop for TerminalContext {
    fn drop(&mut self) {
        if self.broken {
            return;
        }
        let restored = queue!(self.writer, ResetColor, Show, Print("\r\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = restored {
            trace!(error = %e, "cannot restore terminal cursor");
        }
    }
}
