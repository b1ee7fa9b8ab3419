// src/surface.rs

//! The [`Surface`]: a 2D grid of cells plus a renderable view rectangle.
//!
//! Random-access cell reads and writes validate their coordinates and panic
//! on out-of-range input; the checked `try_*` variants return `Option`/
//! `Result` instead. High-level shape operations (`print`, `fill`,
//! `draw_box`) clamp their target region to the grid instead of erroring,
//! because partially-offscreen shapes are expected, supported usage.
//!
//! Every mutation sets the dirty flag; the renderer clears it once all steps
//! have refreshed.

use log::trace;

use crate::cell::Cell;
use crate::color::{Color, Rgba};
use crate::error::RenderError;
use crate::font::Font;
use crate::geometry::{CellRect, Point};

/// A 2D array of [`Cell`]s with a view rectangle, default colors, an overlay
/// tint, and a dirty flag.
///
/// Invariants: `cells.len() == width * height` always, and the view rectangle
/// is always fully contained in `[0,width) x [0,height)`.
#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    view: CellRect,
    default_foreground: Color,
    default_background: Color,
    tint: Rgba,
    dirty: bool,
}

impl Surface {
    /// Creates a grid of default cells (glyph 0 in the default colors) with
    /// the view covering the whole grid.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_colors(width, height, Color::WHITE, Color::BLACK)
    }

    /// Like [`Surface::new`] with explicit default colors.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn with_colors(
        width: usize,
        height: usize,
        default_foreground: Color,
        default_background: Color,
    ) -> Self {
        assert!(
            width > 0 && height > 0,
            "surface dimensions must be non-zero, got {}x{}",
            width,
            height
        );
        let blank = Cell::new(0, default_foreground, default_background);
        Self {
            width,
            height,
            cells: vec![blank; width * height],
            view: CellRect::new(0, 0, width, height),
            default_foreground,
            default_background,
            tint: Rgba::TRANSPARENT,
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn default_foreground(&self) -> Color {
        self.default_foreground
    }

    pub fn default_background(&self) -> Color {
        self.default_background
    }

    pub fn set_default_colors(&mut self, foreground: Color, background: Color) {
        self.default_foreground = foreground;
        self.default_background = background;
        self.dirty = true;
    }

    /// The overlay tint blended over the composed output. Alpha 0 disables
    /// it; alpha 255 covers the surface entirely.
    pub fn tint(&self) -> Rgba {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Rgba) {
        self.tint = tint;
        self.dirty = true;
    }

    /// The sub-region of the grid that is actually rendered.
    pub fn view(&self) -> CellRect {
        self.view
    }

    /// Sets the view rectangle, clamping it into grid bounds. An empty
    /// result falls back to the full grid.
    pub fn set_view(&mut self, view: CellRect) {
        let clamped = view.clamped_to(self.width, self.height);
        self.view = if clamped.is_empty() {
            trace!("view {:?} clamped to empty; using the full grid", view);
            CellRect::new(0, 0, self.width, self.height)
        } else {
            clamped
        };
        self.dirty = true;
    }

    /// Pixel size of the whole grid under `font`: `(width * cell_width,
    /// height * cell_height)`.
    pub fn pixel_size(&self, font: &dyn Font) -> (u32, u32) {
        let (cw, ch) = font.cell_size();
        (self.width as u32 * cw, self.height as u32 * ch)
    }

    fn flat_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Reads the cell at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        match self.try_cell(x, y) {
            Some(cell) => cell,
            None => panic!(
                "cell ({}, {}) is outside the {}x{} grid",
                x, y, self.width, self.height
            ),
        }
    }

    /// Reads the cell at flat `index` (row-major).
    ///
    /// # Panics
    /// Panics if `index >= cell_count()`.
    pub fn cell_at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Mutable access to the cell at `(x, y)`. Sets the dirty flag, since
    /// the caller is assumed to mutate.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the grid.
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        let index = self.flat_index(x, y);
        self.dirty = true;
        &mut self.cells[index]
    }

    /// Checked read: `None` when `(x, y)` is outside the grid.
    pub fn try_cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[self.flat_index(x, y)])
        } else {
            None
        }
    }

    /// Writes the cell at `(x, y)` and sets the dirty flag.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        let index = self.flat_index(x, y);
        self.cells[index] = cell;
        self.dirty = true;
    }

    /// Checked write; reports [`RenderError::Bounds`] instead of panicking.
    pub fn try_set_cell(&mut self, x: usize, y: usize, cell: Cell) -> Result<(), RenderError> {
        if x < self.width && y < self.height {
            let index = self.flat_index(x, y);
            self.cells[index] = cell;
            self.dirty = true;
            Ok(())
        } else {
            Err(RenderError::Bounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Prints `text` starting at `(x, y)`, wrapping at the right edge and
    /// stopping at the end of the grid. `None` colors use the surface
    /// defaults. Out-of-range start positions are clamped away (no error).
    pub fn print(&mut self, x: usize, y: usize, text: &str, fg: Option<Color>, bg: Option<Color>) {
        if y >= self.height {
            return;
        }
        let fg = fg.unwrap_or(self.default_foreground);
        let bg = bg.unwrap_or(self.default_background);
        let mut index = self.flat_index(x.min(self.width - 1), y);
        if x >= self.width {
            // Starting past the right edge begins on the next row.
            index = self.flat_index(0, y) + self.width;
        }
        for ch in text.chars() {
            if index >= self.cells.len() {
                break;
            }
            let glyph = u16::try_from(ch as u32).unwrap_or(0);
            self.cells[index] = Cell::new(glyph, fg, bg);
            index += 1;
        }
        self.dirty = true;
    }

    /// Fills a rectangular region, clamped to grid bounds. `None` fields
    /// leave the existing value in place.
    pub fn fill(
        &mut self,
        area: CellRect,
        glyph: Option<u16>,
        fg: Option<Color>,
        bg: Option<Color>,
    ) {
        let area = area.clamped_to(self.width, self.height);
        if area.is_empty() {
            return;
        }
        for p in area.iter_points() {
            let index = p.y * self.width + p.x;
            let cell = &mut self.cells[index];
            if let Some(glyph) = glyph {
                cell.glyph = glyph;
            }
            if let Some(fg) = fg {
                cell.foreground = fg;
            }
            if let Some(bg) = bg {
                cell.background = bg;
            }
        }
        self.dirty = true;
    }

    /// Resets every cell to glyph 0 in the default colors.
    pub fn clear(&mut self) {
        let blank = Cell::new(0, self.default_foreground, self.default_background);
        self.cells.fill(blank);
        self.dirty = true;
    }

    /// Resets a region to glyph 0 in the default colors, clamped to bounds.
    pub fn clear_area(&mut self, area: CellRect) {
        self.fill(
            area,
            Some(0),
            Some(self.default_foreground),
            Some(self.default_background),
        );
    }

    /// Draws a one-cell-thick box border, clamped to grid bounds. A
    /// partially-offscreen box draws only its visible edges.
    pub fn draw_box(&mut self, area: CellRect, border: Cell) {
        let clamped = area.clamped_to(self.width, self.height);
        if clamped.is_empty() {
            return;
        }
        for p in clamped.iter_points() {
            let on_border = p.x == area.x
                || p.y == area.y
                || p.x + 1 == area.right()
                || p.y + 1 == area.bottom();
            if on_border {
                let index = p.y * self.width + p.x;
                self.cells[index] = border;
            }
        }
        self.dirty = true;
    }

    /// Resizes the grid. Cells inside the overlap of the old and new extents
    /// keep their appearance; all other cells become glyph 0 in the default
    /// colors. The view is re-clamped into the new bounds.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        assert!(
            new_width > 0 && new_height > 0,
            "surface dimensions must be non-zero, got {}x{}",
            new_width,
            new_height
        );
        if new_width == self.width && new_height == self.height {
            return;
        }
        let blank = Cell::new(0, self.default_foreground, self.default_background);
        let mut cells = vec![blank; new_width * new_height];
        let keep_w = self.width.min(new_width);
        let keep_h = self.height.min(new_height);
        for y in 0..keep_h {
            for x in 0..keep_w {
                cells[y * new_width + x] = self.cells[y * self.width + x];
            }
        }
        trace!(
            "surface resized {}x{} -> {}x{}",
            self.width,
            self.height,
            new_width,
            new_height
        );
        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
        let view = self.view;
        self.set_view(view);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
