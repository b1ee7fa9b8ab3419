// src/geometry.rs

//! Grid-space and pixel-space rectangles.
//!
//! [`Point`] and [`CellRect`] address character cells (0-based, `usize`);
//! [`PixelRect`] addresses pixels inside a texture or the screen.

use serde::{Deserialize, Serialize};

/// A 2D point in cell coordinates (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A rectangular area of cells. `width`/`height` are in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the rightmost column.
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom row.
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Intersects this rectangle with a `width`x`height` grid anchored at the
    /// origin. The result may be empty.
    pub fn clamped_to(&self, width: usize, height: usize) -> CellRect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        CellRect {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    /// Iterates the contained cell positions in row-major order.
    pub fn iter_points(&self) -> impl Iterator<Item = Point> + '_ {
        let rect = *self;
        (rect.y..rect.bottom())
            .flat_map(move |y| (rect.x..rect.right()).map(move |x| Point::new(x, y)))
    }
}

/// A rectangular area of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
