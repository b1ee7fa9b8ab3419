// src/font.rs

//! Font metrics consumed by the composition pipeline.
//!
//! Atlas construction and image loading live outside this crate; the pipeline
//! only needs to map a glyph index to a source rectangle in the atlas, know
//! the flat-filled "solid" glyph used to paint rectangles cheaply, and know
//! the pixel size of one cell.

use std::sync::Arc;

use log::warn;
use once_cell::sync::Lazy;

use crate::geometry::PixelRect;

/// Glyph metric lookup for a monospaced glyph atlas.
pub trait Font: Send + Sync {
    /// Source rectangle of `glyph` inside the atlas image.
    fn glyph_source_rect(&self, glyph: u16) -> PixelRect;

    /// Source rectangle of the flat-filled glyph, used to draw solid
    /// rectangles with the same texture as regular glyphs.
    fn solid_glyph_rect(&self) -> PixelRect;

    /// Pixel size of a single cell: `(width, height)`.
    fn cell_size(&self) -> (u32, u32);
}

/// Metrics for a fixed-grid atlas: `glyph_count` glyphs laid out left to
/// right, top to bottom, `columns` per row, every glyph `cell_width` x
/// `cell_height` pixels.
#[derive(Debug, Clone)]
pub struct AtlasFont {
    columns: u32,
    glyph_count: u32,
    cell_width: u32,
    cell_height: u32,
    solid_glyph: u16,
}

impl AtlasFont {
    pub fn new(
        columns: u32,
        glyph_count: u32,
        cell_width: u32,
        cell_height: u32,
        solid_glyph: u16,
    ) -> Self {
        assert!(columns > 0, "atlas must have at least one column");
        assert!(glyph_count > 0, "atlas must contain at least one glyph");
        assert!(
            cell_width > 0 && cell_height > 0,
            "glyph cells must be non-empty"
        );
        Self {
            columns,
            glyph_count,
            cell_width,
            cell_height,
            solid_glyph,
        }
    }
}

impl Font for AtlasFont {
    fn glyph_source_rect(&self, glyph: u16) -> PixelRect {
        let mut index = u32::from(glyph);
        if index >= self.glyph_count {
            warn!(
                "glyph {} is outside the atlas ({} glyphs); substituting glyph 0",
                glyph, self.glyph_count
            );
            index = 0;
        }
        let col = index % self.columns;
        let row = index / self.columns;
        PixelRect::new(
            (col * self.cell_width) as i32,
            (row * self.cell_height) as i32,
            self.cell_width,
            self.cell_height,
        )
    }

    fn solid_glyph_rect(&self) -> PixelRect {
        self.glyph_source_rect(self.solid_glyph)
    }

    fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }
}

/// Classic 8x16 code-page layout: 256 glyphs, 16 per row, glyph 219 is the
/// full block.
static BUILTIN_FONT: Lazy<Arc<AtlasFont>> =
    Lazy::new(|| Arc::new(AtlasFont::new(16, 256, 8, 16, 219)));

/// Returns the built-in default font metrics.
pub fn default_font() -> Arc<AtlasFont> {
    Arc::clone(&BUILTIN_FONT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_rects_walk_the_atlas_grid() {
        let font = AtlasFont::new(16, 256, 8, 16, 219);
        assert_eq!(font.glyph_source_rect(0), PixelRect::new(0, 0, 8, 16));
        // Glyph 17 sits at column 1, row 1.
        assert_eq!(font.glyph_source_rect(17), PixelRect::new(8, 16, 8, 16));
        assert_eq!(font.cell_size(), (8, 16));
    }

    #[test]
    fn out_of_range_glyph_falls_back_to_zero() {
        let font = AtlasFont::new(16, 256, 8, 16, 219);
        assert_eq!(font.glyph_source_rect(999), font.glyph_source_rect(0));
    }

    #[test]
    fn solid_glyph_rect_matches_its_index() {
        let font = default_font();
        assert_eq!(font.solid_glyph_rect(), font.glyph_source_rect(219));
    }
}
