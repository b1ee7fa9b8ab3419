// src/draw.rs

//! Backend-agnostic draw primitives.
//!
//! A frame produces an ordered queue of [`DrawOp`]s. Queue order *is* visual
//! stacking order (painter's algorithm); a backend must preserve submission
//! order when flushing, even if it internally batches by texture. The
//! [`OrderingBand`] on each op is a batching hint only, never a substitute
//! for submission order.

use crate::backend::TextureId;
use crate::cell::Cell;
use crate::color::Rgba;
use crate::geometry::PixelRect;

/// Named stacking bands, bottom first.
///
/// These replace ad hoc per-call depth constants: any monotonic numeric
/// scheme may realize them, as long as the relative order is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderingBand {
    /// Whole-surface background fill.
    Background,
    /// Per-cell glyphs.
    Glyph,
    /// Composed layer blits and control chrome.
    Overlay,
    /// Cursor draws.
    Cursor,
    /// Entity-layer draws.
    Entity,
    /// The final blit of a renderer's composed output.
    OutputBlit,
    /// Modal/overlay tint, above everything.
    Tint,
}

impl OrderingBand {
    /// Monotonic depth value for backends that batch by depth.
    ///
    /// Valid for reordering only among ops composed into the same cached
    /// layer or output texture. In the presented screen batch, submission
    /// order is authoritative: the live cursor draw is submitted after the
    /// output blit even though `Cursor` sits below `OutputBlit` here (those
    /// two bands reflect composing-phase stacking).
    pub const fn depth(self) -> u8 {
        match self {
            OrderingBand::Background => 0,
            OrderingBand::Glyph => 1,
            OrderingBand::Overlay => 2,
            OrderingBand::Cursor => 3,
            OrderingBand::Entity => 4,
            OrderingBand::OutputBlit => 5,
            OrderingBand::Tint => 6,
        }
    }
}

/// A primitive draw description. Ephemeral: created during a frame, consumed
/// and discarded by the backend within the same frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// Draw one glyph cell into `rect`, optionally painting the cell
    /// background first (via the font's solid glyph).
    Glyph {
        cell: Cell,
        rect: PixelRect,
        draw_background: bool,
    },
    /// Fill `rect` with a flat color.
    SolidColor { color: Rgba, rect: PixelRect },
    /// Blit a texture at `position`, modulated by `tint`.
    Texture {
        texture: TextureId,
        position: (i32, i32),
        tint: Rgba,
    },
}

/// A queued draw: the primitive plus its stacking band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOp {
    pub band: OrderingBand,
    pub call: DrawCall,
}

impl DrawOp {
    pub fn new(band: OrderingBand, call: DrawCall) -> Self {
        Self { band, call }
    }

    /// True if this op blits a cached texture.
    pub fn is_texture_blit(&self) -> bool {
        matches!(self.call, DrawCall::Texture { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_depths_are_strictly_increasing() {
        let bands = [
            OrderingBand::Background,
            OrderingBand::Glyph,
            OrderingBand::Overlay,
            OrderingBand::Cursor,
            OrderingBand::Entity,
            OrderingBand::OutputBlit,
            OrderingBand::Tint,
        ];
        for pair in bands.windows(2) {
            assert!(pair[0].depth() < pair[1].depth());
            assert!(pair[0] < pair[1]);
        }
    }
}
