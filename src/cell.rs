// src/cell.rs

//! Defines the [`Cell`] type and its appearance attributes.
//!
//! A `Cell` is the atomic unit of a grid: a glyph index into a font atlas
//! plus foreground color, background color, mirror flags, and an optional
//! effect reference. Cells are value-like and copied whole when appearance is
//! transferred between grids.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Mirror/flip flags applied when a glyph is drawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct Mirror: u8 {
        /// Flip the glyph left-to-right.
        const HORIZONTAL = 1 << 0;
        /// Flip the glyph top-to-bottom.
        const VERTICAL = 1 << 1;
    }
}

/// An opaque reference to an externally managed cell effect.
///
/// Effect playback itself lives outside the composition core; the reference
/// only travels with the cell so an effects system can find its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EffectId(pub u32);

/// A single glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    /// Index of the glyph in the font atlas.
    pub glyph: u16,
    /// Foreground color the glyph is drawn with.
    pub foreground: Color,
    /// Background color painted behind the glyph.
    pub background: Color,
    /// Mirror/flip flags.
    pub mirror: Mirror,
    /// Optional effect reference.
    pub effect: Option<EffectId>,
}

impl Cell {
    /// Glyph 0, white on black, no mirroring, no effect.
    pub const DEFAULT: Cell = Cell {
        glyph: 0,
        foreground: Color::WHITE,
        background: Color::BLACK,
        mirror: Mirror::empty(),
        effect: None,
    };

    pub const fn new(glyph: u16, foreground: Color, background: Color) -> Self {
        Self {
            glyph,
            foreground,
            background,
            mirror: Mirror::empty(),
            effect: None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::DEFAULT
    }
}
