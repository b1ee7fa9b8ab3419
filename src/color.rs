// src/color.rs

//! Color types used by cells, tints, and draw calls.
//!
//! Cell foreground/background colors are the opaque [`Color`] enum; overlay
//! tints and clear colors carry an alpha channel and use [`Rgba`] directly.

use serde::{Deserialize, Serialize};

/// The sixteen classic palette colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// Returns the concrete sRGB value of this palette entry.
    pub fn to_rgba(self) -> Rgba {
        match self {
            NamedColor::Black => Rgba::rgb(0, 0, 0),
            NamedColor::Red => Rgba::rgb(205, 0, 0),
            NamedColor::Green => Rgba::rgb(0, 205, 0),
            NamedColor::Yellow => Rgba::rgb(205, 205, 0),
            NamedColor::Blue => Rgba::rgb(0, 0, 238),
            NamedColor::Magenta => Rgba::rgb(205, 0, 205),
            NamedColor::Cyan => Rgba::rgb(0, 205, 205),
            NamedColor::White => Rgba::rgb(229, 229, 229),
            NamedColor::BrightBlack => Rgba::rgb(127, 127, 127),
            NamedColor::BrightRed => Rgba::rgb(255, 0, 0),
            NamedColor::BrightGreen => Rgba::rgb(0, 255, 0),
            NamedColor::BrightYellow => Rgba::rgb(255, 255, 0),
            NamedColor::BrightBlue => Rgba::rgb(92, 92, 255),
            NamedColor::BrightMagenta => Rgba::rgb(255, 0, 255),
            NamedColor::BrightCyan => Rgba::rgb(0, 255, 255),
            NamedColor::BrightWhite => Rgba::rgb(255, 255, 255),
        }
    }
}

/// An opaque cell color: either a named palette entry or a true color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// One of the sixteen named palette colors.
    Named(NamedColor),
    /// A true color with components from 0 to 255.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const WHITE: Color = Color::Named(NamedColor::White);
    pub const BLACK: Color = Color::Named(NamedColor::Black);

    /// Resolves to a concrete, fully opaque [`Rgba`] value.
    pub fn to_rgba(self) -> Rgba {
        match self {
            Color::Named(named) => named.to_rgba(),
            Color::Rgb(r, g, b) => Rgba::rgb(r, g, b),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Named(NamedColor::White)
    }
}

/// A color with an alpha channel, used for tints and clears.
///
/// `a == 0` is fully transparent, `a == 255` fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_resolve_to_opaque_rgba() {
        assert_eq!(Color::WHITE.to_rgba(), Rgba::rgb(229, 229, 229));
        assert_eq!(Color::BLACK.to_rgba(), Rgba::rgb(0, 0, 0));
        assert!(Color::Rgb(1, 2, 3).to_rgba().is_opaque());
    }

    #[test]
    fn tint_alpha_predicates() {
        assert!(Rgba::TRANSPARENT.is_transparent());
        assert!(Rgba::WHITE.is_opaque());
        assert!(!Rgba::new(0, 0, 0, 128).is_transparent());
        assert!(!Rgba::new(0, 0, 0, 128).is_opaque());
    }
}
