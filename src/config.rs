// src/config.rs

//! Configuration for the composition pipeline.
//!
//! Deserializable from JSON so an embedding application can ship a settings
//! file; every field has a sensible default and missing fields fall back to
//! it.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::color::{Color, Rgba};

/// Renderer-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Default foreground for new surfaces.
    pub default_foreground: Color,
    /// Default background for new surfaces.
    pub default_background: Color,
    /// Color the composed output is cleared to before composing.
    pub clear_color: Rgba,
    /// Cursor settings applied when a cursor component is created from
    /// configuration.
    pub cursor: CursorConfig,
    /// When true, every tick redraws every layer (diagnostic escape hatch;
    /// disables the caching fast path).
    pub force_full_redraws: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_foreground: Color::WHITE,
            default_background: Color::BLACK,
            clear_color: Rgba::TRANSPARENT,
            cursor: CursorConfig::default(),
            force_full_redraws: false,
        }
    }
}

impl RenderConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("failed to parse render configuration")
    }
}

/// Cursor appearance and blink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Glyph drawn at the cursor position.
    pub glyph: u16,
    /// Ticks per blink phase; 0 disables blinking.
    pub blink_rate: u32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            glyph: 219,
            blink_rate: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = RenderConfig::from_json_str("{}").unwrap();
        assert_eq!(config.default_foreground, Color::WHITE);
        assert_eq!(config.cursor.blink_rate, 30);
        assert!(!config.force_full_redraws);
    }

    #[test]
    fn partial_overrides_apply() {
        let config =
            RenderConfig::from_json_str(r#"{ "cursor": { "blink_rate": 5 }, "force_full_redraws": true }"#)
                .unwrap();
        assert_eq!(config.cursor.blink_rate, 5);
        assert!(config.force_full_redraws);
        assert_eq!(config.cursor.glyph, 219);
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(RenderConfig::from_json_str("not json").is_err());
    }
}
