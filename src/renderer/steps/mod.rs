// src/renderer/steps/mod.rs

//! The built-in render steps.

pub mod controls;
pub mod cursor;
pub mod entities;
pub mod output;
pub mod surface;
pub mod tint;

pub use controls::{ControlHostSettings, ControlHostStep};
pub use cursor::CursorStep;
pub use entities::EntityStep;
pub use output::OutputStep;
pub use surface::{SurfaceStep, SurfaceStepSettings};
pub use tint::TintStep;

use crate::backend::{RenderBackend, TextureId};
use crate::error::RenderError;
use crate::geometry::PixelRect;
use crate::screen::Screen;

/// Ensures `cache` is a live texture of exactly `size`, reallocating if it
/// is missing or stale. Returns `true` when a (re)allocation happened, which
/// obligates the caller to fully redraw.
fn ensure_cache(
    backend: &mut dyn RenderBackend,
    cache: &mut Option<TextureId>,
    size: (u32, u32),
    force_realloc: bool,
) -> Result<bool, RenderError> {
    let current = cache.and_then(|t| backend.texture_size(t));
    if !force_realloc && current == Some(size) {
        return Ok(false);
    }
    // Allocate the replacement first; a failed allocation must leave the
    // existing cache intact.
    let replacement = backend.create_texture(size.0, size.1)?;
    if let Some(old) = cache.take() {
        backend.dispose(old);
    }
    *cache = Some(replacement);
    Ok(true)
}

/// Pixel rectangle of the grid position `(x, y)` relative to the screen's
/// view, or `None` when the position is outside the view.
fn view_cell_rect(screen: &Screen, x: usize, y: usize) -> Option<PixelRect> {
    let view = screen.surface.view();
    if !view.contains(crate::geometry::Point::new(x, y)) {
        return None;
    }
    let (cw, ch) = screen.font().cell_size();
    Some(PixelRect::new(
        ((x - view.x) as u32 * cw) as i32,
        ((y - view.y) as u32 * ch) as i32,
        cw,
        ch,
    ))
}
