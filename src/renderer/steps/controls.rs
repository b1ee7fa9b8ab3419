// src/renderer/steps/controls.rs

//! The control-host step: draws the screen's controls into a cached texture.
//!
//! Each control carries its own small surface; this step paints every
//! enabled control's cells at its position within the host grid. Non-content
//! host changes (focus moves, enabling/disabling) arrive through
//! `on_host_updated` so the step invalidates lazily instead of polling.

use std::any::Any;

use log::warn;

use crate::backend::{BatchTarget, RenderBackend, TextureId};
use crate::color::Rgba;
use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::error::RenderError;
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

use super::{ensure_cache, view_cell_rect};

/// Optional settings accepted via `set_data`.
#[derive(Debug, Clone, Copy)]
pub struct ControlHostSettings {
    /// 0-255 opacity applied when the control layer is composed.
    pub opacity: u8,
}

pub struct ControlHostStep {
    sort_order: u32,
    cache: Option<TextureId>,
    opacity: u8,
    host_dirty: bool,
}

impl ControlHostStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::CONTROL_HOST,
            cache: None,
            opacity: 255,
            host_dirty: false,
        }
    }

    pub fn cache(&self) -> Option<TextureId> {
        self.cache
    }

    fn redraw(&mut self, ctx: &mut FrameContext<'_>, screen: &Screen) -> anyhow::Result<()> {
        let cache = self.cache.ok_or_else(|| {
            RenderError::State("control host step redraw without a cache".to_string())
        })?;
        ctx.backend.begin_batch(BatchTarget::Texture(cache));
        ctx.backend.clear(Rgba::TRANSPARENT);
        if let Some(layer) = screen.controls() {
            for control in layer.controls() {
                if !control.enabled {
                    continue;
                }
                let inner = control.surface.view();
                for vy in 0..inner.height {
                    for vx in 0..inner.width {
                        let cell = control.surface.cell(inner.x + vx, inner.y + vy);
                        let host_x = control.bounds.x + vx;
                        let host_y = control.bounds.y + vy;
                        // Cells hanging outside the host view are clipped.
                        let Some(rect) = view_cell_rect(screen, host_x, host_y) else {
                            continue;
                        };
                        ctx.backend.draw(&DrawOp::new(
                            OrderingBand::Overlay,
                            DrawCall::Glyph {
                                cell,
                                rect,
                                draw_background: true,
                            },
                        ))?;
                    }
                }
            }
        }
        ctx.backend.end_batch();
        Ok(())
    }
}

impl Default for ControlHostStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for ControlHostStep {
    fn name(&self) -> &'static str {
        "controlhost"
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }

    fn set_data(&mut self, data: &dyn Any) {
        match data.downcast_ref::<ControlHostSettings>() {
            Some(settings) => self.opacity = settings.opacity,
            None => warn!("control host step: ignoring set_data payload of unexpected type"),
        }
    }

    fn reset(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(cache) = self.cache.take() {
            backend.dispose(cache);
        }
        self.host_dirty = false;
    }

    fn refresh(
        &mut self,
        ctx: &mut FrameContext<'_>,
        screen: &Screen,
        backing_texture_changed: bool,
        is_forced: bool,
    ) -> anyhow::Result<bool> {
        let size = screen.pixel_size();
        let mut result = ensure_cache(ctx.backend, &mut self.cache, size, backing_texture_changed)?;
        let layer_dirty = screen.controls().map(|l| l.is_dirty()).unwrap_or(false);
        if result || layer_dirty || self.host_dirty || is_forced {
            self.redraw(ctx, screen)?;
            self.host_dirty = false;
            result = true;
        }
        Ok(result)
    }

    fn composing(&mut self, ctx: &mut FrameContext<'_>, _screen: &Screen) -> anyhow::Result<()> {
        let cache = self.cache.ok_or_else(|| {
            RenderError::State("control host step composing without a cache".to_string())
        })?;
        ctx.backend.draw(&DrawOp::new(
            OrderingBand::Overlay,
            DrawCall::Texture {
                texture: cache,
                position: (0, 0),
                tint: Rgba::new(255, 255, 255, self.opacity),
            },
        ))?;
        Ok(())
    }

    fn on_host_updated(&mut self, _screen: &Screen) {
        self.host_dirty = true;
    }
}
