// src/renderer/steps/entities.rs

//! The entity step: draws the screen's entity layer into a cached texture.
//!
//! Entities are free-floating cell appearances that sit above the surface
//! without living in the grid. The layer's dirty flag, not the surface's,
//! drives redraws here, so moving an entity never forces the surface layer
//! to regenerate.

use crate::backend::{BatchTarget, RenderBackend, TextureId};
use crate::color::Rgba;
use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::error::RenderError;
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

use super::{ensure_cache, view_cell_rect};

pub struct EntityStep {
    sort_order: u32,
    cache: Option<TextureId>,
}

impl EntityStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::ENTITY,
            cache: None,
        }
    }

    pub fn cache(&self) -> Option<TextureId> {
        self.cache
    }

    fn redraw(&mut self, ctx: &mut FrameContext<'_>, screen: &Screen) -> anyhow::Result<()> {
        let cache = self
            .cache
            .ok_or_else(|| RenderError::State("entity step redraw without a cache".to_string()))?;
        ctx.backend.begin_batch(BatchTarget::Texture(cache));
        ctx.backend.clear(Rgba::TRANSPARENT);
        if let Some(layer) = screen.entities() {
            for entity in layer.entities() {
                if !entity.visible {
                    continue;
                }
                // Entities outside the view are simply not drawn.
                let Some(rect) = view_cell_rect(screen, entity.position.x, entity.position.y)
                else {
                    continue;
                };
                ctx.backend.draw(&DrawOp::new(
                    OrderingBand::Entity,
                    DrawCall::Glyph {
                        cell: entity.appearance,
                        rect,
                        draw_background: false,
                    },
                ))?;
            }
        }
        ctx.backend.end_batch();
        Ok(())
    }
}

impl Default for EntityStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for EntityStep {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }

    fn reset(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(cache) = self.cache.take() {
            backend.dispose(cache);
        }
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
        let layer_dirty = screen.entities().map(|l| l.is_dirty()).unwrap_or(false);
        if result || layer_dirty || is_forced {
            self.redraw(ctx, screen)?;
            result = true;
        }
        Ok(result)
    }

    fn composing(&mut self, ctx: &mut FrameContext<'_>, _screen: &Screen) -> anyhow::Result<()> {
        let cache = self.cache.ok_or_else(|| {
            RenderError::State("entity step composing without a cache".to_string())
        })?;
        ctx.backend.draw(&DrawOp::new(
            OrderingBand::Entity,
            DrawCall::Texture {
                texture: cache,
                position: (0, 0),
                tint: Rgba::WHITE,
            },
        ))?;
        Ok(())
    }
}
