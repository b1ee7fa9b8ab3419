// src/renderer/steps/surface.rs

//! The surface step: draws the screen's cell grid into a cached texture.
//!
//! This is the bottom layer of every screen and the workhorse of the
//! pipeline. A redraw emits one background fill for the view plus one glyph
//! call per visible cell; a clean frame emits nothing and the cached texture
//! is reused during composing.

use std::any::Any;

use log::{trace, warn};

use crate::backend::{BatchTarget, RenderBackend, TextureId};
use crate::color::Rgba;
use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::error::RenderError;
use crate::geometry::{CellRect, PixelRect};
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

use super::ensure_cache;

/// Optional settings accepted via `set_data`.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceStepSettings {
    /// 0-255 opacity applied when the cached layer is composed. 255 is
    /// fully visible.
    pub opacity: u8,
}

pub struct SurfaceStep {
    sort_order: u32,
    cache: Option<TextureId>,
    /// Per-cell target rectangles for the current view, row-major.
    render_rects: Vec<PixelRect>,
    rects_view: CellRect,
    rects_cell: (u32, u32),
    opacity: u8,
    redraw_count: u64,
}

impl SurfaceStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::SURFACE,
            cache: None,
            render_rects: Vec::new(),
            rects_view: CellRect::default(),
            rects_cell: (0, 0),
            opacity: 255,
            redraw_count: 0,
        }
    }

    /// The cached layer texture, if one has been drawn.
    pub fn cache(&self) -> Option<TextureId> {
        self.cache
    }

    /// Number of full redraws performed since creation.
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// Recomputes the per-cell target rectangles when the view or the font
    /// cell size changed.
    fn ensure_render_rects(&mut self, screen: &Screen) {
        let view = screen.surface.view();
        let cell = screen.font().cell_size();
        if view == self.rects_view && cell == self.rects_cell {
            return;
        }
        let (cw, ch) = cell;
        self.render_rects.clear();
        self.render_rects.reserve(view.width * view.height);
        for vy in 0..view.height {
            for vx in 0..view.width {
                self.render_rects.push(PixelRect::new(
                    (vx as u32 * cw) as i32,
                    (vy as u32 * ch) as i32,
                    cw,
                    ch,
                ));
            }
        }
        self.rects_view = view;
        self.rects_cell = cell;
    }

    fn redraw(&mut self, ctx: &mut FrameContext<'_>, screen: &Screen) -> anyhow::Result<()> {
        let cache = self
            .cache
            .ok_or_else(|| RenderError::State("surface step redraw without a cache".to_string()))?;
        trace!("surface step: redrawing cache {:?}", cache);

        ctx.backend.begin_batch(BatchTarget::Texture(cache));
        ctx.backend.clear(Rgba::TRANSPARENT);

        let surface = &screen.surface;
        let default_bg = surface.default_background();
        let bg = default_bg.to_rgba();
        if !bg.is_transparent() {
            let view = surface.view();
            let (cw, ch) = screen.font().cell_size();
            ctx.backend.draw(&DrawOp::new(
                OrderingBand::Background,
                DrawCall::SolidColor {
                    color: bg,
                    rect: PixelRect::new(0, 0, view.width as u32 * cw, view.height as u32 * ch),
                },
            ))?;
        }

        let view = surface.view();
        let mut rect_index = 0;
        for y in view.y..view.bottom() {
            for x in view.x..view.right() {
                let cell = surface.cell(x, y);
                let rect = self.render_rects[rect_index];
                rect_index += 1;
                let draw_background = cell.background != default_bg;
                if cell.glyph == 0 && !draw_background {
                    continue;
                }
                ctx.backend.draw(&DrawOp::new(
                    OrderingBand::Glyph,
                    DrawCall::Glyph {
                        cell,
                        rect,
                        draw_background,
                    },
                ))?;
            }
        }

        ctx.backend.end_batch();
        self.redraw_count += 1;
        Ok(())
    }
}

impl Default for SurfaceStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for SurfaceStep {
    fn name(&self) -> &'static str {
        "surface"
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }

    fn set_data(&mut self, data: &dyn Any) {
        match data.downcast_ref::<SurfaceStepSettings>() {
            Some(settings) => self.opacity = settings.opacity,
            None => warn!("surface step: ignoring set_data payload of unexpected type"),
        }
    }

    fn reset(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(cache) = self.cache.take() {
            backend.dispose(cache);
        }
        self.render_rects.clear();
        self.rects_view = CellRect::default();
        self.rects_cell = (0, 0);
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
        self.ensure_render_rects(screen);
        if result || screen.surface.is_dirty() || is_forced {
            self.redraw(ctx, screen)?;
            result = true;
        }
        Ok(result)
    }

    fn composing(&mut self, ctx: &mut FrameContext<'_>, _screen: &Screen) -> anyhow::Result<()> {
        let cache = self.cache.ok_or_else(|| {
            RenderError::State("surface step composing without a cache".to_string())
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
}
