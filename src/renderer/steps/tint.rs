// src/renderer/steps/tint.rs

//! The tint step: draws the surface's overlay tint above everything else.
//!
//! Used for modal shading and fade effects. Alpha 0 emits nothing; alpha
//! 255 covers the screen completely (and the output step suppresses its
//! blit in that case, since nothing underneath can show through).

use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::geometry::PixelRect;
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

pub struct TintStep {
    sort_order: u32,
}

impl TintStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::TINT,
        }
    }
}

impl Default for TintStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for TintStep {
    fn name(&self) -> &'static str {
        "tint"
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }

    fn refresh(
        &mut self,
        _ctx: &mut FrameContext<'_>,
        _screen: &Screen,
        _backing_texture_changed: bool,
        is_forced: bool,
    ) -> anyhow::Result<bool> {
        Ok(is_forced)
    }

    fn render(&self, ctx: &mut FrameContext<'_>, screen: &Screen) -> anyhow::Result<()> {
        let tint = screen.surface.tint();
        if tint.is_transparent() {
            return Ok(());
        }
        let (width, height) = screen.pixel_size();
        ctx.queue.push(DrawOp::new(
            OrderingBand::Tint,
            DrawCall::SolidColor {
                color: tint,
                rect: PixelRect::new(0, 0, width, height),
            },
        ));
        Ok(())
    }
}
