// src/renderer/steps/output.rs

//! The output step: blits the renderer's composed output into the frame
//! queue.
//!
//! This is the single draw call a steady-state frame collapses to. It shares
//! the surface sort order and is inserted directly after the surface step,
//! so the blit sits below the cursor and tint draws in the queue.

use log::warn;

use crate::color::Rgba;
use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

pub struct OutputStep {
    sort_order: u32,
}

impl OutputStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::OUTPUT,
        }
    }
}

impl Default for OutputStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for OutputStep {
    fn name(&self) -> &'static str {
        "output"
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
        // A fully opaque tint covers the output; skip the blit entirely.
        if screen.surface.tint().is_opaque() {
            return Ok(());
        }
        let Some(output) = ctx.output else {
            warn!("output step: no composed output texture yet; skipping blit");
            return Ok(());
        };
        ctx.queue.push(DrawOp::new(
            OrderingBand::OutputBlit,
            DrawCall::Texture {
                texture: output,
                position: (0, 0),
                tint: Rgba::WHITE,
            },
        ));
        Ok(())
    }
}
