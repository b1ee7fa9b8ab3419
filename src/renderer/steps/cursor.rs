// src/renderer/steps/cursor.rs

//! The cursor step: always-live, no cached texture.
//!
//! A blinking cursor changes appearance every few ticks without any grid
//! content changing, so caching it would force the whole pipeline dirty on
//! every phase flip. Instead the cursor is drawn immediately into the frame
//! queue each tick, above the composed output blit.

use std::any::Any;

use log::warn;

use crate::cell::Cell;
use crate::draw::{DrawCall, DrawOp, OrderingBand};
use crate::renderer::step::{sort, RenderStep};
use crate::renderer::FrameContext;
use crate::screen::Screen;

use super::view_cell_rect;

pub struct CursorStep {
    sort_order: u32,
    /// Overrides the cursor component's appearance when set via `set_data`.
    appearance_override: Option<Cell>,
}

impl CursorStep {
    pub fn new() -> Self {
        Self {
            sort_order: sort::CURSOR,
            appearance_override: None,
        }
    }
}

impl Default for CursorStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for CursorStep {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }

    fn set_data(&mut self, data: &dyn Any) {
        match data.downcast_ref::<Cell>() {
            Some(cell) => self.appearance_override = Some(*cell),
            None => warn!("cursor step: ignoring set_data payload of unexpected type"),
        }
    }

    fn refresh(
        &mut self,
        _ctx: &mut FrameContext<'_>,
        _screen: &Screen,
        _backing_texture_changed: bool,
        is_forced: bool,
    ) -> anyhow::Result<bool> {
        // Nothing is cached; a forced refresh still reports "needs
        // composing" per the step contract.
        Ok(is_forced)
    }

    fn render(&self, ctx: &mut FrameContext<'_>, screen: &Screen) -> anyhow::Result<()> {
        let Some(cursor) = screen.cursor() else {
            return Ok(());
        };
        if !cursor.visible || !cursor.is_phase_on() {
            return Ok(());
        }
        let Some(rect) = view_cell_rect(screen, cursor.position.x, cursor.position.y) else {
            return Ok(());
        };
        let cell = self.appearance_override.unwrap_or_else(|| cursor.appearance());
        ctx.queue.push(DrawOp::new(
            OrderingBand::Cursor,
            DrawCall::Glyph {
                cell,
                rect,
                draw_background: true,
            },
        ));
        Ok(())
    }
}
