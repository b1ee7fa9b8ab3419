// src/renderer/step.rs

//! The [`RenderStep`] contract: one independently cached visual layer.
//!
//! A step owns a sort-order priority, an optional cached texture, and its
//! own dirty state. Within a tick the renderer drives every step through
//! `refresh` (regenerate the cache if needed), `composing` (blend the cache
//! into the composed output), and `render` (emit this frame's draw ops).
//!
//! Lifecycle per step: `Clean -> (owner edit | host update) -> Dirty ->
//! refresh (redraw) -> composing -> Clean`. A forced refresh short-circuits
//! any state directly into the redraw path.

use std::any::Any;

use log::warn;

use crate::backend::RenderBackend;
use crate::error::RenderError;
use crate::renderer::FrameContext;
use crate::screen::Screen;

use super::steps::{
    ControlHostStep, CursorStep, EntityStep, OutputStep, SurfaceStep, TintStep,
};

/// Well-known sort orders for the built-in steps. Lower draws first.
///
/// The output blit shares the surface order on purpose: ties preserve
/// insertion order (the step list is sorted with a stable sort, which is a
/// guarantee, not an accident), so the blit lands directly above the surface
/// layer and below the cursor and tint draws.
pub mod sort {
    pub const SURFACE: u32 = 50;
    pub const OUTPUT: u32 = 50;
    pub const ENTITY: u32 = 60;
    pub const CURSOR: u32 = 70;
    pub const CONTROL_HOST: u32 = 80;
    pub const TINT: u32 = 90;
}

/// A pluggable, independently cached pipeline stage producing one visual
/// layer.
pub trait RenderStep {
    /// Stable identifier, also accepted by [`create`].
    fn name(&self) -> &'static str;

    /// Priority in the step list; lower draws first.
    fn sort_order(&self) -> u32;

    /// Attaches step-specific configuration. An unexpected payload type is a
    /// logged no-op: wiring mistakes must not crash the pipeline.
    fn set_data(&mut self, _data: &dyn Any) {
        warn!("step '{}' ignores set_data payloads", self.name());
    }

    /// Releases the cached texture and forces a full redraw on the next
    /// refresh.
    fn reset(&mut self, _backend: &mut dyn RenderBackend) {}

    /// Decides whether this step's layer must be regenerated and, if so,
    /// reallocates the cache to the screen's current pixel size and redraws
    /// into it. Returns `true` when the layer needs composing.
    ///
    /// Idempotent: two calls with no intervening state change and
    /// `is_forced == false` must not reallocate or redraw. `is_forced ==
    /// true` always redraws and returns `true`. `backing_texture_changed`
    /// always triggers a full redraw, never a reallocate-only.
    fn refresh(
        &mut self,
        ctx: &mut FrameContext<'_>,
        screen: &Screen,
        backing_texture_changed: bool,
        is_forced: bool,
    ) -> anyhow::Result<bool>;

    /// Blends this step's cached texture into the composed output. Called
    /// inside an open batch targeting the output texture, strictly in
    /// ascending sort order. Steps without cached content do nothing.
    fn composing(&mut self, _ctx: &mut FrameContext<'_>, _screen: &Screen) -> anyhow::Result<()> {
        Ok(())
    }

    /// Appends this frame's draw ops to the queue. Pure read: never mutates
    /// step state.
    fn render(&self, _ctx: &mut FrameContext<'_>, _screen: &Screen) -> anyhow::Result<()> {
        Ok(())
    }

    /// Invoked when the owning screen's non-content state changes (focus,
    /// enabled), so a step can invalidate lazily instead of polling.
    fn on_host_updated(&mut self, _screen: &Screen) {}
}

/// Instantiates a built-in step by name.
///
/// Unknown names fail with [`RenderError::Configuration`].
pub fn create(name: &str) -> Result<Box<dyn RenderStep>, RenderError> {
    match name {
        "surface" => Ok(Box::new(SurfaceStep::new())),
        "output" => Ok(Box::new(OutputStep::new())),
        "entities" => Ok(Box::new(EntityStep::new())),
        "cursor" => Ok(Box::new(CursorStep::new())),
        "controlhost" => Ok(Box::new(ControlHostStep::new())),
        "tint" => Ok(Box::new(TintStep::new())),
        other => Err(RenderError::Configuration(format!(
            "unknown render step kind '{}'",
            other
        ))),
    }
}
