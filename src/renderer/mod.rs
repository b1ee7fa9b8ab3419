// src/renderer/mod.rs

//! The [`Renderer`]: orchestrates an ordered collection of render steps for
//! one screen and produces the per-frame draw-call queue.
//!
//! One logical tick is `refresh` (regenerate stale layer caches and compose
//! them into the output texture) followed by `render` (collect the frame's
//! draw ops) and `flush` (hand the queue to the backend and clear it). The
//! [`tick`](Renderer::tick) convenience drives all three. There is no
//! internal threading: a tick either completes or propagates an error, in
//! which case the previous output persists and the next tick naturally
//! retries because dirty flags are re-evaluated every tick.

pub mod step;
pub mod steps;


use log::{debug, trace, warn};

use crate::backend::{BatchTarget, RenderBackend, TextureId};
use crate::color::Rgba;
use crate::config::RenderConfig;
use crate::draw::DrawOp;
use crate::error::RenderError;
use crate::screen::Screen;

pub use step::{create as create_step, sort, RenderStep};

/// Frame-scoped rendering state, passed by reference into every step call.
///
/// Acquired at tick start and released at flush; steps never reach for
/// process-wide graphics state.
pub struct FrameContext<'a> {
    /// The platform graphics adapter for this tick.
    pub backend: &'a mut dyn RenderBackend,
    /// The frame's draw-op queue; `render` implementations append to it.
    pub queue: &'a mut Vec<DrawOp>,
    /// The renderer's composed output texture, if allocated.
    pub output: Option<TextureId>,
}

/// Pipeline orchestrator for one screen.
///
/// Steps are kept sorted ascending by sort order; equal orders preserve
/// insertion order (stable sort). That ordering *is* the paint order, bottom
/// layer first, and the stability of ties is a guarantee callers may rely
/// on.
pub struct Renderer {
    steps: Vec<Box<dyn RenderStep>>,
    output: Option<TextureId>,
    queue: Vec<DrawOp>,
    clear_color: Rgba,
    force_full_redraws: bool,
    attached: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            output: None,
            queue: Vec::new(),
            clear_color: Rgba::TRANSPARENT,
            force_full_redraws: false,
            attached: false,
        }
    }

    pub fn with_config(config: &RenderConfig) -> Self {
        let mut renderer = Self::new();
        renderer.clear_color = config.clear_color;
        renderer.force_full_redraws = config.force_full_redraws;
        renderer
    }

    /// Wires the default step set for `screen`: a surface step and an output
    /// step always; cursor, control-host, entity, and tint steps only when
    /// the screen exposes the corresponding capability.
    ///
    /// Attaching an already-attached renderer is a logged no-op; detach
    /// first to rewire.
    pub fn attach(&mut self, screen: &Screen) {
        if self.attached {
            warn!("renderer is already attached; ignoring");
            return;
        }
        self.add_step(Box::new(steps::SurfaceStep::new()));
        self.add_step(Box::new(steps::OutputStep::new()));
        if screen.entities().is_some() {
            self.add_step(Box::new(steps::EntityStep::new()));
        }
        if screen.cursor().is_some() {
            self.add_step(Box::new(steps::CursorStep::new()));
        }
        if screen.controls().is_some() {
            self.add_step(Box::new(steps::ControlHostStep::new()));
        }
        // The tint is a surface property that can change at any time, so its
        // step is always present and simply emits nothing while transparent.
        self.add_step(Box::new(steps::TintStep::new()));
        self.attached = true;
        debug!("renderer attached with {} steps", self.steps.len());
    }

    /// Disposes every owned step (releasing backend textures) and the output
    /// texture. A second detach is a no-op, not an error.
    pub fn detach(&mut self, backend: &mut dyn RenderBackend) {
        if !self.attached && self.steps.is_empty() {
            trace!("detach of an already-detached renderer; no-op");
            return;
        }
        for step in &mut self.steps {
            step.reset(backend);
        }
        self.steps.clear();
        if let Some(output) = self.output.take() {
            backend.dispose(output);
        }
        self.queue.clear();
        self.attached = false;
    }

    /// Inserts a step, keeping the list sorted by sort order. The sort is
    /// stable: steps registered at the same priority keep their relative
    /// insertion order.
    pub fn add_step(&mut self, step: Box<dyn RenderStep>) {
        self.steps.push(step);
        self.steps.sort_by_key(|s| s.sort_order());
    }

    /// Instantiates and inserts a built-in step by name. Unknown names fail
    /// with [`RenderError::Configuration`].
    pub fn add_step_by_name(&mut self, name: &str) -> Result<(), RenderError> {
        let step = step::create(name)?;
        self.add_step(step);
        Ok(())
    }

    pub fn steps(&self) -> &[Box<dyn RenderStep>] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut [Box<dyn RenderStep>] {
        &mut self.steps
    }

    /// The composed output texture, once the first refresh has allocated it.
    pub fn output_texture(&self) -> Option<TextureId> {
        self.output
    }

    /// The draw ops collected by the last `render`, not yet flushed.
    pub fn queue(&self) -> &[DrawOp] {
        &self.queue
    }

    /// Notifies every step that the screen's non-content state changed
    /// (focus, enabled, size policy), letting steps invalidate lazily.
    pub fn host_updated(&mut self, screen: &Screen) {
        for step in &mut self.steps {
            step.on_host_updated(screen);
        }
    }

    /// Refreshes every step in sort order and, when any layer changed,
    /// recomposes the output texture. Returns whether composing happened.
    ///
    /// Whether the backing texture changed is derived by comparing the
    /// output texture's actual dimensions against the grid's current pixel
    /// size; there is no separately tracked flag that could drift.
    pub fn refresh(
        &mut self,
        screen: &mut Screen,
        backend: &mut dyn RenderBackend,
        force: bool,
    ) -> anyhow::Result<bool> {
        let force = force || self.force_full_redraws;
        let size = screen.pixel_size();

        let backing_texture_changed = self
            .output
            .and_then(|t| backend.texture_size(t))
            .map_or(true, |actual| actual != size);
        if backing_texture_changed {
            trace!("output texture stale; reallocating at {:?}", size);
            // The replacement is allocated before the old texture is
            // released: an aborted tick must leave the previous output
            // presentable.
            let replacement = backend.create_texture(size.0, size.1)?;
            if let Some(old) = self.output.take() {
                backend.dispose(old);
            }
            self.output = Some(replacement);
        }

        let mut needs_composing = false;
        let mut ctx = FrameContext {
            backend,
            queue: &mut self.queue,
            output: self.output,
        };
        for step in &mut self.steps {
            needs_composing |=
                step.refresh(&mut ctx, &*screen, backing_texture_changed, force)?;
        }

        if needs_composing {
            let output = self.output.ok_or_else(|| {
                RenderError::State("composing with no output texture".to_string())
            })?;
            // The output is rebuilt from scratch, so every step re-blends
            // its (still valid) cache, strictly in ascending sort order.
            ctx.backend.begin_batch(BatchTarget::Texture(output));
            ctx.backend.clear(self.clear_color);
            for step in &mut self.steps {
                step.composing(&mut ctx, &*screen)?;
            }
            ctx.backend.end_batch();
        }

        screen.clear_dirty();
        Ok(needs_composing)
    }

    /// Collects this frame's draw ops from every step, in sort order, into
    /// the queue. Pure read of pipeline state.
    pub fn render(
        &mut self,
        screen: &Screen,
        backend: &mut dyn RenderBackend,
    ) -> anyhow::Result<()> {
        self.queue.clear();
        let mut ctx = FrameContext {
            backend,
            queue: &mut self.queue,
            output: self.output,
        };
        for step in &self.steps {
            step.render(&mut ctx, screen)?;
        }
        Ok(())
    }

    /// Hands the queued draw ops to the backend inside one screen batch,
    /// then clears the queue.
    pub fn flush(&mut self, backend: &mut dyn RenderBackend) -> anyhow::Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        backend.begin_batch(BatchTarget::Screen);
        for op in &self.queue {
            backend.draw(op)?;
        }
        backend.end_batch();
        self.queue.clear();
        Ok(())
    }

    /// One full tick: refresh, render, flush.
    pub fn tick(
        &mut self,
        screen: &mut Screen,
        backend: &mut dyn RenderBackend,
        force: bool,
    ) -> anyhow::Result<()> {
        self.refresh(screen, backend, force)?;
        self.render(&*screen, backend)?;
        self.flush(backend)?;
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
