// src/backends/headless.rs

//! A recording backend with no display attached.
//!
//! Tracks live textures and their sizes, records every batch and draw op in
//! submission order, and can inject allocation failures. The test suite
//! drives the full pipeline against it; it also serves as the reference for
//! writing a real platform adapter.

use std::collections::HashMap;

use log::warn;

use crate::backend::{BatchTarget, RenderBackend, TextureId};
use crate::color::Rgba;
use crate::draw::DrawOp;
use crate::error::RenderError;

/// One recorded batch: its target, the clear (if any), and the ops in
/// submission order.
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub target: BatchTarget,
    pub cleared: Option<Rgba>,
    pub ops: Vec<DrawOp>,
}

#[derive(Default)]
pub struct HeadlessBackend {
    next_texture: u64,
    textures: HashMap<TextureId, (u32, u32)>,
    batches: Vec<RecordedBatch>,
    current: Option<RecordedBatch>,
    fail_next_allocation: bool,
    allocation_count: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches recorded so far, oldest first.
    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    /// Ops recorded in screen-targeted batches, in submission order.
    pub fn screen_ops(&self) -> Vec<DrawOp> {
        self.batches
            .iter()
            .filter(|b| b.target == BatchTarget::Screen)
            .flat_map(|b| b.ops.iter().cloned())
            .collect()
    }

    /// Ops recorded in batches targeting `texture`, in submission order.
    pub fn ops_for(&self, texture: TextureId) -> Vec<DrawOp> {
        self.batches
            .iter()
            .filter(|b| b.target == BatchTarget::Texture(texture))
            .flat_map(|b| b.ops.iter().cloned())
            .collect()
    }

    /// Forgets recorded batches; live textures are kept.
    pub fn clear_recording(&mut self) {
        self.batches.clear();
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Total successful `create_texture` calls since construction.
    pub fn allocation_count(&self) -> usize {
        self.allocation_count
    }

    /// Makes the next `create_texture` call fail with a resource error.
    pub fn fail_next_allocation(&mut self) {
        self.fail_next_allocation = true;
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, RenderError> {
        if self.fail_next_allocation {
            self.fail_next_allocation = false;
            return Err(RenderError::Resource(format!(
                "injected allocation failure for {}x{} texture",
                width, height
            )));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::Resource(format!(
                "cannot allocate empty {}x{} texture",
                width, height
            )));
        }
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.textures.insert(id, (width, height));
        self.allocation_count += 1;
        Ok(id)
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture).copied()
    }

    fn begin_batch(&mut self, target: BatchTarget) {
        if let Some(open) = self.current.take() {
            warn!("begin_batch while a batch was still open; closing the previous batch");
            self.batches.push(open);
        }
        self.current = Some(RecordedBatch {
            target,
            cleared: None,
            ops: Vec::new(),
        });
    }

    fn clear(&mut self, color: Rgba) {
        match self.current.as_mut() {
            Some(batch) => batch.cleared = Some(color),
            None => warn!("clear called outside a batch; ignoring"),
        }
    }

    fn draw(&mut self, op: &DrawOp) -> Result<(), RenderError> {
        match self.current.as_mut() {
            Some(batch) => {
                batch.ops.push(op.clone());
                Ok(())
            }
            None => Err(RenderError::State(
                "draw called outside begin_batch/end_batch".to_string(),
            )),
        }
    }

    fn end_batch(&mut self) {
        match self.current.take() {
            Some(batch) => self.batches.push(batch),
            None => warn!("end_batch called with no open batch"),
        }
    }

    fn dispose(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            warn!("dispose of unknown texture {:?}; ignoring", texture);
        }
    }
}
