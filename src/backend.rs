// src/backend.rs

//! The backend seam: the minimal interface a platform graphics adapter must
//! implement to execute a frame's draw queue.
//!
//! The pipeline never talks to a graphics API directly. It allocates
//! render-target textures, opens a batch against a target (a texture or the
//! screen), issues [`DrawOp`]s, and closes the batch. One adapter per
//! platform implements this trait; [`crate::backends::HeadlessBackend`] is
//! the in-crate reference implementation.

use crate::color::Rgba;
use crate::draw::DrawOp;
use crate::error::RenderError;

/// An opaque handle to a backend-owned texture.
///
/// Handles are never shared between renderers or steps; each owner disposes
/// what it creates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TextureId(pub u64);

/// Where a batch's draws land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchTarget {
    /// The platform's final presentation surface.
    Screen,
    /// An offscreen render-target texture.
    Texture(TextureId),
}

/// Platform graphics adapter contract.
///
/// Must support the three [`crate::draw::DrawCall`] kinds, preserve
/// submission order within a batch, and honor the ordering-band hint only as
/// a batching optimization.
pub trait RenderBackend {
    /// Allocates a render-target texture. Fails with
    /// [`RenderError::Resource`] when the device cannot allocate.
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, RenderError>;

    /// Actual dimensions of a live texture, or `None` for a stale handle.
    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)>;

    /// Opens a batch. All draws until `end_batch` land on `target`.
    fn begin_batch(&mut self, target: BatchTarget);

    /// Clears the current batch target to a flat color.
    fn clear(&mut self, color: Rgba);

    /// Executes one draw op inside the current batch.
    fn draw(&mut self, op: &DrawOp) -> Result<(), RenderError>;

    /// Closes the current batch, flushing it to the target.
    fn end_batch(&mut self);

    /// Releases a texture. Disposing an unknown handle is a no-op.
    fn dispose(&mut self, texture: TextureId);
}
