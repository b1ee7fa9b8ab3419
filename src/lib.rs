// src/lib.rs

//! glyphgrid: a backend-agnostic glyph-grid composition engine.
//!
//! A [`Surface`](surface::Surface) is a 2D grid of styled cells. A
//! [`Screen`](screen::Screen) wraps one surface with optional capability
//! components (cursor, controls, entities). A
//! [`Renderer`](renderer::Renderer) drives an ordered list of
//! [`RenderStep`](renderer::RenderStep)s, each owning an independently
//! cached texture, and composes them into one output texture plus a queue of
//! backend-agnostic [`DrawOp`](draw::DrawOp)s. Any platform adapter that
//! implements [`RenderBackend`](backend::RenderBackend) can execute the
//! queue; [`HeadlessBackend`](backends::HeadlessBackend) is the in-crate
//! recording implementation used by the test suite.
//!
//! The caching contract is the heart of the crate: a clean frame collapses
//! to a single blit of the composed output, and only dirty layers are ever
//! regenerated.

pub mod backend;
pub mod backends;
pub mod cell;
pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod geometry;
pub mod renderer;
pub mod screen;
pub mod surface;

pub use backend::{BatchTarget, RenderBackend, TextureId};
pub use backends::HeadlessBackend;
pub use cell::{Cell, EffectId, Mirror};
pub use color::{Color, NamedColor, Rgba};
pub use config::RenderConfig;
pub use draw::{DrawCall, DrawOp, OrderingBand};
pub use error::RenderError;
pub use font::{default_font, AtlasFont, Font};
pub use geometry::{CellRect, PixelRect, Point};
pub use renderer::{RenderStep, Renderer};
pub use screen::{Control, ControlLayer, Cursor, Entity, EntityLayer, Screen};
pub use surface::Surface;
