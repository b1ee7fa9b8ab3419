// src/error.rs

//! Error kinds raised by the composition pipeline.
//!
//! Only genuinely recoverable conditions travel through `Result`; cell access
//! with bad coordinates is a programmer error and panics at the access site
//! (see `Surface::cell`). The variants here mirror the failure modes of the
//! pipeline itself: bad wiring, backend allocation failure, and sequencing
//! defects.

use std::fmt;

/// Errors produced by the renderer, its steps, and the backend seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Cell access outside the grid extent. Raised by the checked accessors;
    /// the unchecked accessors panic instead.
    Bounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// An unknown step kind was requested, or a step was attached without
    /// mandatory data.
    Configuration(String),
    /// The backend failed to allocate or write a texture. Recoverable at tick
    /// granularity: the previous output persists and the next tick retries,
    /// because dirty flags are re-evaluated every tick.
    Resource(String),
    /// A pipeline sequencing defect, e.g. composing a step that has no valid
    /// cache, or drawing outside an open batch.
    State(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Bounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
            RenderError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            RenderError::Resource(msg) => write!(f, "resource error: {}", msg),
            RenderError::State(msg) => write!(f, "pipeline state error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}
