// src/backends/mod.rs
// Declares backend adapter modules.

pub mod headless;

pub use headless::HeadlessBackend;
