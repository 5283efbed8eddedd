//! Girouette engine crate.
//!
//! This crate owns the runtime pieces the demo delegates to: the window +
//! event loop, GPU device/surface management, the named-matrix stack, quad
//! geometry, the textured pipeline and the texture resource.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod math;
pub mod transform;
pub mod render;
