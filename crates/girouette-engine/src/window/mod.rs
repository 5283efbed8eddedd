//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer
//! and the application lifecycle (setup, per-frame callback, drop-on-exit).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
