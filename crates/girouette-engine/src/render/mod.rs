//! GPU rendering subsystem.
//!
//! Geometry, texture and pipeline resources for drawing depth-tested,
//! textured meshes. Each resource owns its GPU objects; releasing the Rust
//! value releases the GPU side.

mod ctx;
mod mesh;
mod program;
mod texture;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use mesh::{QuadMesh, Vertex};
pub use program::{TexturedProgram, MODEL_MATRIX, PROJECTION_MATRIX, VIEW_MATRIX};
pub use texture::{SamplerParams, Texture2d};
