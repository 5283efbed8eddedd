//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application: one-time setup before any frame, a per-frame callback, and
//! teardown through `Drop` when the loop ends.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
