use anyhow::Result;
use winit::event::WindowEvent;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The runtime guarantees the call order: `setup` exactly once after the
/// window and GPU context exist, then `frame` once per display refresh,
/// never concurrently. Teardown belongs in the implementor's `Drop`, which
/// runs exactly once when the loop ends on any path.
pub trait App {
    /// Called once before the first frame. An error is fatal: the loop never
    /// starts and the process exits with a failure status.
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Called once per rendered frame.
    fn frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}
