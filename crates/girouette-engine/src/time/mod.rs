//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame. The
//! demo animates per frame rather than per elapsed time, so `FrameTime` is
//! used for diagnostics only.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
