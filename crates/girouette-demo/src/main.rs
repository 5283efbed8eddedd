//! Entry point: window bootstrap for the rotating textured quad.

use anyhow::Result;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use girouette_engine::device::GpuInit;
use girouette_engine::logging::{init_logging, LoggingConfig};
use girouette_engine::window::{Runtime, RuntimeConfig};

mod app;

use app::SpinningQuad;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "girouette".to_string(),
        position: PhysicalPosition::new(20, 20),
        initial_size: PhysicalSize::new(800, 600),
        resizable: true,
    };

    // Window/context failure aborts here before any frame runs; on every
    // other exit path SpinningQuad's Drop releases the GPU resources.
    Runtime::run(config, GpuInit::default(), SpinningQuad::new())
}
