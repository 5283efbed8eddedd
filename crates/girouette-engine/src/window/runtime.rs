use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::render::{RenderCtx, Viewport};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub position: PhysicalPosition<i32>,
    pub initial_size: PhysicalSize<u32>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "girouette".to_string(),
            position: PhysicalPosition::new(20, 20),
            initial_size: PhysicalSize::new(800, 600),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
///
/// Drives the lifecycle: create window + GPU context, run `App::setup`
/// exactly once, then `App::frame` once per display refresh until the window
/// closes. The app value is dropped when `run` returns — on every exit path —
/// so resource teardown belongs in the app's `Drop`.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.fatal.take() {
            return Err(err);
        }
        Ok(())
    }
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    clock: FrameClock,

    /// Set once `App::setup` has completed; frames never run before it.
    is_setup: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            gpu: None,
            clock: FrameClock::new(),
            is_setup: false,
            fatal: None,
        }
    }

    fn bootstrap(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_position(self.config.position)
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable)
            .with_visible(true);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.gpu_init.clone()))
            .context("GPU initialization failed")?;

        let size = gpu.size();
        let ctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            Viewport::new(size.width as f32, size.height as f32),
        );
        self.app.setup(&ctx).context("application setup failed")?;

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.is_setup = true;
        Ok(())
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.bootstrap(event_loop) {
            self.abort(event_loop, err);
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the present-mode pacing (vsync under FIFO)
        // throttles the loop to the display refresh.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.app.on_window_event(&event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(gpu), Some(window)) = (self.gpu.as_mut(), &self.window) {
                    gpu.resize(window.inner_size());
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.is_setup {
                    return;
                }
                let Some(gpu) = self.gpu.as_mut() else { return };

                let time = self.clock.tick();
                let mut ctx = FrameCtx { gpu, time };

                if self.app.frame(&mut ctx) == AppControl::Exit {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
