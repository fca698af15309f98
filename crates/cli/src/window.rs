//! Window and GL context, backed by `glutin`.
//!
//! [`GlutinSurface`] is the only place a real window exists. It implements
//! the core's `Surface` trait: events are pumped without blocking once per
//! frame, and a close request is latched until the loop checks it.

use glutin::dpi::LogicalSize;
use glutin::event::{Event, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use glutin::window::WindowBuilder;
use glutin::{ContextBuilder, PossiblyCurrent, WindowedContext};
use quad_renderer_core::config::WindowConfig;
use quad_renderer_core::render::Surface;

use crate::error::CliError;

pub struct GlutinSurface {
    event_loop: EventLoop<()>,
    context: WindowedContext<PossiblyCurrent>,
    close_requested: bool,
}

impl GlutinSurface {
    /// Opens a window, makes its context current, and loads GL entry points.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Window` if the window or context cannot be created.
    #[allow(unsafe_code)]
    pub fn create(config: &WindowConfig) -> Result<(Self, glow::Context), CliError> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(
                f64::from(config.width),
                f64::from(config.height),
            ));

        let context = ContextBuilder::new()
            .with_vsync(config.vsync)
            .build_windowed(window, &event_loop)
            .map_err(|e| CliError::Window(format!("failed to create window: {e}")))?;

        // SAFETY: the context was just created on this thread and no other
        // context is current. It stays current for the life of the process.
        let context = unsafe { context.make_current() }
            .map_err(|(_, e)| CliError::Window(format!("failed to make context current: {e}")))?;

        // SAFETY: the loader only resolves symbols for the current context,
        // which outlives the returned `glow::Context` inside `main`.
        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                context.get_proc_address(symbol) as *const _
            })
        };

        let surface = Self {
            event_loop,
            context,
            close_requested: false,
        };
        Ok((surface, gl))
    }
}

impl Surface for GlutinSurface {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn swap_buffers(&mut self) -> Result<(), String> {
        self.context.swap_buffers().map_err(|e| e.to_string())
    }

    fn poll_events(&mut self) {
        let close_requested = &mut self.close_requested;
        let context = &self.context;

        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        log::info!("window close requested");
                        *close_requested = true;
                    }
                    WindowEvent::Resized(size) => context.resize(size),
                    _ => {}
                },
                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
                _ => {}
            }
        });
    }
}
