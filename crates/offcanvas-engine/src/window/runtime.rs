use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Interval between main-thread ticks (`App::on_frame`).
    pub tick_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "offcanvas".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            tick_interval: Duration::from_millis(16),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop on the calling thread until the window closes or
    /// the app asks to exit.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct WindowEntry {
    window: Arc<Window>,
    clock: FrameClock,
}

impl WindowEntry {
    fn ctx(&self) -> WindowCtx<'_> {
        WindowCtx {
            id: self.window.id(),
            window: &self.window,
        }
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,

    window: Option<WindowEntry>,
    next_tick: Instant,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            window: None,
            next_tick: Instant::now(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn control(&mut self, control: AppControl) {
        if control == AppControl::Exit {
            self.request_exit();
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let entry = WindowEntry {
            window: Arc::new(window),
            clock: FrameClock::default(),
        };

        let control = self.app.on_window_created(&entry.ctx());
        self.window = Some(entry);
        self.control(control);
        Ok(())
    }

    fn apply_commands(&mut self, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::Exit => self.request_exit(),
            }
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if now >= self.next_tick {
            if let Some(entry) = self.window.as_ref() {
                entry.window.request_redraw();
            }
            self.next_tick = now + self.config.tick_interval;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows: the entry stays borrowed while app callbacks run.
        let (app, slot) = (&mut self.app, &mut self.window);

        let Some(entry) = slot.as_mut() else { return };
        if entry.window.id() != window_id {
            return;
        }

        let mut exit = app.on_window_event(&entry.ctx(), &event) == AppControl::Exit;
        let mut close = false;
        let mut runtime_ctx = None;

        match &event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => close = true,

            WindowEvent::Resized(new_size) => {
                exit |= app.on_resized(&entry.ctx(), *new_size) == AppControl::Exit;
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.window.inner_size();
                exit |= app.on_resized(&entry.ctx(), new_size) == AppControl::Exit;
            }

            WindowEvent::RedrawRequested => {
                let mut ctx_out = RuntimeCtx::default();
                let ft: FrameTime = entry.clock.tick();

                // Scope to ensure `ctx` is dropped before the commands are applied.
                let app_control = {
                    let mut ctx = FrameCtx {
                        window: entry.ctx(),
                        time: ft,
                        runtime: &mut ctx_out,
                    };
                    app.on_frame(&mut ctx)
                };

                if app_control == AppControl::Exit {
                    ctx_out.exit();
                }
                runtime_ctx = Some(ctx_out);
            }

            _ => {}
        }

        if close {
            self.window = None;
            exit = true;
        }
        if exit {
            self.request_exit();
        }
        if let Some(ctx) = runtime_ctx {
            self.apply_commands(ctx);
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
