use rfd::{MessageButtons, MessageDialog, MessageLevel};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use offcanvas_chart::heartbeat::Heartbeat;
use offcanvas_chart::surface::WindowCanvas;
use offcanvas_chart::{Controller, Notify, RenderWorker, SizeUpdate, WorkerConfig};
use offcanvas_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use offcanvas_engine::device::SurfaceHandle;
use offcanvas_engine::window::PhysicalSize;

type PlotController = Controller<WindowCanvas, RenderWorker<SurfaceHandle>, DialogNotifier>;

/// Main-thread side of the demo: owns the controller and the heartbeat.
pub struct DemoApp {
    worker: WorkerConfig,
    controller: Option<PlotController>,
    heartbeat: Heartbeat,
}

impl DemoApp {
    pub fn new(worker: WorkerConfig) -> Self {
        Self {
            worker,
            controller: None,
            heartbeat: Heartbeat::new(),
        }
    }

    fn shutdown(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.shutdown();
        }
    }
}

impl App for DemoApp {
    fn on_window_created(&mut self, window: &WindowCtx<'_>) -> AppControl {
        let config = self.worker.clone();
        let spawn = move || RenderWorker::<SurfaceHandle>::spawn(config.clone());

        let mut controller = Controller::new(WindowCanvas::new(window.shared()), spawn, DialogNotifier);
        controller.start();
        self.controller = Some(controller);
        AppControl::Continue
    }

    fn on_resized(&mut self, _window: &WindowCtx<'_>, size: PhysicalSize<u32>) -> AppControl {
        if let Some(controller) = self.controller.as_mut() {
            controller.on_measure(SizeUpdate::new(size.width, size.height));
        }
        AppControl::Continue
    }

    fn on_window_event(&mut self, _window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::CloseRequested => {
                // Join the renderer while the window is still alive.
                self.shutdown();
                AppControl::Continue
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => {
                    self.shutdown();
                    AppControl::Exit
                }
                Key::Character(c) if c.eq_ignore_ascii_case("b") => {
                    block_main_thread();
                    AppControl::Continue
                }
                _ => AppControl::Continue,
            },

            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.heartbeat.beat(ctx.time.elapsed);
        ctx.window.set_title(&format!("offcanvas · {}", self.heartbeat));

        if let Some(controller) = self.controller.as_mut() {
            controller.drain_events();
        }
        AppControl::Continue
    }
}

/// Blocks the main thread until the user dismisses a modal dialog.
fn block_main_thread() {
    log::info!("main thread blocked by modal dialog");
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Main thread blocked")
        .set_description(
            "The clock in the title bar has stopped, the plot has not.\n\n\
             Close this dialog to unblock the main thread.",
        )
        .set_buttons(MessageButtons::Ok)
        .show();
    log::info!("main thread unblocked");
}

/// Shows controller warnings as a native dialog.
struct DialogNotifier;

impl Notify for DialogNotifier {
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("offcanvas")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
