use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the main-thread side.
pub trait App {
    /// Called once, right after the window has been created.
    fn on_window_created(&mut self, window: &WindowCtx<'_>) -> AppControl {
        let _ = window;
        AppControl::Continue
    }

    /// Called whenever the window's drawable size changes.
    fn on_resized(&mut self, window: &WindowCtx<'_>, size: PhysicalSize<u32>) -> AppControl {
        let _ = (window, size);
        AppControl::Continue
    }

    /// Called for window events.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called once per main-thread tick.
    ///
    /// The tick is driven by the runtime's own timer; it is not a GPU frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
