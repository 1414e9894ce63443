use std::sync::Arc;

use winit::window::{Window, WindowId};

use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Arc<Window>,
}

impl<'a> WindowCtx<'a> {
    /// Replaces the window title.
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Returns a shared handle to the window.
    pub fn shared(&self) -> Arc<Window> {
        Arc::clone(self.window)
    }
}

/// Per-tick context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub window:  WindowCtx<'a>,
    pub time:    FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}
