use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// A window's drawing surface, detached from the window so it can be moved to
/// another thread.
///
/// The handle is created on the thread that owns the window and consumed by
/// [`Gpu::from_handle`](super::Gpu::from_handle) on the thread that renders.
/// It is deliberately neither `Clone` nor `Copy`: after it has been sent, the
/// sender has no way left to draw into the window.
pub struct SurfaceHandle {
    pub(crate) instance: wgpu::Instance,
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) size: PhysicalSize<u32>,
}

impl SurfaceHandle {
    /// Detaches the drawing surface of `window`.
    ///
    /// Fails when no backend can create a presentable surface for the window,
    /// i.e. when the platform cannot hand drawing rights to another thread.
    pub fn detach(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The surface keeps its own `Arc` to the window, hence `'static`.
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        log::debug!("detached drawing surface ({}x{})", size.width, size.height);

        Ok(Self { instance, surface, size })
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .finish_non_exhaustive()
    }
}
