//! Seams between the renderer and whatever it draws into.
//!
//! [`TransferSurface`] is the handle that crosses threads; [`DrawSurface`] is
//! what it turns into on the renderer thread. The GPU implementations live
//! here too: a [`SurfaceHandle`] detached from a winit window becomes a
//! [`GpuPlotSurface`].

use std::sync::Arc;

use offcanvas_engine::coords::ColorRgba;
use offcanvas_engine::device::{Gpu, GpuInit, SurfaceHandle};
use offcanvas_engine::paint::Color;
use offcanvas_engine::render::shapes::point::{AxisMap, PointInstance, PointRenderer};
use offcanvas_engine::render::{render_frame, FrameStatus};
use offcanvas_engine::window::{PhysicalSize, Window};

use crate::controller::Canvas;
use crate::error::ChartError;
use crate::message::SizeUpdate;

/// Everything needed to draw one frame of the plot.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame<'a> {
    /// Full dataset, already colored.
    pub instances: &'a [PointInstance],
    /// Identity of `instances`; unchanged revision means unchanged data.
    pub revision: u64,
    /// Data → pixel map of the x scale.
    pub x: AxisMap,
    /// Data → pixel map of the y scale.
    pub y: AxisMap,
}

/// A surface the renderer draws into.
pub trait DrawSurface {
    /// Resizes the backing store to `size` pixels.
    fn resize(&mut self, size: SizeUpdate);

    /// Draws and presents one frame.
    ///
    /// May block until the display accepts a new frame; that block is what
    /// paces the render loop.
    fn draw(&mut self, frame: &PlotFrame<'_>) -> Result<FrameStatus, ChartError>;
}

/// A transferable surface handle, consumed on the renderer thread.
pub trait TransferSurface: Send + 'static {
    type Surface: DrawSurface;

    /// Turns the handle into a drawable surface.
    fn acquire(self) -> Result<Self::Surface, ChartError>;
}

// ── GPU ───────────────────────────────────────────────────────────────────

/// Plot surface backed by a wgpu swapchain.
pub struct GpuPlotSurface {
    gpu: Gpu,
    points: PointRenderer,
    background: Color,
}

impl GpuPlotSurface {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            points: PointRenderer::new(),
            background: Color::from(ColorRgba::white()),
        }
    }
}

impl DrawSurface for GpuPlotSurface {
    fn resize(&mut self, size: SizeUpdate) {
        self.gpu.resize(PhysicalSize::new(size.width, size.height));
    }

    fn draw(&mut self, frame: &PlotFrame<'_>) -> Result<FrameStatus, ChartError> {
        let points = &mut self.points;
        let status = render_frame(&self.gpu, self.background, |ctx, target| {
            points.upload(ctx, frame.revision, frame.instances);
            points.render(ctx, target, frame.x, frame.y);
        });

        match status {
            FrameStatus::Fatal => Err(ChartError::Fatal),
            status => Ok(status),
        }
    }
}

impl TransferSurface for SurfaceHandle {
    type Surface = GpuPlotSurface;

    fn acquire(self) -> Result<GpuPlotSurface, ChartError> {
        let gpu = pollster::block_on(Gpu::from_handle(self, GpuInit::default()))
            .map_err(|e| ChartError::Gpu(format!("{e:#}")))?;
        Ok(GpuPlotSurface::new(gpu))
    }
}

/// A winit window seen as a measurable canvas whose surface can be detached once.
pub struct WindowCanvas {
    window: Arc<Window>,
    transferred: bool,
}

impl WindowCanvas {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, transferred: false }
    }
}

impl Canvas for WindowCanvas {
    type Handle = SurfaceHandle;

    fn measure(&self) -> SizeUpdate {
        let size = self.window.inner_size();
        SizeUpdate::new(size.width, size.height)
    }

    fn transfer_control(&mut self) -> Result<SurfaceHandle, ChartError> {
        if self.transferred {
            return Err(ChartError::AlreadyTransferred);
        }
        let handle = SurfaceHandle::detach(Arc::clone(&self.window))
            .map_err(|e| ChartError::Unsupported(format!("{e:#}")))?;
        self.transferred = true;
        Ok(handle)
    }
}
