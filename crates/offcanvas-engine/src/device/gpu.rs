use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::swapchain::Swapchain;
use super::{AcquiredFrame, GpuInit, Recovery, SurfaceHandle};

/// Adapter, device, queue and swapchain for one detached surface.
///
/// A `Gpu` lives on the thread that renders; the window it presents into is
/// owned by another thread.
pub struct Gpu {
    swapchain: Swapchain,
    device: wgpu::Device,
    queue: wgpu::Queue,
    // Declared after `swapchain` so it is dropped after the surface.
    _instance: wgpu::Instance,
}

impl Gpu {
    /// Builds the GPU context for a surface handed over from the window thread.
    pub async fn from_handle(handle: SurfaceHandle, init: GpuInit) -> Result<Self> {
        let SurfaceHandle { instance, surface, size } = handle;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("offcanvas device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let swapchain = Swapchain::configure(surface, &adapter, &device, size, &init)?;

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), format {:?}, {}x{}, {:?}",
            info.name,
            info.backend,
            swapchain.format(),
            size.width,
            size.height,
            init.present_mode,
        );

        Ok(Self {
            swapchain,
            device,
            queue,
            _instance: instance,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Last size passed to [`resize`](Self::resize), in physical pixels. May be zero.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.swapchain.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.swapchain.resize(&self.device, new_size) {
            log::debug!("swapchain reconfigured to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Acquires the next frame, recovering from surface errors where possible.
    ///
    /// Blocks until vblank under FIFO.
    pub fn begin_frame(&self) -> std::result::Result<AcquiredFrame, Recovery> {
        self.swapchain.acquire(&self.device).map_err(|err| {
            let recovery = self.swapchain.recover(&self.device, &err);
            log::warn!("surface error: {err} ({recovery:?})");
            recovery
        })
    }

    /// Submits and presents a frame from [`begin_frame`](Self::begin_frame).
    pub fn submit(&self, frame: AcquiredFrame) {
        frame.present(&self.queue);
    }
}
