use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What happened after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Recovery {
    /// The surface was lost or outdated and has been reconfigured.
    Reconfigured,
    /// Transient failure; drop this frame and try the next one.
    Skip,
    /// Out of memory. The surface cannot be used any more.
    Fatal,
}

/// One acquired swapchain image plus the encoder recording into it.
///
/// Holding it blocks further acquisitions; present it promptly.
pub struct AcquiredFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl AcquiredFrame {
    /// Submits the recorded commands and presents the image.
    pub fn present(self, queue: &wgpu::Queue) {
        let AcquiredFrame { texture, view, encoder } = self;
        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture.present();
    }
}

/// The surface together with its configuration and the size it tracks.
///
/// The tracked size may be zero (minimized window); the configuration keeps the
/// last non-zero size until a usable one arrives.
pub(crate) struct Swapchain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl Swapchain {
    pub(crate) fn configure(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Result<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(device, &config);

        Ok(Self { surface, config, size })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Tracks `new_size` and reconfigures when it is drawable and different.
    ///
    /// Returns whether the surface was reconfigured.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) -> bool {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return false;
        }
        if (self.config.width, self.config.height) == (new_size.width, new_size.height) {
            return false;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
        true
    }

    /// Acquires the next image. Under FIFO this is where the render loop waits
    /// for vblank.
    pub(crate) fn acquire(&self, device: &wgpu::Device) -> Result<AcquiredFrame, wgpu::SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("offcanvas frame encoder"),
        });
        Ok(AcquiredFrame { texture, view, encoder })
    }

    /// Reacts to an acquisition failure.
    pub(crate) fn recover(&self, device: &wgpu::Device, err: &wgpu::SurfaceError) -> Recovery {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(device, &self.config);
                }
                Recovery::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => Recovery::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Recovery::Skip,
        }
    }
}

/// First sRGB format from the preferred list, else whatever the surface lists first.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    const SRGB: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];

    if prefer_srgb {
        if let Some(f) = SRGB.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }
    formats.first().copied()
}

fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
