use crate::coords::Viewport;
use crate::device::{Gpu, Recovery};
use crate::paint::Color;

/// Device handles plus the pixel viewport of the frame being drawn.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Surface size in pixels.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    pub fn from_gpu(gpu: &'a Gpu) -> Self {
        let size = gpu.size();
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            viewport: Viewport::from_pixels(size.width, size.height),
        }
    }
}

/// Encoder + color view of the frame being drawn.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

/// Outcome of one [`render_frame`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame was drawn and presented.
    Presented,
    /// No frame was presented (zero-sized surface, transient or recovered
    /// surface error); try again next iteration.
    Skipped,
    /// The surface cannot be used any more.
    Fatal,
}

impl From<Recovery> for FrameStatus {
    fn from(recovery: Recovery) -> Self {
        match recovery {
            Recovery::Fatal => FrameStatus::Fatal,
            Recovery::Reconfigured | Recovery::Skip => FrameStatus::Skipped,
        }
    }
}

/// Clears the surface with `clear`, calls `draw`, then presents.
///
/// Acquisition blocks on the present mode, so calling this in a loop runs at
/// the display refresh rate under FIFO.
pub fn render_frame<F>(gpu: &Gpu, clear: Color, draw: F) -> FrameStatus
where
    F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
{
    let size = gpu.size();
    if size.width == 0 || size.height == 0 {
        return FrameStatus::Skipped;
    }

    let mut frame = match gpu.begin_frame() {
        Ok(f) => f,
        Err(recovery) => return recovery.into(),
    };

    // Clear pass; dropped before the encoder is handed to the draw callback.
    {
        let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("offcanvas clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view:           &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load:  wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes:         None,
            occlusion_query_set:      None,
            multiview_mask:           None,
        });
    }

    {
        let rctx = RenderCtx::from_gpu(gpu);
        let mut target = RenderTarget {
            encoder: &mut frame.encoder,
            color_view: &frame.view,
        };
        draw(&rctx, &mut target);
    }

    gpu.submit(frame);

    FrameStatus::Presented
}
