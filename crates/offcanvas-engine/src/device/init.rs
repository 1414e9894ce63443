/// Parameters for building a [`Gpu`](super::Gpu) from a detached surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// Swap behavior. `Fifo` makes acquisition wait for vblank, which is the
    /// only pacing the render loop gets.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; backends may clamp it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
