//! GPU device + surface management.
//!
//! This module is responsible for:
//! - detaching a window's drawing surface into a transferable [`SurfaceHandle`]
//! - creating the wgpu Adapter/Device/Queue on whichever thread receives it
//! - configuring the swapchain and acquiring frames

mod gpu;
mod handle;
mod init;
mod swapchain;

pub use gpu::Gpu;
pub use handle::SurfaceHandle;
pub use init::GpuInit;
pub use swapchain::{AcquiredFrame, Recovery};
