//! GPU rendering subsystem.
//!
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in surface pixels (top-left origin, +Y down) or in data
//!   space with a data-to-pixel map supplied per frame.
//! - Vertex shaders convert to NDC using a viewport uniform.

mod frame;
pub mod shapes;

pub use frame::{render_frame, FrameStatus, RenderCtx, RenderTarget};
