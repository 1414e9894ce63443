//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window on the main thread. The window's
//! GPU surface is not managed here; applications detach it and render from
//! wherever they like.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::dpi::PhysicalSize;
pub use winit::window::Window;
