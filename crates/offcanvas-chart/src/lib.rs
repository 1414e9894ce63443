//! Off-main-thread scatter plot.
//!
//! The main thread keeps a [`Controller`](controller::Controller): it measures
//! the drawing area, detaches the drawing surface once, and forwards every size
//! it measures. The surface and all sizes travel over a channel to a
//! [`Renderer`](renderer::Renderer) living on a worker thread, which owns the
//! dataset and runs the animation loop at display refresh rate. Nothing the main
//! thread does (short of dropping the worker) can stall that loop.

pub mod config;
pub mod controller;
pub mod dataset;
pub mod easing;
pub mod error;
pub mod heartbeat;
pub mod message;
pub mod palette;
pub mod renderer;
pub mod scale;
pub mod surface;
pub mod worker;

#[cfg(test)]
mod testing;

pub use controller::{Canvas, Controller, Notify, RenderPort};
pub use error::ChartError;
pub use message::{RenderMessage, RendererEvent, SizeUpdate};
pub use renderer::Renderer;
pub use worker::{RenderWorker, ShutdownToken, WorkerConfig};
