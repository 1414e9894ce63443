//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the main-thread runtime
//! (platform loop) and the application driving it. The application never sees
//! the event loop itself; it gets the window, its size changes, and a regular
//! frame tick.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
