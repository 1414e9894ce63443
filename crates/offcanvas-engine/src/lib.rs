//! Offcanvas engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by higher layers:
//! the main-thread window loop on one side, and a GPU surface that can be
//! detached from its window and driven from another thread on the other.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
