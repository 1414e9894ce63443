//! Paint model used by renderers.
//!
//! Scope: color representation as it is blended on the GPU (linear,
//! premultiplied alpha). Value types coming from outside live in `coords`.

pub mod color;

pub use color::Color;
