//! Coordinate and color value types shared across the engine and the chart layer.
//!
//! Canonical pixel space:
//! - Surface pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod color;
mod viewport;

pub use color::{ColorRgba, ParseColorError};
pub use viewport::Viewport;
