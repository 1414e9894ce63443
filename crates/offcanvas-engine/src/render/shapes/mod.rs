//! Shape renderers.

mod common;

pub mod point;
