//! Fill colors for points.

use offcanvas_engine::coords::ColorRgba;

/// The "category10" qualitative palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Fill color for the point at `index`: palette entry `index % len`,
/// normalized to `[0, 1]` per channel with alpha.
pub fn fill_color(index: usize) -> ColorRgba {
    let hex = CATEGORY10[index % CATEGORY10.len()];
    // The palette is a compile-time constant of valid hex strings.
    ColorRgba::from_hex(hex).unwrap_or(ColorRgba::black())
}
