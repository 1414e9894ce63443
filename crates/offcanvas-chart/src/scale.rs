//! Linear scales mapping data values to surface pixels.

use offcanvas_engine::render::shapes::point::AxisMap;

/// Continuous linear scale: `domain` (data) → `range` (pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    pub const fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f32, f32) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn set_domain(&mut self, domain: (f32, f32)) {
        self.domain = domain;
    }

    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }

    /// Affine coefficients of this scale.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn axis_map(&self) -> AxisMap {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return AxisMap::new(0.0, (r0 + r1) * 0.5);
        }
        let k = (r1 - r0) / span;
        AxisMap::new(k, r0 - d0 * k)
    }
}
