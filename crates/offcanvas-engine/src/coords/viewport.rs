/// Viewport size in pixels.
///
/// Renderers should treat this as the coordinate basis for converting pixel
/// positions to NDC in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a surface of `width x height` pixels.
    #[inline]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::from_pixels(0, 600).is_valid());
        assert!(!Viewport::from_pixels(800, 0).is_valid());
        assert!(Viewport::from_pixels(800, 600).is_valid());
    }

    #[test]
    fn non_finite_viewport_is_invalid() {
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
    }
}
