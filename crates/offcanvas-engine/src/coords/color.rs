use std::fmt;

/// Straight-alpha RGBA color with channels normalized to `[0, 1]`.
///
/// This is the form colors take on their way into shader attributes. Renderers
/// that blend premultiplied convert through `paint::Color`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Creates a color from 8-bit channels.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parses a CSS-style hex color: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// The leading `#` is optional. Colors without an alpha component are opaque.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(ParseColorError::new(hex));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColorError::new(hex))
        };
        let nibble = |i: usize| {
            u8::from_str_radix(&digits[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| ParseColorError::new(hex))
        };

        match digits.len() {
            3 => Ok(Self::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            6 => Ok(Self::from_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(ParseColorError::new(hex)),
        }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A hex color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    pub input: String,
}

impl ParseColorError {
    fn new(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color {:?}", self.input)
    }
}

impl std::error::Error for ParseColorError {}
