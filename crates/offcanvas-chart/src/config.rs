//! Startup parameters for the renderer.

/// Point count used when the parameter is absent or not a number.
pub const DEFAULT_POINT_COUNT: usize = 10_000;

/// Interprets the point-count startup parameter.
///
/// - absent, empty, or not a number → [`DEFAULT_POINT_COUNT`]
/// - numeric → truncated toward zero (`"2.9"` → 2, `"1e3"` → 1000)
/// - zero or negative → 0 (an empty dataset)
///
/// No other validation happens; huge values are taken at face value.
pub fn parse_point_count(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_POINT_COUNT;
    };

    if let Ok(n) = raw.parse::<i64>() {
        return usize::try_from(n).unwrap_or(0);
    }

    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            if n <= 0.0 {
                0
            } else {
                // `as` saturates at usize::MAX
                n.trunc() as usize
            }
        }
        _ => DEFAULT_POINT_COUNT,
    }
}

/// Renderer construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Number of synthetic points to generate.
    pub point_count: usize,
    /// Seed for the dataset RNG; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_uses_default() {
        assert_eq!(parse_point_count(None), DEFAULT_POINT_COUNT);
        assert_eq!(parse_point_count(Some("   ")), DEFAULT_POINT_COUNT);
    }

    #[test]
    fn non_numeric_parameter_uses_default() {
        assert_eq!(parse_point_count(Some("abc")), DEFAULT_POINT_COUNT);
        assert_eq!(parse_point_count(Some("NaN")), DEFAULT_POINT_COUNT);
        assert_eq!(parse_point_count(Some("inf")), DEFAULT_POINT_COUNT);
    }

    #[test]
    fn integer_parameter_is_taken_verbatim() {
        assert_eq!(parse_point_count(Some("500")), 500);
        assert_eq!(parse_point_count(Some(" 42 ")), 42);
    }

    #[test]
    fn non_positive_parameter_means_empty() {
        assert_eq!(parse_point_count(Some("0")), 0);
        assert_eq!(parse_point_count(Some("-12")), 0);
        assert_eq!(parse_point_count(Some("-0.5")), 0);
    }

    #[test]
    fn fractional_and_exponent_forms_truncate() {
        assert_eq!(parse_point_count(Some("2.9")), 2);
        assert_eq!(parse_point_count(Some("1e3")), 1000);
    }
}
