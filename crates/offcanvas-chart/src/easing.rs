//! Zoom animation.
//!
//! The visible domain is a pure function of time, so there is no animation
//! state to keep between frames.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest half-width of the visible domain.
pub const AMPLITUDE: f64 = 5.0;

/// Easing scalar at `t`: oscillates in `[0.1, 5.0]` with a period of 2π seconds.
pub fn ease(t: Duration) -> f64 {
    AMPLITUDE * (0.51 + 0.49 * t.as_secs_f64().sin())
}

/// Current wall-clock time as a phase for [`ease`].
///
/// A clock set before 1970 reads as zero.
pub fn wall_clock() -> Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Symmetric axis bounds `(lower, upper)` around the origin at `t`.
pub fn bounds(t: Duration) -> (f32, f32) {
    let e = ease(t) as f32;
    (-e, e)
}
