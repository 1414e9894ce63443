//! Main-thread clock label.
//!
//! Updated once per main-thread tick; if the main thread stalls, the label
//! stops moving while the plot keeps animating.

use std::fmt;
use std::time::Duration;

/// Elapsed-time label driven by the controller's frame clock.
///
/// Displays as `HH:MM:SS.mmm`; hours keep counting past 99.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heartbeat {
    elapsed: Duration,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a main-thread tick at `elapsed` since startup.
    pub fn beat(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }
}

impl fmt::Display for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed.as_millis();
        let (h, rem) = (ms / 3_600_000, ms % 3_600_000);
        let (m, rem) = (rem / 60_000, rem % 60_000);
        let (s, ms) = (rem / 1_000, rem % 1_000);
        write!(f, "{h:02}:{m:02}:{s:02}.{ms:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> String {
        let mut hb = Heartbeat::new();
        hb.beat(Duration::from_millis(ms));
        hb.to_string()
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(Heartbeat::new().to_string(), "00:00:00.000");
    }

    #[test]
    fn formats_each_field() {
        assert_eq!(at(1), "00:00:00.001");
        assert_eq!(at(61_250), "00:01:01.250");
        assert_eq!(at(3_723_004), "01:02:03.004");
    }

    #[test]
    fn hours_do_not_wrap() {
        assert_eq!(at(100 * 3_600_000), "100:00:00.000");
    }

    #[test]
    fn later_beat_replaces_earlier() {
        let mut hb = Heartbeat::new();
        for i in 0..5 {
            hb.beat(Duration::from_millis(i * 16));
        }
        assert_eq!(hb.to_string(), "00:00:00.064");
    }
}
