use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Time elapsed since the clock was created (or last reset).
    ///
    /// Unclamped; animations that are a pure function of time read this.
    pub elapsed: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per loop: the controller thread and the renderer thread each own
/// their own, so a stall on one side never shows up in the other's deltas.
///
/// Delta time is clamped to avoid pathological values when the loop is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self::with_clamps(
            Duration::from_micros(100), // 0.0001s
            Duration::from_millis(250), // 0.25s
        )
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            origin: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline and the elapsed origin.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.origin = now;
        self.last = now;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit instant.
    ///
    /// `now` earlier than the previous tick is treated as a zero delta (then clamped).
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.origin),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_after_a_stall() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.25);
        // elapsed is not clamped
        assert!(ft.elapsed >= Duration::from_secs(5));
    }

    #[test]
    fn dt_never_below_minimum() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let ft = clock.tick_at(start);
        assert!(ft.dt >= 0.0001 - f32::EPSILON);
    }
}
