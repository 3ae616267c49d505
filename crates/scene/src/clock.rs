/// How the first tick's elapsed time is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstFrame {
    /// The first tick reports zero elapsed time.
    #[default]
    Zero,
    /// The previous-timestamp cursor starts at zero, so the first tick reports
    /// the whole time since the timestamp origin. The cube visibly jumps.
    SinceOrigin,
}

/// Timing snapshot for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Timestamp of this tick, in seconds.
    pub now: f64,
    pub frame_index: u64,
}

/// Turns host timestamps (milliseconds, monotonically increasing) into
/// per-frame elapsed seconds.
///
/// The clock never reads the system time itself, so a sequence of
/// timestamps always yields the same sequence of ticks.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    previous: Option<f64>,
    first_frame: FirstFrame,
    frame_index: u64,
}

impl AnimationClock {
    pub fn new(first_frame: FirstFrame) -> Self {
        Self {
            previous: None,
            first_frame,
            frame_index: 0,
        }
    }

    /// Number of ticks observed so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advance to `now_ms` and return the elapsed time since the last tick.
    pub fn tick(&mut self, now_ms: f64) -> FrameTick {
        let now = now_ms / 1000.0;
        let previous = match (self.previous, self.first_frame) {
            (Some(prev), _) => prev,
            (None, FirstFrame::Zero) => now,
            (None, FirstFrame::SinceOrigin) => 0.0,
        };
        self.previous = Some(now);

        let tick = FrameTick {
            dt: (now - previous) as f32,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        tracing::trace!(frame = tick.frame_index, dt = tick.dt, "clock tick");
        tick
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(FirstFrame::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero_by_default() {
        let mut clock = AnimationClock::default();
        let tick = clock.tick(5_000.0);
        assert_eq!(tick.dt, 0.0);
        assert_eq!(tick.frame_index, 0);
        assert_eq!(tick.now, 5.0);
    }

    #[test]
    fn since_origin_reports_the_cold_start_jump() {
        let mut clock = AnimationClock::new(FirstFrame::SinceOrigin);
        assert_eq!(clock.tick(1_500.0).dt, 1.5);
        assert!((clock.tick(1_516.0).dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn converts_milliseconds_to_seconds() {
        let mut clock = AnimationClock::default();
        clock.tick(1_000.0);
        let tick = clock.tick(1_250.0);
        assert!((tick.dt - 0.25).abs() < 1e-6);
        assert_eq!(tick.frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }
}
