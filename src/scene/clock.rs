use std::time::{Duration, Instant};

/// Frame pacing for a scene loop.
///
/// `tick` waits until the target frame time has passed and reports the real
/// elapsed time in milliseconds. Long stalls are clamped so a paused or
/// dragged window doesn't make sprites jump across the screen.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_delta(Duration::from_millis(250))
    }

    pub fn with_max_delta(dt_max: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_max,
        }
    }

    /// Restart timing from now
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Frames ticked so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Sleep out the rest of a `1/fps` frame (no limit when `fps` is 0),
    /// then return milliseconds since the previous tick
    pub fn tick(&mut self, fps: u32) -> f32 {
        if fps > 0 {
            let target = Duration::from_secs_f64(1.0 / fps as f64);
            let spent = self.last.elapsed();
            if spent < target {
                std::thread::sleep(target - spent);
            }
        }

        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;
        self.frame_index = self.frame_index.wrapping_add(1);

        dt.as_secs_f32() * 1000.0
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
    fn test_tick_waits_for_frame_time() {
        let mut clock = FrameClock::new();
        let delta = clock.tick(100);
        assert!(delta >= 9.0, "delta was {}", delta);
        assert_eq!(clock.frame_index(), 1);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::with_max_delta(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.tick(0) <= 5.0);
    }
}
