use std::time::{Duration, Instant};

/// Frame-rate counter reporting once per elapsed window.
#[derive(Clone, Debug)]
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frames_in_window: u64,
    total_frames: u64,
    last_fps: Option<f64>,
}

impl FpsCounter {
    /// Counter with a one-second reporting window.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }

    pub fn starting_at(start: Instant, window: Duration) -> Self {
        Self {
            window,
            window_start: start,
            frames_in_window: 0,
            total_frames: 0,
            last_fps: None,
        }
    }

    /// Record one frame. Returns the frame rate when a window just closed.
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames_in_window += 1;
        self.total_frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        // A zero window still waits for measurable time to pass.
        if elapsed < self.window || elapsed.is_zero() {
            return None;
        }
        let fps = self.frames_in_window as f64 / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames_in_window = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start, Duration::from_secs(1));
        for i in 1..10u64 {
            assert_eq!(fps.tick_at(start + Duration::from_millis(100 * i)), None);
        }
        let rate = fps.tick_at(start + Duration::from_secs(1)).expect("window closed");
        assert!((rate - 10.0).abs() < 1e-9);
        assert_eq!(fps.total_frames(), 10);
        assert_eq!(fps.tick_at(start + Duration::from_millis(1500)), None);
        assert_eq!(fps.last_fps(), Some(rate));
    }

    #[test]
    fn zero_window_never_reports_infinite_rate() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start, Duration::ZERO);
        assert_eq!(fps.tick_at(start), None);
        let rate = fps
            .tick_at(start + Duration::from_millis(500))
            .expect("time has passed");
        assert!(rate.is_finite());
        assert!((rate - 4.0).abs() < 1e-9);
    }
}
