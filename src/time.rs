//! Frame clock.
//!
//! The single source of elapsed time and per-frame delta for the scene. Elapsed
//! time feeds every shader oscillator (breathing, twinkle, flow, sway); delta
//! is only consumed by the morph driver's rate integration.
//!
//! There is no pause: a backgrounded window simply produces one large delta on
//! the next frame, which the morph driver absorbs by clamping.
//!
//! # Example
//!
//! ```ignore
//! use tinsel::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per redraw:
//! let (elapsed, delta) = clock.tick();
//! ```

use std::time::{Duration, Instant};

/// Elapsed/delta time tracking for the frame loop.
#[derive(Debug)]
pub struct FrameClock {
    /// Wall time the clock was created.
    start: Instant,
    /// Wall time of the previous tick.
    last_frame: Instant,
    /// Time injected through [`FrameClock::advance`].
    advanced: Duration,
    /// Seconds since the scene started.
    elapsed_secs: f32,
    /// Seconds since the previous frame.
    delta_secs: f32,
    /// Frames since start.
    frame_count: u64,
    /// Frames per second, refreshed every `fps_update_interval`.
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            advanced: Duration::ZERO,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Sample wall time and advance. Call once per frame.
    ///
    /// Returns `(elapsed, delta)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count + 1 - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count + 1;
            self.fps_update_time = now;
        }

        self.record(delta)
    }

    /// Advance by an explicit delta instead of sampling wall time.
    ///
    /// Negative or non-finite deltas count as zero so elapsed time stays
    /// monotonic.
    pub fn advance(&mut self, delta: f32) -> (f32, f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.advanced += Duration::try_from_secs_f32(delta).unwrap_or(Duration::ZERO);
        self.record(delta)
    }

    /// Elapsed time is rebuilt from durations each frame so it never drifts.
    fn record(&mut self, delta: f32) -> (f32, f32) {
        self.delta_secs = delta;
        self.elapsed_secs = (self.last_frame.duration_since(self.start) + self.advanced).as_secs_f32();
        self.frame_count += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the scene started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent frames-per-second reading.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
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
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_tick() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        let (elapsed, delta) = clock.advance(0.5);
        assert!((elapsed - 0.75).abs() < 1e-6);
        assert_eq!(delta, 0.5);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_long_sessions_do_not_drift() {
        let mut clock = FrameClock::new();
        let frames = 60 * 60 * 60;
        for _ in 0..frames {
            clock.advance(1.0 / 60.0);
        }
        // An f32 running sum is off by well over a second here.
        let exact = frames as f64 * (1.0f32 / 60.0) as f64;
        assert!((clock.elapsed() as f64 - exact).abs() < 1e-3, "elapsed {}", clock.elapsed());
    }

    #[test]
    fn test_tick_measures_from_start() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        clock.tick();
        thread::sleep(Duration::from_millis(5));
        let (elapsed, delta) = clock.tick();
        assert!(elapsed >= 0.01);
        assert!(elapsed > delta);
        assert!(elapsed <= clock.start.elapsed().as_secs_f32());
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.advance(-3.0);
        assert_eq!(clock.delta(), 0.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
