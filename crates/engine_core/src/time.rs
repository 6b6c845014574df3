//! Frame timing for the simulation loop, plus numeric sanitization.
//!
//! Everything that "waits" in the kernel compares durations against a
//! monotonic `now` in seconds that is passed in explicitly; tests drive
//! phase logic by feeding literal timestamps instead of sleeping.

use std::time::{Duration, Instant};

use glam::DVec2;

/// Frame clock: real delta time plus a fixed-step accumulator the
/// simulation consumes.
#[derive(Debug)]
pub struct Time {
    started: Instant,
    last_frame: Instant,
    delta: Duration,
    elapsed: Duration,
    frames: u64,
    fixed_step: Duration,
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// 60 Hz fixed step by default.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frames: 0,
            fixed_step: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Sample the clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.started;
        self.frames += 1;
        self.accumulator += self.delta;
    }

    /// Last frame's delta in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Monotonic seconds since the engine started. This is the `now` fed
    /// to the effect engine each tick.
    pub fn now_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fixed_step_seconds(&self) -> f32 {
        self.fixed_step.as_secs_f32()
    }

    /// True while the accumulator still holds a full fixed step; consumes
    /// one step per call.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_step {
            self.accumulator -= self.fixed_step;
            true
        } else {
            false
        }
    }

    /// Change the fixed step rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_step = Duration::from_secs_f64(1.0 / hz);
    }
}

/// Reset a non-finite scalar to a fallback, logging the offender. Invalid
/// numeric state degrades to a safe default instead of spreading.
pub fn sanitize_f64(value: f64, fallback: f64, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("non-finite {} ({}), resetting to {}", what, value, fallback);
        fallback
    }
}

/// Reset a vector with any non-finite component to a fallback.
pub fn sanitize_dvec2(value: DVec2, fallback: DVec2, what: &str) -> DVec2 {
    if value.x.is_finite() && value.y.is_finite() {
        value
    } else {
        log::warn!("non-finite {} ({:?}), resetting to {:?}", what, value, fallback);
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_update_consumes_accumulator() {
        let mut time = Time::new();
        time.set_fixed_rate(60.0);
        time.accumulator = Duration::from_secs_f64(1.0 / 30.0);
        assert!(time.should_fixed_update());
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
    }

    #[test]
    fn sanitize_passes_finite_values() {
        assert_eq!(sanitize_f64(3.5, 0.0, "x"), 3.5);
        let v = DVec2::new(1.0, -2.0);
        assert_eq!(sanitize_dvec2(v, DVec2::ZERO, "pos"), v);
    }

    #[test]
    fn sanitize_resets_nan_and_infinity() {
        assert_eq!(sanitize_f64(f64::NAN, 1.0, "x"), 1.0);
        assert_eq!(sanitize_f64(f64::INFINITY, 0.0, "x"), 0.0);
        let bad = DVec2::new(f64::NAN, 0.0);
        assert_eq!(sanitize_dvec2(bad, DVec2::ZERO, "pos"), DVec2::ZERO);
    }
}
