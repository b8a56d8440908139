//! Morph progress: the one piece of shared mutable state in a scene.
//!
//! [`MorphDriver`] owns `progress ∈ [0, 1]` and moves it toward the target
//! selected by the `is_formed` toggle. Every particle system reads it once
//! per frame, optionally through its own [`ProgressFollower`] so that systems
//! lag each other by different amounts.
//!
//! The per-particle half of the morph lives here too: [`local_progress`]
//! staggers particles by their random seed and [`morph_position`] is the CPU
//! mirror of the point-cloud vertex shaders.
//!
//! ```ignore
//! let mut driver = MorphDriver::new(1.5);
//! driver.set_formed(true);
//! for _ in 0..240 {
//!     driver.update(1.0 / 60.0);
//! }
//! assert_eq!(driver.progress(), 1.0);
//! ```

use glam::Vec3;

use crate::easing::{ease_in_out_cubic, saturate};

/// Approach speed of the driver, per second.
pub const DEFAULT_MORPH_RATE: f32 = 1.5;

/// Distance at which the driver snaps onto its target.
pub const SETTLE_EPSILON: f32 = 1e-3;

/// Distance at which a follower snaps onto the value it follows.
pub const FOLLOW_EPSILON: f32 = 1e-4;

/// Seed-based stagger used by the foliage cloud.
pub const FOLIAGE_STAGGER: f32 = 0.2;

/// Seed-based stagger used by the golden spirals.
pub const SPIRAL_STAGGER: f32 = 0.1;

/// Frame rate the per-frame smoothing factors are tuned for.
const REFERENCE_FPS: f32 = 60.0;

/// The two logical arrangements a scene can be heading toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphState {
    /// Particles drift on their spherical shells.
    Scattered,
    /// Particles sit on the cone, spirals and clusters.
    Assembled,
}

impl MorphState {
    /// Progress value this state settles at.
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            MorphState::Scattered => 0.0,
            MorphState::Assembled => 1.0,
        }
    }
}

impl From<bool> for MorphState {
    fn from(formed: bool) -> Self {
        if formed {
            MorphState::Assembled
        } else {
            MorphState::Scattered
        }
    }
}

/// First-order approach of `progress` toward 0 or 1.
#[derive(Debug, Clone)]
pub struct MorphDriver {
    progress: f32,
    state: MorphState,
    rate: f32,
}

impl MorphDriver {
    /// Start fully scattered, heading nowhere, with the given approach rate.
    pub fn new(rate: f32) -> Self {
        Self {
            progress: 0.0,
            state: MorphState::Scattered,
            rate: if rate.is_finite() { rate.max(0.0) } else { DEFAULT_MORPH_RATE },
        }
    }

    /// Select the target arrangement.
    pub fn set_formed(&mut self, formed: bool) {
        let state = MorphState::from(formed);
        if state != self.state {
            log::debug!("morph target -> {:?} at progress {:.3}", state, self.progress);
            self.state = state;
        }
    }

    /// Flip the target arrangement. Returns the new `is_formed` value.
    pub fn toggle(&mut self) -> bool {
        let formed = !self.is_formed();
        self.set_formed(formed);
        formed
    }

    /// Whether the driver is heading toward the assembled tree.
    #[inline]
    pub fn is_formed(&self) -> bool {
        self.state == MorphState::Assembled
    }

    /// Target arrangement.
    #[inline]
    pub fn state(&self) -> MorphState {
        self.state
    }

    /// Current progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Approach rate, per second.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Whether progress has reached its target exactly.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.progress == self.state.target()
    }

    /// Integrate one frame: `progress += (target - progress) * rate * delta`.
    ///
    /// A step that would cross the target lands on it instead, so large
    /// deltas (a backgrounded tab) cannot cause overshoot or ringing.
    pub fn update(&mut self, delta: f32) -> f32 {
        let target = self.state.target();
        if !self.progress.is_finite() {
            self.progress = target;
        }
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        let diff = target - self.progress;
        if diff.abs() <= SETTLE_EPSILON {
            self.progress = target;
            return self.progress;
        }

        let next = self.progress + diff * self.rate * delta;
        self.progress = if (target - next) * diff <= 0.0 || !next.is_finite() {
            target
        } else {
            saturate(next)
        };
        self.progress
    }
}

impl Default for MorphDriver {
    fn default() -> Self {
        Self::new(DEFAULT_MORPH_RATE)
    }
}

/// Renderer-local exponential smoothing of the shared progress.
///
/// `factor` is the fraction of the remaining distance covered per 60 Hz frame;
/// it is rescaled by the actual frame delta so the lag does not depend on the
/// display refresh rate. A factor of `1.0` follows with no lag.
#[derive(Debug, Clone)]
pub struct ProgressFollower {
    value: f32,
    factor: f32,
}

impl ProgressFollower {
    /// Follower starting at zero.
    pub fn new(factor: f32) -> Self {
        Self {
            value: 0.0,
            factor: saturate(factor),
        }
    }

    /// Current smoothed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Move toward `progress` for one frame and return the smoothed value.
    pub fn follow(&mut self, progress: f32, delta: f32) -> f32 {
        let progress = saturate(progress);
        if !self.value.is_finite() {
            self.value = progress;
        }

        let alpha = if self.factor >= 1.0 {
            1.0
        } else {
            let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
            1.0 - (1.0 - self.factor).powf(delta * REFERENCE_FPS)
        };

        self.value += (progress - self.value) * alpha;
        if (progress - self.value).abs() < FOLLOW_EPSILON {
            self.value = progress;
        }
        self.value = saturate(self.value);
        self.value
    }
}

/// Per-particle progress: `clamp((progress - seed * stagger) / (1 - stagger), 0, 1)`.
///
/// Particles with a larger seed start later and arrive later; at `progress`
/// 0 and 1 every seed in `[0, 1]` resolves to exactly 0 and 1.
#[inline]
pub fn local_progress(progress: f32, seed: f32, stagger: f32) -> f32 {
    saturate((progress - seed * stagger) / (1.0 - stagger))
}

/// Component-wise `a * (1 - t) + b * t`, exact at both ends.
#[inline]
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Resolved base position of a staggered, cubic-eased point.
#[inline]
pub fn morph_position(scatter: Vec3, target: Vec3, seed: f32, progress: f32, stagger: f32) -> Vec3 {
    mix(scatter, target, ease_in_out_cubic(local_progress(progress, seed, stagger)))
}

/// Radians per second for a rotation given in radians per 60 Hz frame.
#[inline]
pub fn per_frame_to_per_second(per_frame: f32) -> f32 {
    per_frame * REFERENCE_FPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_starts_scattered() {
        let driver = MorphDriver::default();
        assert_eq!(driver.progress(), 0.0);
        assert_eq!(driver.state(), MorphState::Scattered);
        assert!(driver.is_settled());
    }

    #[test]
    fn test_driver_settles_exactly() {
        let mut driver = MorphDriver::default();
        driver.set_formed(true);
        for _ in 0..600 {
            driver.update(1.0 / 60.0);
        }
        assert_eq!(driver.progress(), 1.0);
        assert!(driver.is_settled());
    }

    #[test]
    fn test_large_delta_clamps_to_target() {
        let mut driver = MorphDriver::default();
        driver.set_formed(true);
        assert_eq!(driver.update(5.0), 1.0);
        driver.set_formed(false);
        assert_eq!(driver.update(5.0), 0.0);
    }

    #[test]
    fn test_nan_delta_is_harmless() {
        let mut driver = MorphDriver::default();
        driver.set_formed(true);
        driver.update(0.1);
        let before = driver.progress();
        assert_eq!(driver.update(f32::NAN), before);
        assert_eq!(driver.update(-1.0), before);
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut driver = MorphDriver::default();
        assert!(driver.toggle());
        assert_eq!(driver.state(), MorphState::Assembled);
        assert!(!driver.toggle());
    }

    #[test]
    fn test_follower_lags_then_catches_up() {
        let mut follower = ProgressFollower::new(0.08);
        let first = follower.follow(1.0, 1.0 / 60.0);
        assert!((first - 0.08).abs() < 1e-5);
        for _ in 0..1000 {
            follower.follow(1.0, 1.0 / 60.0);
        }
        assert_eq!(follower.value(), 1.0);
    }

    #[test]
    fn test_follower_is_frame_rate_independent() {
        let mut at_60 = ProgressFollower::new(0.1);
        let mut at_120 = ProgressFollower::new(0.1);
        for _ in 0..30 {
            at_60.follow(1.0, 1.0 / 60.0);
        }
        for _ in 0..60 {
            at_120.follow(1.0, 1.0 / 120.0);
        }
        assert!((at_60.value() - at_120.value()).abs() < 1e-3);
    }

    #[test]
    fn test_unit_factor_follows_without_lag() {
        let mut follower = ProgressFollower::new(1.0);
        assert_eq!(follower.follow(0.37, 1.0 / 60.0), 0.37);
    }

    #[test]
    fn test_local_progress_endpoints() {
        for seed in [0.0, 0.3, 0.999, 1.0] {
            assert_eq!(local_progress(0.0, seed, FOLIAGE_STAGGER), 0.0);
            assert_eq!(local_progress(1.0, seed, FOLIAGE_STAGGER), 1.0);
        }
    }

    #[test]
    fn test_morph_position_endpoints() {
        let scatter = Vec3::new(12.5, -3.25, 7.0);
        let target = Vec3::new(-1.5, 4.0, 0.75);
        for stagger in [FOLIAGE_STAGGER, SPIRAL_STAGGER] {
            for seed in [0.0, 0.42, 1.0] {
                assert_eq!(morph_position(scatter, target, seed, 0.0, stagger), scatter);
                assert_eq!(morph_position(scatter, target, seed, 1.0, stagger), target);
            }
        }
        let halfway = morph_position(scatter, target, 0.0, 0.5, SPIRAL_STAGGER);
        assert_ne!(halfway, scatter);
        assert_ne!(halfway, target);
    }

    #[test]
    fn test_mix_is_exact_at_ends() {
        let a = Vec3::new(12.3, -4.56, 7.89);
        let b = Vec3::new(-0.1, 3.3, 2.2);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
    }
}
