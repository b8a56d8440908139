//! Golden spiral ribbons.

use glam::Vec3;

use super::{FrameContext, GroupSpin, ParticleSystem, PointUniforms, PointVertex};
use crate::attributes::ParticleAttributeSet;
use crate::morph::{morph_position, ProgressFollower, SPIRAL_STAGGER};

/// Per-frame follow factor of the spiral progress uniform.
pub const SPIRAL_SMOOTHING: f32 = 0.10;

/// Group spin, radians per 60 Hz frame. Slightly faster than the foliage.
pub const SPIRAL_SPIN: f32 = 0.003;

/// Relative XZ breathing of the assembled ribbons.
pub const SPIRAL_BREATH: f32 = 0.05;

/// Point-cloud system for the two helix ribbons.
pub struct SpiralSystem {
    attributes: ParticleAttributeSet,
    follower: ProgressFollower,
    spin: GroupSpin,
}

impl SpiralSystem {
    /// Wrap a generated spiral set with its own progress follower.
    pub fn new(attributes: ParticleAttributeSet, smoothing: f32) -> Self {
        Self {
            attributes,
            follower: ProgressFollower::new(smoothing),
            spin: GroupSpin::new(SPIRAL_SPIN),
        }
    }

    /// Static per-point attributes, ribbon progress included.
    pub fn attributes(&self) -> &ParticleAttributeSet {
        &self.attributes
    }

    /// Smoothed progress written to the shader.
    pub fn morph_progress(&self) -> f32 {
        self.follower.value()
    }

    /// Uniform block for this frame.
    pub fn uniforms(&self) -> PointUniforms {
        PointUniforms::new(self.spin.model(), self.follower.value())
    }

    /// Vertex data for upload.
    pub fn vertices(&self) -> Vec<PointVertex> {
        PointVertex::from_set(&self.attributes)
    }

    /// Morphed position of point `i` before breathing.
    pub fn base_position(&self, i: usize) -> Vec3 {
        morph_position(
            self.attributes.scatter_positions()[i],
            self.attributes.target_positions()[i],
            self.attributes.seeds()[i],
            self.follower.value(),
            SPIRAL_STAGGER,
        )
    }

    /// Group-space position of point `i` including the assembled breathing.
    pub fn animated_position(&self, i: usize, elapsed: f32) -> Vec3 {
        let mut pos = self.base_position(i);
        if self.follower.value() > 0.5 {
            let breath = 1.0 + (elapsed * 1.5).sin() * SPIRAL_BREATH;
            pos.x *= breath;
            pos.z *= breath;
        }
        pos
    }
}

/// Brightness band travelling up a ribbon: `sin(15·t − 4·elapsed)`.
#[inline]
pub fn ribbon_flow(ribbon_progress: f32, elapsed: f32) -> f32 {
    (ribbon_progress * 15.0 - elapsed * 4.0).sin()
}

impl ParticleSystem for SpiralSystem {
    fn label(&self) -> &'static str {
        "Spirals"
    }

    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn update(&mut self, frame: &FrameContext) {
        self.follower.follow(frame.progress, frame.delta);
        self.spin.update(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{generate, Role};
    use crate::spawn::SpawnContext;

    #[test]
    fn test_spins_faster_than_foliage() {
        assert!(SPIRAL_SPIN > crate::systems::FOLIAGE_SPIN);
    }

    #[test]
    fn test_breathing_scales_xz_only() {
        let mut ctx = SpawnContext::seeded(8);
        let mut spirals = SpiralSystem::new(generate(Role::Spiral, 200, &mut ctx), 1.0);
        spirals.update(&FrameContext::new(0.0, 1.0 / 60.0, 1.0, true));
        // sin(1.5 * π/3) = 1, so the ribbons are at their widest.
        let t = std::f32::consts::PI / 3.0;
        for i in 0..spirals.len() {
            let base = spirals.base_position(i);
            let moved = spirals.animated_position(i, t);
            assert_eq!(moved.y, base.y);
            assert!((moved.x - base.x * (1.0 + SPIRAL_BREATH)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ribbon_flow_range() {
        for i in 0..100 {
            let f = ribbon_flow(i as f32 / 100.0, i as f32 * 0.37);
            assert!((-1.0..=1.0).contains(&f));
        }
    }
}
