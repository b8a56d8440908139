//! Foliage: the 75k-point needle cloud.

use glam::Vec3;

use super::{FrameContext, GroupSpin, ParticleSystem, PointUniforms, PointVertex};
use crate::attributes::ParticleAttributeSet;
use crate::easing::ease_in_out_cubic;
use crate::morph::{local_progress, morph_position, ProgressFollower, FOLIAGE_STAGGER};

/// Per-frame follow factor of the foliage progress uniform.
pub const FOLIAGE_SMOOTHING: f32 = 0.08;

/// Group spin, radians per 60 Hz frame.
pub const FOLIAGE_SPIN: f32 = 0.002;

/// Radial breathing amplitude once assembled.
pub const BREATH_AMPLITUDE: f32 = 0.15;

/// Vertical floating amplitude while scattered.
pub const FLOAT_AMPLITUDE: f32 = 0.5;

/// Point-cloud system for the foliage cone.
pub struct FoliageSystem {
    attributes: ParticleAttributeSet,
    follower: ProgressFollower,
    spin: GroupSpin,
}

impl FoliageSystem {
    /// Wrap a generated attribute set. `smoothing` is the per-frame follow
    /// factor of the progress uniform.
    pub fn new(attributes: ParticleAttributeSet, smoothing: f32) -> Self {
        Self {
            attributes,
            follower: ProgressFollower::new(smoothing),
            spin: GroupSpin::new(FOLIAGE_SPIN),
        }
    }

    /// Static per-particle attributes.
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

    /// Eased morph factor of particle `i`.
    pub fn eased_progress(&self, i: usize) -> f32 {
        let seed = self.attributes.seeds()[i];
        ease_in_out_cubic(local_progress(self.follower.value(), seed, FOLIAGE_STAGGER))
    }

    /// Morphed position of particle `i` before the stylistic animation.
    pub fn base_position(&self, i: usize) -> Vec3 {
        morph_position(
            self.attributes.scatter_positions()[i],
            self.attributes.target_positions()[i],
            self.attributes.seeds()[i],
            self.follower.value(),
            FOLIAGE_STAGGER,
        )
    }

    /// Group-space position of particle `i` as the vertex shader places it.
    pub fn animated_position(&self, i: usize, elapsed: f32) -> Vec3 {
        let seed = self.attributes.seeds()[i];
        let progress = self.follower.value();
        let eased = self.eased_progress(i);
        let mut pos = self.base_position(i);

        if progress > 0.5 {
            let breath = (elapsed * 2.0 + seed * 15.0).sin() * BREATH_AMPLITUDE;
            let dir = Vec3::new(pos.x, 0.0, pos.z).normalize_or_zero();
            pos += dir * breath * eased;
        }
        if progress < 0.5 {
            let float = (elapsed * 0.5 + seed * 20.0).sin() * FLOAT_AMPLITUDE;
            pos.y += float * (1.0 - eased);
        }
        pos
    }
}

impl ParticleSystem for FoliageSystem {
    fn label(&self) -> &'static str {
        "Foliage"
    }

    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn update(&mut self, frame: &FrameContext) {
        self.follower.follow(frame.progress, frame.delta);
        self.spin.update(frame);
    }
}
