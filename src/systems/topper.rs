//! Tree-topper star.

use glam::{Mat4, Vec3};

use super::{FrameContext, Material, MeshInstance, ParticleSystem, TREE_OFFSET};
use crate::easing::saturate;
use crate::spawn::hex_to_linear;

/// Height of the star above the tree-group origin, just clear of the foliage tip.
pub const TOPPER_HEIGHT: f32 = 9.6;

/// Spin while formed, radians per second.
pub const TOPPER_SPIN: f32 = -0.5;

/// Emissive strength while the tree is scattered.
const BASE_GLOW: f32 = 2.0;

const STAR_GOLD: u32 = 0xFFCF00;

/// A single extruded star that grows with the morph progress and pulses
/// while the tree is formed. Also drives the warm point light at its centre.
pub struct TopperStar {
    scale: f32,
    angle: f32,
    glow: f32,
    color: Vec3,
    instance: MeshInstance,
}

impl TopperStar {
    pub fn new() -> Self {
        let color = hex_to_linear(STAR_GOLD);
        let mut star = Self {
            scale: 0.0,
            angle: 0.0,
            glow: BASE_GLOW,
            color,
            instance: MeshInstance::new(Mat4::ZERO, color, Self::material(BASE_GLOW)),
        };
        star.rebuild();
        star
    }

    fn material(glow: f32) -> Material {
        Material {
            emissive: glow,
            roughness: 0.05,
            metalness: 1.0,
        }
    }

    /// Current uniform scale; equals the shared progress.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current emissive strength.
    pub fn glow(&self) -> f32 {
        self.glow
    }

    /// Rotation about the vertical axis.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// World position of the star and its light.
    pub fn light_position(&self) -> Vec3 {
        TREE_OFFSET + Vec3::new(0.0, TOPPER_HEIGHT, 0.0)
    }

    /// Intensity of the star light: follows the glow, gated by progress.
    pub fn light_intensity(&self) -> f32 {
        self.glow * 1.5 * self.scale
    }

    /// The single instance to draw.
    pub fn instance(&self) -> &MeshInstance {
        &self.instance
    }

    fn rebuild(&mut self) {
        let model = Mat4::from_translation(self.light_position())
            * Mat4::from_rotation_y(self.angle)
            * Mat4::from_scale(Vec3::splat(self.scale));
        self.instance = MeshInstance::new(model, self.color, Self::material(self.glow));
    }
}

impl Default for TopperStar {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem for TopperStar {
    fn label(&self) -> &'static str {
        "Topper"
    }

    fn len(&self) -> usize {
        1
    }

    fn update(&mut self, frame: &FrameContext) {
        self.scale = saturate(frame.progress);
        if frame.formed {
            let delta = if frame.delta.is_finite() { frame.delta.max(0.0) } else { 0.0 };
            self.angle = (self.angle + TOPPER_SPIN * delta) % std::f32::consts::TAU;
            let pulse = ((frame.elapsed * 5.0).sin() + 1.0) * 0.5;
            self.glow = BASE_GLOW + pulse * 4.0;
        }
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_scattered() {
        let mut star = TopperStar::new();
        star.update(&FrameContext::new(1.0, 0.016, 0.0, false));
        assert_eq!(star.scale(), 0.0);
        assert_eq!(star.light_intensity(), 0.0);
    }

    #[test]
    fn test_glow_pulses_in_range() {
        let mut star = TopperStar::new();
        for k in 0..100 {
            star.update(&FrameContext::new(k as f32 * 0.05, 0.05, 1.0, true));
            assert!((2.0..=6.0).contains(&star.glow()));
        }
        assert!(star.angle() < 0.0);
    }

    #[test]
    fn test_frozen_while_scattered() {
        let mut star = TopperStar::new();
        star.update(&FrameContext::new(0.3, 0.1, 0.5, false));
        assert_eq!(star.angle(), 0.0);
        assert_eq!(star.glow(), BASE_GLOW);
        let pos = star.instance().translation();
        assert!((pos - Vec3::new(0.0, 7.6, 0.0)).length() < 1e-5);
    }
}
