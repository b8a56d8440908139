//! Ambient snow. Independent of the morph: it falls and wraps forever.

use glam::{Mat4, Vec3};

use super::{FrameContext, ParticleSystem, PointUniforms, PointVertex};
use crate::attributes::{ParticleAttributeSet, SNOW_EXTENT};

/// Base fall speed; each flake adds `seed * 1.5`.
pub const FALL_SPEED: f32 = 2.0;

/// Distance from the top and bottom of the box over which flakes fade.
pub const EDGE_FADE: f32 = 8.0;

/// Point-cloud system for the snow box.
pub struct SnowSystem {
    attributes: ParticleAttributeSet,
}

impl SnowSystem {
    /// Wrap a generated snow set. Its scatter positions are the spawn points.
    pub fn new(attributes: ParticleAttributeSet) -> Self {
        Self { attributes }
    }

    /// Static per-flake attributes.
    pub fn attributes(&self) -> &ParticleAttributeSet {
        &self.attributes
    }

    /// Snow lives in world space and ignores the morph.
    pub fn uniforms(&self) -> PointUniforms {
        PointUniforms::new(Mat4::IDENTITY, 0.0)
    }

    /// Vertex data for upload.
    pub fn vertices(&self) -> Vec<PointVertex> {
        PointVertex::from_set(&self.attributes)
    }

    /// World position of flake `i`, as the vertex shader places it.
    pub fn position(&self, i: usize, elapsed: f32) -> Vec3 {
        let spawn = self.attributes.scatter_positions()[i];
        let seed = self.attributes.seeds()[i];
        let half = SNOW_EXTENT * 0.5;

        let fall = elapsed * (FALL_SPEED + seed * 1.5);
        let y = wrap(spawn.y - fall + half, SNOW_EXTENT) - half;

        let sway_time = elapsed * 0.5 + seed * 100.0;
        let sway_amp = 0.5 + seed * 0.5;
        let x = spawn.x + sway_time.sin() * sway_amp + (sway_time * 3.0).sin() * 0.2;
        let z = spawn.z + (sway_time * 0.8).cos() * sway_amp + (sway_time * 2.5).cos() * 0.2;

        Vec3::new(x, y, z)
    }

    /// Opacity of flake `i`: edge fade times a slow twinkle.
    pub fn alpha(&self, i: usize, elapsed: f32) -> f32 {
        let seed = self.attributes.seeds()[i];
        let y = self.position(i, elapsed).y;
        let half = SNOW_EXTENT * 0.5;
        let top = 1.0 - smoothstep(half - EDGE_FADE, half, y);
        let bottom = smoothstep(-half, -half + EDGE_FADE, y);
        let twinkle = 0.8 + 0.2 * (elapsed * 2.0 + seed * 50.0).sin();
        0.8 * top * bottom * twinkle
    }
}

/// Floor-based modulo, matching GLSL `mod`.
#[inline]
fn wrap(x: f32, period: f32) -> f32 {
    x - period * (x / period).floor()
}

#[inline]
fn smoothstep(lo: f32, hi: f32, x: f32) -> f32 {
    let t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl ParticleSystem for SnowSystem {
    fn label(&self) -> &'static str {
        "Snow"
    }

    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn update(&mut self, _frame: &FrameContext) {}
}
