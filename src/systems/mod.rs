//! Per-particle-system renderers, CPU side.
//!
//! A system owns one [`ParticleAttributeSet`] and whatever per-frame state it
//! needs to turn the shared morph progress into GPU inputs: a smoothed copy of
//! the progress, a group spin angle, or a batch of instance transforms. None
//! of this touches the GPU, so every system can be stepped and inspected in
//! tests. The GPU passes in [`crate::gpu`] only upload what the systems expose.
//!
//! Point clouds (foliage, spirals, snow) only expose a [`PointUniforms`] block;
//! the vertex shader does the per-particle morph. Instanced meshes (ornaments,
//! tree topper) compute every transform here and expose [`MeshInstance`]s.

mod foliage;
mod ornaments;
mod snow;
mod spiral;
mod topper;

pub use foliage::{FoliageSystem, BREATH_AMPLITUDE, FLOAT_AMPLITUDE, FOLIAGE_SMOOTHING, FOLIAGE_SPIN};
pub use ornaments::{material_for, OrnamentSystem, Pose, ORNAMENT_SMOOTHING, ORNAMENT_SPIN};
pub use snow::{SnowSystem, EDGE_FADE, FALL_SPEED};
pub use spiral::{ribbon_flow, SpiralSystem, SPIRAL_BREATH, SPIRAL_SMOOTHING, SPIRAL_SPIN};
pub use topper::{TopperStar, TOPPER_HEIGHT};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::attributes::ParticleAttributeSet;
use crate::morph::per_frame_to_per_second;

/// Vertical offset of the whole tree group in world space.
pub const TREE_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// Morph progress above which the tree groups start to spin.
pub const SPIN_THRESHOLD: f32 = 0.8;

/// Everything a system may read during one frame.
///
/// Built once per frame by the composer after the morph driver has run, so
/// every system sees the same `progress`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Shared morph progress for this frame.
    pub progress: f32,
    /// Current value of the `is_formed` toggle.
    pub formed: bool,
}

impl FrameContext {
    /// Context for a frame at `elapsed` seconds with the given progress.
    pub fn new(elapsed: f32, delta: f32, progress: f32, formed: bool) -> Self {
        Self {
            elapsed,
            delta,
            progress,
            formed,
        }
    }
}

/// A renderer's CPU half.
pub trait ParticleSystem {
    /// Short name used in logs and GPU labels.
    fn label(&self) -> &'static str;

    /// Number of points or instances drawn.
    fn len(&self) -> usize;

    /// Whether nothing is drawn.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance per-frame state. Called once per frame, after the morph driver.
    fn update(&mut self, frame: &FrameContext);
}

/// Accumulated rotation of a tree group about the vertical axis.
///
/// Spins only while the shared progress is above [`SPIN_THRESHOLD`]; the
/// speed is given per 60 Hz frame and scaled by the real frame delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSpin {
    angle: f32,
    per_second: f32,
}

impl GroupSpin {
    /// Spin of `per_frame` radians per 60 Hz frame.
    pub fn new(per_frame: f32) -> Self {
        Self {
            angle: 0.0,
            per_second: per_frame_to_per_second(per_frame),
        }
    }

    /// Advance for one frame.
    pub fn update(&mut self, frame: &FrameContext) {
        if frame.progress > SPIN_THRESHOLD && frame.delta.is_finite() {
            self.angle = (self.angle + self.per_second * frame.delta.max(0.0))
                % std::f32::consts::TAU;
        }
    }

    /// Current angle in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Model matrix of the tree group with this spin applied.
    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(TREE_OFFSET) * Mat4::from_rotation_y(self.angle)
    }
}

// ========== GPU-facing layouts ==========

/// Per-point vertex data shared by every point-cloud pipeline.
///
/// Matches `PointInput` in `shaders/points.wgsl`. Snow stores its spawn
/// position in `scatter`; spirals store ribbon progress in `extra`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointVertex {
    pub scatter: [f32; 3],
    pub seed: f32,
    pub target: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub extra: f32,
}

impl PointVertex {
    /// Interleave an attribute set into upload order.
    pub fn from_set(set: &ParticleAttributeSet) -> Vec<PointVertex> {
        (0..set.len())
            .map(|i| PointVertex {
                scatter: set.scatter_positions()[i].to_array(),
                seed: set.seeds()[i],
                target: set.target_positions()[i].to_array(),
                size: set.sizes()[i],
                color: set.colors()[i].to_array(),
                extra: set.extras()[i],
            })
            .collect()
    }
}

/// Per-system uniform block for point clouds.
///
/// Matches `SystemUniforms` in `shaders/points.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    pub model: [[f32; 4]; 4],
    pub morph_progress: f32,
    pub _padding: [f32; 3],
}

impl PointUniforms {
    /// Uniforms for the given model matrix and smoothed progress.
    pub fn new(model: Mat4, morph_progress: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            morph_progress,
            _padding: [0.0; 3],
        }
    }
}

/// Per-instance data for lit instanced meshes.
///
/// Matches `InstanceInput` in `shaders/mesh.wgsl`. `model` already contains
/// the group transform.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub emissive: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub _padding: [f32; 2],
}

/// Surface parameters of an instanced mesh class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Emissive strength applied to the instance colour.
    pub emissive: f32,
    /// 0 = mirror, 1 = fully diffuse.
    pub roughness: f32,
    /// 0 = dielectric, 1 = metal.
    pub metalness: f32,
}

impl MeshInstance {
    /// Instance from a model matrix, colour and material.
    pub fn new(model: Mat4, color: Vec3, material: Material) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
            emissive: material.emissive,
            roughness: material.roughness,
            metalness: material.metalness,
            _padding: [0.0; 2],
        }
    }

    /// World-space translation of the instance.
    pub fn translation(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.model).w_axis.truncate()
    }
}
