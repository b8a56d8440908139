//! WGSL sources and the uniform blocks they share with the CPU.
//!
//! Each program is assembled from `common.wgsl` (globals, easing, stagger),
//! `points.wgsl` for the point sprites, and the program body.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

pub const COMMON_SOURCE: &str = include_str!("shaders/common.wgsl");
pub const POINTS_SOURCE: &str = include_str!("shaders/points.wgsl");
pub const FOLIAGE_SOURCE: &str = include_str!("shaders/foliage.wgsl");
pub const SPIRAL_SOURCE: &str = include_str!("shaders/spiral.wgsl");
pub const SNOW_SOURCE: &str = include_str!("shaders/snow.wgsl");
pub const MESH_SOURCE: &str = include_str!("shaders/mesh.wgsl");

/// The render programs used by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderProgram {
    Foliage,
    Spiral,
    Snow,
    Mesh,
}

impl ShaderProgram {
    pub const ALL: [ShaderProgram; 4] = [
        ShaderProgram::Foliage,
        ShaderProgram::Spiral,
        ShaderProgram::Snow,
        ShaderProgram::Mesh,
    ];

    /// Complete WGSL module text.
    pub fn source(self) -> String {
        let body = match self {
            ShaderProgram::Foliage => FOLIAGE_SOURCE,
            ShaderProgram::Spiral => SPIRAL_SOURCE,
            ShaderProgram::Snow => SNOW_SOURCE,
            ShaderProgram::Mesh => MESH_SOURCE,
        };
        match self {
            ShaderProgram::Mesh => format!("{COMMON_SOURCE}\n{body}"),
            _ => format!("{COMMON_SOURCE}\n{POINTS_SOURCE}\n{body}"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShaderProgram::Foliage => "Foliage Shader",
            ShaderProgram::Spiral => "Spiral Shader",
            ShaderProgram::Snow => "Snow Shader",
            ShaderProgram::Mesh => "Mesh Shader",
        }
    }
}

/// Per-frame globals, bound at group 0 by every pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub time: f32,
    pub viewport: [f32; 2],
    pub pixel_ratio: f32,
    pub _padding: f32,
}

impl FrameUniforms {
    pub fn new(view: Mat4, proj: Mat4, camera_position: Vec3, time: f32, viewport: Vec2, pixel_ratio: f32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
            time,
            viewport: viewport.to_array(),
            pixel_ratio,
            _padding: 0.0,
        }
    }
}

/// Scene lighting for the mesh program, bound at group 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub key_direction: [f32; 4],
    pub key_color: [f32; 4],
    pub fill_direction: [f32; 4],
    pub fill_color: [f32; 4],
    pub star_position: [f32; 4],
    pub star_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl LightUniforms {
    /// Warm key from above, dim teal fill from below, and the topper light.
    pub fn new(star_position: Vec3, star_intensity: f32) -> Self {
        let key = Vec3::new(10.0, 40.0, 10.0).normalize();
        let fill = Vec3::new(-10.0, -10.0, -10.0).normalize();
        let key_color = crate::spawn::hex_to_linear(0xFFF5CC);
        let fill_color = crate::spawn::hex_to_linear(0x004433);
        let star_color = crate::spawn::hex_to_linear(0xFFAA00);
        let ambient = crate::spawn::hex_to_linear(0x00100D) * 0.2;
        Self {
            key_direction: key.extend(2.0).to_array(),
            key_color: key_color.extend(1.0).to_array(),
            fill_direction: fill.extend(1.0).to_array(),
            fill_color: fill_color.extend(1.0).to_array(),
            star_position: star_position.extend(star_intensity).to_array(),
            star_color: star_color.extend(25.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
        }
    }
}
