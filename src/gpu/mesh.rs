//! Triangle meshes for the ornament classes and the tree topper.
//!
//! All generators produce indexed triangle lists with counter-clockwise
//! front faces. Faceted shapes duplicate vertices per face so every face
//! carries its own flat normal.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::attributes::OrnamentClass;

/// Vertex layout of every lit mesh. Matches `VertexInput` in `shaders/mesh.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a flat-shaded triangle. The normal is flipped to point away
    /// from the origin so closed convex shapes face outward.
    fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let base = self.vertices.len() as u16;
        for p in [a, b, c] {
            self.vertices.push(MeshVertex::new(p, normal));
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Append a flat quad `a b c d` wound counter-clockwise around `normal`.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u16;
        for p in corners {
            self.vertices.push(MeshVertex::new(p, normal));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Smooth sphere with `width_segments` around and `height_segments` pole to pole.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = MeshData::default();

    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * std::f32::consts::PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;
            let normal = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            mesh.vertices.push(MeshVertex::new(normal * radius, normal));
        }
    }

    let row = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = (y * row + x + 1) as u16;
            let b = (y * row + x) as u16;
            let c = ((y + 1) * row + x) as u16;
            let d = ((y + 1) * row + x + 1) as u16;
            // Degenerate triangles at the poles are skipped.
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Regular octahedron with vertices on the axes.
pub fn octahedron(radius: f32) -> MeshData {
    let axes = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let faces = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    let mut mesh = MeshData::default();
    for [a, b, c] in faces {
        mesh.push_flat_triangle(axes[a] * radius, axes[b] * radius, axes[c] * radius);
    }
    mesh
}

/// Axis-aligned box centred on the origin.
pub fn cuboid(size: Vec3) -> MeshData {
    let h = size * 0.5;
    let mut mesh = MeshData::default();
    // (normal, tangent u, tangent v) with u × v = normal.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        let centre = n * h;
        let du = u * h;
        let dv = v * h;
        mesh.push_quad(
            [
                centre - du - dv,
                centre + du - dv,
                centre + du + dv,
                centre - du + dv,
            ],
            n,
        );
    }
    mesh
}

/// Flat-shaded icosahedron.
pub fn icosahedron(radius: f32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|c| c.normalize() * radius);
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    let mut mesh = MeshData::default();
    for [a, b, c] in faces {
        mesh.push_flat_triangle(corners[a], corners[b], corners[c]);
    }
    mesh
}

/// Outline of a `points`-pointed star in the XY plane, starting at the
/// bottom tip and turning counter-clockwise.
pub fn star_outline(points: usize, outer_radius: f32, inner_radius: f32) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::PI / points as f32 - std::f32::consts::FRAC_PI_2;
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

/// Star outline extruded along Z with sharp edges, centred on `z = 0`.
pub fn extruded_star(points: usize, outer_radius: f32, inner_radius: f32, depth: f32) -> MeshData {
    let outline = star_outline(points, outer_radius, inner_radius);
    let half = depth * 0.5;
    let mut mesh = MeshData::default();

    // Caps are fans around the centre, which sees the whole outline.
    for (z, normal) in [(half, Vec3::Z), (-half, Vec3::NEG_Z)] {
        let base = mesh.vertices.len() as u16;
        mesh.vertices.push(MeshVertex::new(Vec3::new(0.0, 0.0, z), normal));
        for p in &outline {
            mesh.vertices.push(MeshVertex::new(p.extend(z), normal));
        }
        let n = outline.len() as u16;
        for i in 0..n {
            let a = base + 1 + i;
            let b = base + 1 + (i + 1) % n;
            if normal.z > 0.0 {
                mesh.indices.extend_from_slice(&[base, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[base, b, a]);
            }
        }
    }

    for i in 0..outline.len() {
        let p0 = outline[i];
        let p1 = outline[(i + 1) % outline.len()];
        let edge = p1 - p0;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        mesh.push_quad(
            [p0.extend(-half), p1.extend(-half), p1.extend(half), p0.extend(half)],
            normal,
        );
    }
    mesh
}

/// Mesh drawn for each ornament class.
pub fn ornament_mesh(class: OrnamentClass) -> MeshData {
    match class {
        OrnamentClass::Bauble => uv_sphere(0.8, 32, 32),
        OrnamentClass::Star => octahedron(1.0),
        OrnamentClass::HeavyBox => cuboid(Vec3::ONE),
        OrnamentClass::HeavySphere => uv_sphere(0.7, 32, 32),
        OrnamentClass::HeavyGem => icosahedron(0.8),
    }
}

/// The five-pointed topper star.
pub fn topper_mesh() -> MeshData {
    extruded_star(5, 0.9, 0.45, 0.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    /// Winding agrees with the stored normals.
    fn assert_front_faces_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let n = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            let face = (b - a).cross(c - a);
            assert!(face.dot(n) > 0.0, "triangle {tri:?} winds against its normal");
        }
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = uv_sphere(0.8, 16, 12);
        assert_valid(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 0.8).abs() < 1e-5);
        }
        // Poles lose one triangle per segment each.
        assert_eq!(mesh.triangle_count(), 16 * 12 * 2 - 2 * 16);
    }

    #[test]
    fn test_sphere_winding() {
        assert_front_faces_outward(&uv_sphere(1.0, 8, 6));
    }

    #[test]
    fn test_faceted_shapes() {
        let oct = octahedron(1.0);
        assert_eq!(oct.triangle_count(), 8);
        let ico = icosahedron(0.8);
        assert_eq!(ico.triangle_count(), 20);
        let cube = cuboid(Vec3::ONE);
        assert_eq!(cube.triangle_count(), 12);
        for mesh in [&oct, &ico, &cube] {
            assert_valid(mesh);
            assert_front_faces_outward(mesh);
        }
        for v in &ico.vertices {
            assert!((Vec3::from_array(v.position).length() - 0.8).abs() < 1e-5);
        }
    }

    #[test]
    fn test_star_outline() {
        let outline = star_outline(5, 0.9, 0.45);
        assert_eq!(outline.len(), 10);
        assert!((outline[0] - Vec2::new(0.0, -0.9)).length() < 1e-5);
        for (i, p) in outline.iter().enumerate() {
            let expected = if i % 2 == 0 { 0.9 } else { 0.45 };
            assert!((p.length() - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_extruded_star() {
        let mesh = topper_mesh();
        assert_valid(&mesh);
        assert_front_faces_outward(&mesh);
        // Two 10-triangle caps and ten side quads.
        assert_eq!(mesh.triangle_count(), 10 + 10 + 20);
        for v in &mesh.vertices {
            assert!(v.position[2].abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn test_every_class_has_a_mesh() {
        for class in OrnamentClass::ALL {
            let mesh = ornament_mesh(class);
            assert_valid(&mesh);
            assert!(mesh.vertices.len() < u16::MAX as usize);
        }
    }
}
