//! Instanced ornaments: baubles, fairy-light stars and the heavy base pile.
//!
//! Unlike the point clouds, the morph is evaluated here on the CPU, once per
//! instance per frame, and the resulting transforms are uploaded as a batch.
//! Weight drives the stylistic motion: light instances float and drift with a
//! larger amplitude and keep doing so longer, heavy ones settle upright.

use glam::{Mat4, Vec3};

use super::{FrameContext, GroupSpin, Material, MeshInstance, ParticleSystem};
use crate::attributes::{OrnamentClass, ParticleAttributeSet};
use crate::easing::Easing;
use crate::morph::{mix, ProgressFollower};

/// Per-frame follow factor. Ornaments track the shared progress directly.
pub const ORNAMENT_SMOOTHING: f32 = 1.0;

/// Group spin, radians per 60 Hz frame.
pub const ORNAMENT_SPIN: f32 = 0.001;

/// Above this progress only stars keep floating.
pub const FLOAT_CUTOFF: f32 = 0.98;

/// Above this progress heavy instances lock upright.
pub const SETTLE_THRESHOLD: f32 = 0.8;

/// Resolved transform of one ornament in tree-group space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Pose {
    /// Local model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Surface look of each class.
pub fn material_for(class: OrnamentClass) -> Material {
    match class {
        OrnamentClass::Bauble => Material {
            emissive: 0.0,
            roughness: 0.05,
            metalness: 1.0,
        },
        OrnamentClass::Star => Material {
            emissive: 4.0,
            roughness: 0.5,
            metalness: 0.0,
        },
        OrnamentClass::HeavyBox => Material {
            emissive: 0.0,
            roughness: 0.1,
            metalness: 0.95,
        },
        OrnamentClass::HeavySphere => Material {
            emissive: 0.0,
            roughness: 0.05,
            metalness: 1.0,
        },
        OrnamentClass::HeavyGem => Material {
            emissive: 0.0,
            roughness: 0.02,
            metalness: 1.0,
        },
    }
}

/// One instanced ornament class.
pub struct OrnamentSystem {
    class: OrnamentClass,
    attributes: ParticleAttributeSet,
    easing: Easing,
    material: Material,
    follower: ProgressFollower,
    spin: GroupSpin,
    instances: Vec<MeshInstance>,
}

impl OrnamentSystem {
    /// Wrap the attribute set of one ornament class.
    pub fn new(class: OrnamentClass, attributes: ParticleAttributeSet, smoothing: f32) -> Self {
        let mut system = Self {
            class,
            attributes,
            easing: Easing::default(),
            material: material_for(class),
            follower: ProgressFollower::new(smoothing),
            spin: GroupSpin::new(ORNAMENT_SPIN),
            instances: Vec::new(),
        };
        system.rebuild_instances(0.0);
        system
    }

    /// Use a different easing curve for the scatter/target blend.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self.rebuild_instances(0.0);
        self
    }

    pub fn class(&self) -> OrnamentClass {
        self.class
    }

    pub fn attributes(&self) -> &ParticleAttributeSet {
        &self.attributes
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn morph_progress(&self) -> f32 {
        self.follower.value()
    }

    /// Instance data from the last update, group transform included.
    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// Morphed position of instance `i` without floating.
    pub fn base_position(&self, i: usize) -> Vec3 {
        mix(
            self.attributes.scatter_positions()[i],
            self.attributes.target_positions()[i],
            self.easing.evaluate(self.follower.value()),
        )
    }

    fn weight(&self, i: usize) -> f32 {
        self.attributes.extras()[i]
    }

    /// Full pose of instance `i` at `elapsed` seconds.
    pub fn pose(&self, i: usize, elapsed: f32) -> Pose {
        let progress = self.follower.value();
        let weight = self.weight(i);
        let phase = self.attributes.seeds()[i] * 100.0;
        let is_star = self.class == OrnamentClass::Star;
        let mut position = self.base_position(i);

        if progress < FLOAT_CUTOFF || is_star {
            let lightness = 1.0 - weight;
            let amp = lightness * if progress < FLOAT_CUTOFF { 1.5 } else { 0.1 };
            let freq = 0.5 + lightness;
            position.y += (elapsed * freq + phase).sin() * amp * (1.0 - progress * 0.9);

            if is_star {
                let drift = amp * 0.5 * (1.0 - progress);
                position.x += (elapsed * 0.3 + phase).cos() * drift;
                position.z += (elapsed * 0.3 + phase).sin() * drift;
            }
        }

        let base = self.attributes.rotations()[i];
        let rotation = if self.class.is_heavy() && progress > SETTLE_THRESHOLD {
            Vec3::new(0.0, base.y, 0.0)
        } else {
            let inertia = weight + 0.1;
            Vec3::new(
                base.x + elapsed * 0.2 / inertia,
                base.y + elapsed * 0.1 / inertia,
                base.z,
            )
        };

        let size = self.attributes.sizes()[i];
        let scale = if is_star {
            size * (0.8 + 0.5 * (elapsed * 3.0 + phase).sin())
        } else {
            size * (0.9 + 0.1 * (elapsed + phase).sin())
        };

        Pose {
            position,
            rotation,
            scale,
        }
    }

    fn rebuild_instances(&mut self, elapsed: f32) {
        let group = self.spin.model();
        let instances: Vec<MeshInstance> = (0..self.attributes.len())
            .map(|i| {
                let pose = self.pose(i, elapsed);
                MeshInstance::new(group * pose.matrix(), self.attributes.colors()[i], self.material)
            })
            .collect();
        self.instances = instances;
    }
}

impl ParticleSystem for OrnamentSystem {
    fn label(&self) -> &'static str {
        match self.class {
            OrnamentClass::Bauble => "Baubles",
            OrnamentClass::Star => "Stars",
            OrnamentClass::HeavyBox => "Gift Boxes",
            OrnamentClass::HeavySphere => "Heavy Spheres",
            OrnamentClass::HeavyGem => "Gems",
        }
    }

    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn update(&mut self, frame: &FrameContext) {
        self.follower.follow(frame.progress, frame.delta);
        self.spin.update(frame);
        self.rebuild_instances(frame.elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{generate, Role};
    use crate::spawn::SpawnContext;

    fn system(class: OrnamentClass) -> OrnamentSystem {
        let mut ctx = SpawnContext::seeded(31);
        OrnamentSystem::new(class, generate(Role::Ornament(class), 40, &mut ctx), ORNAMENT_SMOOTHING)
    }

    fn formed(system: &mut OrnamentSystem, elapsed: f32) {
        system.update(&FrameContext::new(elapsed, 1.0 / 60.0, 1.0, true));
    }

    #[test]
    fn test_instances_match_count() {
        let sys = system(OrnamentClass::Bauble);
        assert_eq!(sys.instances().len(), 40);
    }

    #[test]
    fn test_assembled_baubles_sit_on_target() {
        let mut sys = system(OrnamentClass::Bauble);
        formed(&mut sys, 12.0);
        for i in 0..sys.len() {
            let target = sys.attributes().target_positions()[i];
            assert_eq!(sys.pose(i, 12.0).position, target);
            let world = sys.instances()[i].translation();
            let expected = sys.spin.model().transform_point3(target);
            assert!((world - expected).length() < 1e-4);
        }
    }

    #[test]
    fn test_heavy_lock_upright_when_settled() {
        let mut sys = system(OrnamentClass::HeavyBox);
        formed(&mut sys, 5.0);
        for i in 0..sys.len() {
            let rot = sys.pose(i, 5.0).rotation;
            assert_eq!(rot.x, 0.0);
            assert_eq!(rot.z, 0.0);
            assert_eq!(rot.y, sys.attributes().rotations()[i].y);
        }
    }

    #[test]
    fn test_scattered_heavy_items_tumble() {
        let sys = system(OrnamentClass::HeavyGem);
        let a = sys.pose(0, 1.0).rotation;
        let b = sys.pose(0, 2.0).rotation;
        assert!(b.x > a.x);
    }

    #[test]
    fn test_stars_keep_drifting() {
        let mut sys = system(OrnamentClass::Star);
        formed(&mut sys, 0.0);
        let moved = (0..sys.len()).any(|i| {
            let target = sys.attributes().target_positions()[i];
            (sys.pose(i, 3.7).position - target).length() > 1e-4
        });
        assert!(moved);
    }

    #[test]
    fn test_light_items_float_more() {
        let heavy = system(OrnamentClass::HeavySphere);
        let light = system(OrnamentClass::Star);
        let max_offset = |sys: &OrnamentSystem| {
            (0..sys.len())
                .flat_map(|i| (0..50).map(move |k| (i, k as f32 * 0.37)))
                .map(|(i, t)| (sys.pose(i, t).position.y - sys.base_position(i).y).abs())
                .fold(0.0_f32, f32::max)
        };
        assert!(max_offset(&light) > max_offset(&heavy));
        // Heavy weight is at least 0.8, so floating never exceeds 0.2 * 1.5.
        assert!(max_offset(&heavy) <= 0.3 + 1e-5);
    }

    #[test]
    fn test_quad_easing_option() {
        let sys = system(OrnamentClass::Bauble).with_easing(Easing::QuadInOut);
        assert_eq!(sys.base_position(0), sys.attributes().scatter_positions()[0]);
    }
}
