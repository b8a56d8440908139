//! Per-particle attribute generation.
//!
//! Every particle system in the scene is backed by one [`ParticleAttributeSet`]:
//! parallel arrays indexed by particle, generated once when the scene is built
//! and never mutated afterwards. Morphing only changes the interpolation
//! parameter the renderers feed into the shaders, not these arrays.
//!
//! Generation is driven by a [`Role`]. Ornament classes differ only in data,
//! so they share one code path configured by an [`OrnamentProfile`] table.
//!
//! ```ignore
//! let mut ctx = SpawnContext::seeded(42);
//! let foliage = generate(Role::Foliage, Role::Foliage.default_count(), &mut ctx);
//! assert_eq!(foliage.len(), 75_000);
//! ```

use std::f32::consts::{PI, TAU};

use crate::error::AttributeError;
use crate::spawn::{cone_radius_at, hex_to_linear, SpawnContext};
use crate::Vec3;

// ========== Scene composition constants ==========

/// Height of the foliage cone and the spiral helix.
pub const TREE_HEIGHT: f32 = 18.0;
/// Foliage cone radius at its base.
pub const FOLIAGE_BASE_RADIUS: f32 = 7.0;
/// Number of foliage particles.
pub const FOLIAGE_COUNT: usize = 75_000;
/// Probability that a foliage particle is a gold sparkle.
pub const GOLD_SPARKLE_CHANCE: f32 = 0.08;

/// Number of spiral ribbons, evenly offset around the tree.
pub const RIBBON_COUNT: usize = 2;
/// Points per spiral ribbon.
pub const POINTS_PER_RIBBON: usize = 2000;
/// Spiral radius at the base, slightly wider than the foliage.
pub const SPIRAL_BASE_RADIUS: f32 = 8.0;
/// Full turns each ribbon makes from base to tip.
pub const SPIRAL_ROTATIONS: f32 = 3.5;
/// Radial jitter giving the ribbons their width.
pub const RIBBON_WIDTH: f32 = 0.6;

/// Height of the cone ornaments hang on.
pub const ORNAMENT_TREE_HEIGHT: f32 = 16.0;
/// Radius of that cone at its base.
pub const ORNAMENT_BASE_RADIUS: f32 = 6.5;

/// Number of snow flakes.
pub const SNOW_COUNT: usize = 5000;
/// Edge length of the cube the snow falls through.
pub const SNOW_EXTENT: f32 = 60.0;

const EMERALD: u32 = 0x004D3D;
const EMERALD_LITE: u32 = 0x107A5D;
const GOLD_METALLIC: u32 = 0xD4AF37;
const WHITE_WARM: u32 = 0xFFFDD0;
const VIVID_RED: u32 = 0xFF0040;
const VIVID_GOLD: u32 = 0xFFCC00;
const VIVID_GREEN: u32 = 0x00DD66;
const VIVID_BLUE: u32 = 0x0066FF;
const VIVID_WHITE: u32 = 0xFFFFFF;

/// Silver tint for the cooler half of the snow.
pub const SNOW_SILVER: Vec3 = Vec3::new(0.85, 0.90, 0.95);

// ========== Roles ==========

/// Instanced ornament classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentClass {
    /// Medium glossy spheres hanging on the branches.
    Bauble,
    /// Small emissive fairy lights.
    Star,
    /// Gift boxes piled at the base.
    HeavyBox,
    /// Small glossy spheres piled at the base.
    HeavySphere,
    /// Faceted gems piled at the base.
    HeavyGem,
}

impl OrnamentClass {
    /// All classes in draw order.
    pub const ALL: [OrnamentClass; 5] = [
        OrnamentClass::Bauble,
        OrnamentClass::Star,
        OrnamentClass::HeavyBox,
        OrnamentClass::HeavySphere,
        OrnamentClass::HeavyGem,
    ];

    /// Heavy classes gather at the tree base and settle upright.
    #[inline]
    pub fn is_heavy(self) -> bool {
        matches!(
            self,
            OrnamentClass::HeavyBox | OrnamentClass::HeavySphere | OrnamentClass::HeavyGem
        )
    }

    /// Generation table for this class.
    pub fn profile(self) -> OrnamentProfile {
        const HEAVY_SCATTER: Range = Range::new(8.0, 10.0);
        const HEAVY_PLACEMENT: Placement = Placement::BaseCluster {
            y: Range::new(-8.0, 6.0),
            radius: Range::new(2.0, 4.0),
        };
        const HEAVY_WEIGHT: Range = Range::new(0.8, 0.2);
        const BAUBLE_PALETTE: &[(f32, Swatch)] = &[
            (0.45, Swatch::new(VIVID_GOLD, 1.2)),
            (0.75, Swatch::new(VIVID_RED, 1.2)),
            (1.00, Swatch::new(VIVID_GREEN, 1.2)),
        ];
        const STAR_PALETTE: &[(f32, Swatch)] = &[
            (0.8, Swatch::new(WHITE_WARM, 2.0)),
            (1.0, Swatch::new(VIVID_GOLD, 1.0)),
        ];
        const GEM_PALETTE: &[(f32, Swatch)] = &[
            (0.3, Swatch::new(VIVID_GREEN, 1.2)),
            (0.6, Swatch::new(VIVID_RED, 1.2)),
            (1.0, Swatch::new(VIVID_WHITE, 1.0)),
        ];
        const HEAVY_MIXED: &[(f32, Swatch)] = &[
            (0.35, Swatch::new(VIVID_RED, 1.0)),
            (0.60, Swatch::new(VIVID_GOLD, 1.0)),
            (0.85, Swatch::new(VIVID_GREEN, 1.0)),
            (1.00, Swatch::new(VIVID_BLUE, 1.0)),
        ];

        match self {
            OrnamentClass::Bauble => OrnamentProfile {
                count: 120,
                scatter_radius: Range::new(12.0, 15.0),
                scatter_y_bias: 0.0,
                placement: Placement::ConeSurface {
                    offset: Range::new(0.0, 0.5),
                },
                scale: Range::new(0.2, 0.25),
                weight: Range::new(0.4, 0.3),
                palette: BAUBLE_PALETTE,
            },
            OrnamentClass::Star => OrnamentProfile {
                count: 1200,
                scatter_radius: Range::new(25.0, 25.0),
                scatter_y_bias: 12.0,
                placement: Placement::ConeSurface {
                    offset: Range::new(0.2, 2.0),
                },
                scale: Range::new(0.05, 0.08),
                weight: Range::new(0.02, 0.1),
                palette: STAR_PALETTE,
            },
            OrnamentClass::HeavyBox => OrnamentProfile {
                count: 20,
                scatter_radius: HEAVY_SCATTER,
                scatter_y_bias: -5.0,
                placement: HEAVY_PLACEMENT,
                scale: Range::new(0.35, 0.3),
                weight: HEAVY_WEIGHT,
                palette: HEAVY_MIXED,
            },
            OrnamentClass::HeavySphere => OrnamentProfile {
                count: 25,
                scatter_radius: HEAVY_SCATTER,
                scatter_y_bias: -5.0,
                placement: HEAVY_PLACEMENT,
                scale: Range::new(0.2, 0.2),
                weight: HEAVY_WEIGHT,
                palette: HEAVY_MIXED,
            },
            OrnamentClass::HeavyGem => OrnamentProfile {
                count: 20,
                scatter_radius: HEAVY_SCATTER,
                scatter_y_bias: -5.0,
                placement: HEAVY_PLACEMENT,
                scale: Range::new(0.35, 0.3),
                weight: HEAVY_WEIGHT,
                palette: GEM_PALETTE,
            },
        }
    }
}

/// What a particle set is used for; selects the generation recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The cone-shaped needle cloud.
    Foliage,
    /// Golden helix ribbons wrapping the tree.
    Spiral,
    /// One instanced ornament class.
    Ornament(OrnamentClass),
    /// Free-falling snow, independent of the morph.
    Snow,
}

impl Role {
    /// Particle count of this role in the fixed scene composition.
    pub fn default_count(self) -> usize {
        match self {
            Role::Foliage => FOLIAGE_COUNT,
            Role::Spiral => RIBBON_COUNT * POINTS_PER_RIBBON,
            Role::Ornament(class) => class.profile().count,
            Role::Snow => SNOW_COUNT,
        }
    }

    /// Whether the role has distinct scatter and target positions.
    #[inline]
    pub fn morphs(self) -> bool {
        !matches!(self, Role::Snow)
    }
}

/// `min + U * span`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub min: f32,
    /// Width of the range.
    pub span: f32,
}

impl Range {
    /// Range starting at `min` and `span` wide.
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    /// Upper bound (exclusive for sampling purposes).
    #[inline]
    pub fn max(&self) -> f32 {
        self.min + self.span
    }

    fn sample(&self, ctx: &mut SpawnContext) -> f32 {
        ctx.random_span(self.min, self.span)
    }
}

/// sRGB hex colour plus an intensity multiplier applied in linear space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    /// `0xRRGGBB`.
    pub hex: u32,
    /// Brightness boost.
    pub intensity: f32,
}

impl Swatch {
    /// New swatch.
    pub const fn new(hex: u32, intensity: f32) -> Self {
        Self { hex, intensity }
    }

    /// Linear RGB value.
    pub fn linear(&self) -> Vec3 {
        hex_to_linear(self.hex) * self.intensity
    }
}

/// Where an ornament class sits once the tree is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// On the ornament cone surface, pushed outward by `offset`.
    ConeSurface {
        /// Outward offset from the surface.
        offset: Range,
    },
    /// Clustered around the trunk base.
    BaseCluster {
        /// Height range.
        y: Range,
        /// Distance from the trunk.
        radius: Range,
    },
}

/// Generation parameters of one ornament class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentProfile {
    /// Instance count in the scene.
    pub count: usize,
    /// Scatter shell radius.
    pub scatter_radius: Range,
    /// Vertical shift of the scatter shell.
    pub scatter_y_bias: f32,
    /// Target placement rule.
    pub placement: Placement,
    /// Base instance scale.
    pub scale: Range,
    /// Heaviness: damps floating and slows spinning.
    pub weight: Range,
    /// Cumulative categorical palette.
    pub palette: &'static [(f32, Swatch)],
}

// ========== Attribute set ==========

/// Caller-provided arrays for [`ParticleAttributeSet::from_arrays`].
///
/// `scatter`, `target` and `seed` are required. The remaining arrays may be
/// left empty and are then filled with neutral defaults.
#[derive(Debug, Clone, Default)]
pub struct AttributeArrays {
    /// Scattered positions.
    pub scatter: Vec<Vec3>,
    /// Assembled positions.
    pub target: Vec<Vec3>,
    /// Linear RGB colours (default white).
    pub color: Vec<Vec3>,
    /// Base sizes (default 1).
    pub size: Vec<f32>,
    /// Random seeds in `[0, 1)`.
    pub seed: Vec<f32>,
    /// Ribbon progress or ornament weight (default 0).
    pub extra: Vec<f32>,
    /// Base Euler rotation (default zero).
    pub rotation: Vec<Vec3>,
}

/// Immutable per-particle attributes of one particle system.
///
/// Index `i` identifies the same particle in every array.
#[derive(Debug, Clone)]
pub struct ParticleAttributeSet {
    role: Role,
    scatter: Vec<Vec3>,
    target: Vec<Vec3>,
    color: Vec<Vec3>,
    size: Vec<f32>,
    seed: Vec<f32>,
    extra: Vec<f32>,
    rotation: Vec<Vec3>,
}

impl ParticleAttributeSet {
    /// Assemble a set from explicit arrays, checking the join-key invariant.
    pub fn from_arrays(role: Role, arrays: AttributeArrays) -> Result<Self, AttributeError> {
        let n = arrays.scatter.len();
        let check = |field: &'static str, len: usize| {
            if len == n {
                Ok(())
            } else {
                Err(AttributeError::LengthMismatch {
                    field,
                    expected: n,
                    actual: len,
                })
            }
        };
        let or_default = |field: &'static str, v: Vec<_>, fill| -> Result<Vec<_>, AttributeError> {
            if v.is_empty() {
                Ok(vec![fill; n])
            } else {
                check(field, v.len())?;
                Ok(v)
            }
        };

        check("target", arrays.target.len())?;
        check("seed", arrays.seed.len())?;
        let color = or_default("color", arrays.color, Vec3::ONE)?;
        let rotation = or_default("rotation", arrays.rotation, Vec3::ZERO)?;
        let size = if arrays.size.is_empty() {
            vec![1.0; n]
        } else {
            check("size", arrays.size.len())?;
            arrays.size
        };
        let extra = if arrays.extra.is_empty() {
            vec![0.0; n]
        } else {
            check("extra", arrays.extra.len())?;
            arrays.extra
        };

        Ok(Self {
            role,
            scatter: arrays.scatter,
            target: arrays.target,
            color,
            size,
            seed: arrays.seed,
            extra,
            rotation,
        })
    }

    fn with_capacity(role: Role, count: usize) -> Self {
        Self {
            role,
            scatter: Vec::with_capacity(count),
            target: Vec::with_capacity(count),
            color: Vec::with_capacity(count),
            size: Vec::with_capacity(count),
            seed: Vec::with_capacity(count),
            extra: Vec::with_capacity(count),
            rotation: Vec::with_capacity(count),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push(&mut self, scatter: Vec3, target: Vec3, color: Vec3, size: f32, seed: f32, extra: f32, rotation: Vec3) {
        self.scatter.push(scatter);
        self.target.push(target);
        self.color.push(color);
        self.size.push(size);
        self.seed.push(seed);
        self.extra.push(extra);
        self.rotation.push(rotation);
    }

    /// Role the set was generated for.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.scatter.len()
    }

    /// Whether the set holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scatter.is_empty()
    }

    /// Scattered positions. For snow these are the spawn positions.
    #[inline]
    pub fn scatter_positions(&self) -> &[Vec3] {
        &self.scatter
    }

    /// Assembled positions. Snow does not morph and repeats its spawn positions.
    #[inline]
    pub fn target_positions(&self) -> &[Vec3] {
        &self.target
    }

    /// Linear RGB colours.
    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.color
    }

    /// Base point sizes or instance scales.
    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.size
    }

    /// Random seeds in `[0, 1)`.
    #[inline]
    pub fn seeds(&self) -> &[f32] {
        &self.seed
    }

    /// Base Euler rotations (non-zero for ornaments only).
    #[inline]
    pub fn rotations(&self) -> &[Vec3] {
        &self.rotation
    }

    /// Position along the ribbon, for spiral sets.
    pub fn ribbon_progress(&self) -> Option<&[f32]> {
        match self.role {
            Role::Spiral => Some(&self.extra),
            _ => None,
        }
    }

    /// Ornament heaviness, for ornament sets.
    pub fn weights(&self) -> Option<&[f32]> {
        match self.role {
            Role::Ornament(_) => Some(&self.extra),
            _ => None,
        }
    }

    /// Role-specific scalar (ribbon progress, weight, or zero).
    #[inline]
    pub fn extras(&self) -> &[f32] {
        &self.extra
    }
}

// ========== Generators ==========

/// Generate `count` particles for `role`.
///
/// Deterministic for a given [`SpawnContext`] state.
pub fn generate(role: Role, count: usize, ctx: &mut SpawnContext) -> ParticleAttributeSet {
    let set = match role {
        Role::Foliage => generate_foliage(count, ctx),
        Role::Spiral => generate_spiral(count, ctx),
        Role::Ornament(class) => generate_ornaments(class, count, ctx),
        Role::Snow => generate_snow(count, ctx),
    };
    log::debug!("generated {} {:?} particles", set.len(), role);
    set
}

fn generate_foliage(count: usize, ctx: &mut SpawnContext) -> ParticleAttributeSet {
    let mut set = ParticleAttributeSet::with_capacity(Role::Foliage, count);
    let emerald = hex_to_linear(EMERALD);
    let emerald_lite = hex_to_linear(EMERALD_LITE);
    let gold = hex_to_linear(GOLD_METALLIC) * 1.5;

    for _ in 0..count {
        let scatter = ctx.random_on_shell(18.0, 15.0);

        let cone = ctx.random_in_cone(TREE_HEIGHT, FOLIAGE_BASE_RADIUS);
        let target = cone - Vec3::new(0.0, TREE_HEIGHT / 2.0, 0.0);

        let (color, size) = if ctx.chance(GOLD_SPARKLE_CHANCE) {
            (gold, ctx.random_span(3.0, 2.0))
        } else {
            let green = emerald.lerp(emerald_lite, ctx.random());
            (green * ctx.random_span(0.8, 0.5), ctx.random_span(2.0, 2.5))
        };

        let seed = ctx.random();
        set.push(scatter, target, color, size, seed, 0.0, Vec3::ZERO);
    }
    set
}

fn generate_spiral(count: usize, ctx: &mut SpawnContext) -> ParticleAttributeSet {
    let mut set = ParticleAttributeSet::with_capacity(Role::Spiral, count);
    let per_ribbon = count.div_ceil(RIBBON_COUNT).max(1);
    let gold = Vec3::new(1.0, 0.7, 0.1);

    for idx in 0..count {
        let ribbon = (idx / per_ribbon).min(RIBBON_COUNT - 1);
        let i = idx - ribbon * per_ribbon;
        let t = i as f32 / per_ribbon as f32;

        let y = t * TREE_HEIGHT - TREE_HEIGHT / 2.0;
        let radius = (1.0 - t) * SPIRAL_BASE_RADIUS;
        let ribbon_offset = ribbon as f32 * TAU / RIBBON_COUNT as f32;
        let angle = t * SPIRAL_ROTATIONS * TAU + ribbon_offset;
        let r = radius + (ctx.random() - 0.5) * RIBBON_WIDTH;
        let target = Vec3::new(r * angle.cos(), y, r * angle.sin());

        let scatter = ctx.random_on_shell(20.0, 10.0);
        let size = ctx.random_span(2.0, 2.0);
        let seed = ctx.random();
        set.push(scatter, target, gold, size, seed, t, Vec3::ZERO);
    }
    set
}

fn generate_ornaments(class: OrnamentClass, count: usize, ctx: &mut SpawnContext) -> ParticleAttributeSet {
    let mut set = ParticleAttributeSet::with_capacity(Role::Ornament(class), count);
    let profile = class.profile();

    for _ in 0..count {
        let scatter = ctx.random_on_shell(profile.scatter_radius.min, profile.scatter_radius.span)
            + Vec3::new(0.0, profile.scatter_y_bias, 0.0);

        let (y, r) = match profile.placement {
            Placement::ConeSurface { offset } => {
                let y = ctx.random() * ORNAMENT_TREE_HEIGHT - ORNAMENT_TREE_HEIGHT / 2.0;
                let cone_r = cone_radius_at(
                    y + ORNAMENT_TREE_HEIGHT / 2.0,
                    ORNAMENT_TREE_HEIGHT,
                    ORNAMENT_BASE_RADIUS,
                );
                (y, cone_r + offset.sample(ctx))
            }
            Placement::BaseCluster { y, radius } => (y.sample(ctx), radius.sample(ctx)),
        };
        let target = ctx.random_on_ring(r, y);

        let scale = profile.scale.sample(ctx);
        let weight = profile.weight.sample(ctx);
        let color = ctx
            .pick(profile.palette)
            .map(|swatch| swatch.linear())
            .unwrap_or(Vec3::ONE);
        let rotation = Vec3::new(ctx.random() * PI, ctx.random() * PI, ctx.random() * PI);
        let seed = ctx.random();

        set.push(scatter, target, color, scale, seed, weight, rotation);
    }
    set
}

fn generate_snow(count: usize, ctx: &mut SpawnContext) -> ParticleAttributeSet {
    let mut set = ParticleAttributeSet::with_capacity(Role::Snow, count);
    for _ in 0..count {
        let position = ctx.random_in_box(Vec3::splat(SNOW_EXTENT));
        let seed = ctx.random();
        let size = ctx.random_span(1.5, 3.5);
        let color = if seed < 0.5 { SNOW_SILVER } else { Vec3::ONE };
        set.push(position, position, color, size, seed, 0.0, Vec3::ZERO);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lengths(set: &ParticleAttributeSet, n: usize) {
        assert_eq!(set.len(), n);
        assert_eq!(set.target_positions().len(), n);
        assert_eq!(set.colors().len(), n);
        assert_eq!(set.sizes().len(), n);
        assert_eq!(set.seeds().len(), n);
        assert_eq!(set.extras().len(), n);
        assert_eq!(set.rotations().len(), n);
    }

    #[test]
    fn test_all_arrays_share_length() {
        let mut ctx = SpawnContext::seeded(11);
        assert_lengths(&generate(Role::Foliage, 500, &mut ctx), 500);
        assert_lengths(&generate(Role::Spiral, 400, &mut ctx), 400);
        assert_lengths(&generate(Role::Snow, 64, &mut ctx), 64);
        for class in OrnamentClass::ALL {
            assert_lengths(&generate(Role::Ornament(class), 33, &mut ctx), 33);
        }
    }

    #[test]
    fn test_default_counts() {
        assert_eq!(Role::Foliage.default_count(), 75_000);
        assert_eq!(Role::Spiral.default_count(), 4000);
        assert_eq!(Role::Snow.default_count(), 5000);
        let ornaments: usize = OrnamentClass::ALL
            .iter()
            .map(|c| Role::Ornament(*c).default_count())
            .sum();
        assert_eq!(ornaments, 120 + 1200 + 20 + 25 + 20);
    }

    #[test]
    fn test_seeds_in_unit_interval() {
        let mut ctx = SpawnContext::seeded(5);
        let set = generate(Role::Foliage, 2000, &mut ctx);
        assert!(set.seeds().iter().all(|s| (0.0..1.0).contains(s)));
    }

    #[test]
    fn test_foliage_targets_inside_cone() {
        let mut ctx = SpawnContext::seeded(12);
        let set = generate(Role::Foliage, 3000, &mut ctx);
        for p in set.target_positions() {
            assert!(p.y >= -TREE_HEIGHT / 2.0 && p.y <= TREE_HEIGHT / 2.0);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            let limit = cone_radius_at(p.y + TREE_HEIGHT / 2.0, TREE_HEIGHT, FOLIAGE_BASE_RADIUS);
            assert!(radial <= limit + 1e-3);
        }
    }

    #[test]
    fn test_gold_sparkles_are_rare_and_large() {
        let mut ctx = SpawnContext::seeded(13);
        let set = generate(Role::Foliage, 20_000, &mut ctx);
        let gold: Vec<usize> = (0..set.len()).filter(|&i| set.colors()[i].x > 0.5).collect();
        let share = gold.len() as f32 / set.len() as f32;
        assert!((share - GOLD_SPARKLE_CHANCE).abs() < 0.01, "gold share {}", share);
        assert!(gold.iter().all(|&i| set.sizes()[i] >= 3.0));
    }

    #[test]
    fn test_spiral_ribbon_progress() {
        let mut ctx = SpawnContext::seeded(14);
        let set = generate(Role::Spiral, 4000, &mut ctx);
        let progress = set.ribbon_progress().unwrap();
        assert_eq!(progress[0], 0.0);
        assert_eq!(progress[2000], 0.0);
        assert!((progress[1999] - 1999.0 / 2000.0).abs() < 1e-6);
        assert!(progress.iter().all(|t| (0.0..1.0).contains(t)));
        assert!(set.weights().is_none());
    }

    #[test]
    fn test_spiral_ribbons_are_opposite() {
        let mut ctx = SpawnContext::seeded(15);
        let set = generate(Role::Spiral, 4000, &mut ctx);
        let a = set.target_positions()[0];
        let b = set.target_positions()[2000];
        // Both start at the base, on opposite sides of the trunk.
        assert!(a.x > 7.0 && b.x < -7.0);
        assert!((a.y - b.y).abs() < 1e-6);
    }

    #[test]
    fn test_heavy_ornaments_cluster_at_base() {
        let mut ctx = SpawnContext::seeded(16);
        for class in [OrnamentClass::HeavyBox, OrnamentClass::HeavySphere, OrnamentClass::HeavyGem] {
            let set = generate(Role::Ornament(class), 200, &mut ctx);
            for (p, w) in set.target_positions().iter().zip(set.weights().unwrap()) {
                assert!(p.y >= -8.0 && p.y <= -2.0);
                let radial = (p.x * p.x + p.z * p.z).sqrt();
                assert!((2.0 - 1e-4..=6.0 + 1e-4).contains(&radial));
                assert!((0.8..=1.0).contains(w));
            }
        }
    }

    #[test]
    fn test_stars_are_light_and_scatter_high() {
        let mut ctx = SpawnContext::seeded(17);
        let set = generate(Role::Ornament(OrnamentClass::Star), 1200, &mut ctx);
        let weights = set.weights().unwrap();
        assert!(weights.iter().all(|w| *w < 0.13));
        let mean_y: f32 = set.scatter_positions().iter().map(|p| p.y).sum::<f32>() / set.len() as f32;
        assert!(mean_y > 8.0, "mean scatter height {}", mean_y);
    }

    #[test]
    fn test_ornament_colors_come_from_palette() {
        let mut ctx = SpawnContext::seeded(18);
        for class in OrnamentClass::ALL {
            let palette: Vec<Vec3> = class.profile().palette.iter().map(|(_, s)| s.linear()).collect();
            let set = generate(Role::Ornament(class), 100, &mut ctx);
            for color in set.colors() {
                assert!(palette.iter().any(|p| (*p - *color).length() < 1e-6));
            }
        }
    }

    #[test]
    fn test_snow_fills_box_without_morph() {
        let mut ctx = SpawnContext::seeded(19);
        let set = generate(Role::Snow, 1000, &mut ctx);
        assert!(!Role::Snow.morphs());
        assert_eq!(set.scatter_positions(), set.target_positions());
        let half = SNOW_EXTENT / 2.0;
        for p in set.scatter_positions() {
            assert!(p.abs().max_element() <= half);
        }
    }

    #[test]
    fn test_from_arrays_validates_lengths() {
        let ok = ParticleAttributeSet::from_arrays(
            Role::Foliage,
            AttributeArrays {
                scatter: vec![Vec3::ZERO; 3],
                target: vec![Vec3::ONE; 3],
                seed: vec![0.0, 0.5, 1.0],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ok.sizes(), &[1.0, 1.0, 1.0]);

        let err = ParticleAttributeSet::from_arrays(
            Role::Foliage,
            AttributeArrays {
                scatter: vec![Vec3::ZERO; 3],
                target: vec![Vec3::ONE; 2],
                seed: vec![0.0; 3],
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttributeError::LengthMismatch {
                field: "target",
                expected: 3,
                actual: 2
            }
        );
    }
}
