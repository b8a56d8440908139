//! Sampling helpers for attribute generation.
//!
//! [`SpawnContext`] wraps a seeded RNG and offers the placement primitives the
//! attribute generator is built from: spherical shells, area-uniform cone
//! slices, boxes and categorical palettes. All draws are continuous uniform
//! draws; nothing is rejection-sampled.
//!
//! ```ignore
//! let mut ctx = SpawnContext::seeded(7);
//! let scatter = ctx.random_on_shell(18.0, 15.0);
//! let target = ctx.random_in_cone(18.0, 7.0);
//! ```

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Random source and placement helpers used while generating attributes.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Deterministic context: the same seed yields the same attributes.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context seeded from the wall clock, different on every run.
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// `min + U * span`, the form every generator constant is written in.
    #[inline]
    pub fn random_span(&mut self, min: f32, span: f32) -> f32 {
        min + self.random() * span
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    /// Pick from a cumulative table of `(upper_bound, value)` pairs.
    ///
    /// The first entry whose bound exceeds the roll wins; the last entry is
    /// the fallback, so its bound is never consulted.
    pub fn pick<T: Copy>(&mut self, table: &[(f32, T)]) -> Option<T> {
        let roll = self.random();
        table
            .iter()
            .find(|(bound, _)| roll < *bound)
            .or_else(|| table.last())
            .map(|(_, value)| *value)
    }

    // ========== Position helpers ==========

    /// Point on a spherical shell with radius `min_radius + U * radius_span`.
    ///
    /// Latitude uses the inverse-cosine method (`φ = acos(2U - 1)`) so the
    /// directions are uniform on the sphere instead of bunching at the poles.
    pub fn random_on_shell(&mut self, min_radius: f32, radius_span: f32) -> Vec3 {
        let r = self.random_span(min_radius, radius_span);
        let theta = self.random_angle();
        let phi = (2.0 * self.random() - 1.0).acos();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Point inside an apex-up cone standing on `y = 0`.
    ///
    /// Height is uniform in `[0, height)`; within each height slice the
    /// radius is `sqrt(U) * radius_at(y)`, which is uniform in area.
    pub fn random_in_cone(&mut self, height: f32, base_radius: f32) -> Vec3 {
        let y = self.random() * height;
        let radius_at_y = cone_radius_at(y, height, base_radius);
        let r = self.random().sqrt() * radius_at_y;
        let theta = self.random_angle();

        Vec3::new(r * theta.cos(), y, r * theta.sin())
    }

    /// Point inside an axis-aligned box centred on the origin.
    pub fn random_in_box(&mut self, size: Vec3) -> Vec3 {
        Vec3::new(
            (self.random() - 0.5) * size.x,
            (self.random() - 0.5) * size.y,
            (self.random() - 0.5) * size.z,
        )
    }

    /// Point on a horizontal ring of the given radius and height.
    pub fn random_on_ring(&mut self, radius: f32, y: f32) -> Vec3 {
        let theta = self.random_angle();
        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    }
}

/// Radius of an apex-up cone at height `y` above its base.
#[inline]
pub fn cone_radius_at(y: f32, height: f32, base_radius: f32) -> f32 {
    (1.0 - y / height) * base_radius
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = SpawnContext::seeded(9);
        let mut b = SpawnContext::seeded(9);
        for _ in 0..32 {
            assert_eq!(a.random_on_shell(1.0, 2.0), b.random_on_shell(1.0, 2.0));
        }
    }

    #[test]
    fn test_shell_radius_bounds() {
        let mut ctx = SpawnContext::seeded(1);
        for _ in 0..1000 {
            let r = ctx.random_on_shell(18.0, 15.0).length();
            assert!((18.0 - 1e-3..=33.0 + 1e-3).contains(&r));
        }
    }

    #[test]
    fn test_cone_points_stay_inside() {
        let mut ctx = SpawnContext::seeded(2);
        for _ in 0..1000 {
            let p = ctx.random_in_cone(18.0, 7.0);
            assert!(p.y >= 0.0 && p.y < 18.0);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= cone_radius_at(p.y, 18.0, 7.0) + 1e-4);
        }
    }

    #[test]
    fn test_pick_uses_last_entry_as_fallback() {
        let mut ctx = SpawnContext::seeded(3);
        let table = [(0.0, 'a'), (0.0, 'b'), (0.0, 'c')];
        assert_eq!(ctx.pick(&table), Some('c'));
        let empty: [(f32, char); 0] = [];
        assert_eq!(ctx.pick(&empty), None);
    }

    #[test]
    fn test_hex_to_linear() {
        let white = hex_to_linear(0xFFFFFF);
        assert!((white - Vec3::ONE).length() < 1e-5);
        assert_eq!(hex_to_linear(0x000000), Vec3::ZERO);
        let mid = hex_to_linear(0x808080);
        assert!((mid.x - 0.2158605).abs() < 1e-4);
    }
}
