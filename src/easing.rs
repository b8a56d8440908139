//! Easing curves shared by the CPU instance updates and the WGSL programs.
//!
//! The cubic curve here must stay numerically identical to `ease_in_out_cubic`
//! in `shaders/common.wgsl`.

/// Clamp to `[0, 1]`, mapping NaN to `0`.
///
/// `f32::clamp` passes NaN through, which would turn a single bad frame
/// delta into invisible geometry.
#[inline]
pub fn saturate(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Cubic ease-in-out.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = saturate(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = saturate(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Selectable easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Quadratic ease-in-out.
    QuadInOut,
    /// Cubic ease-in-out (the curve the point-cloud shaders use).
    #[default]
    CubicInOut,
}

impl Easing {
    /// Evaluate the curve. Input is saturated first.
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => saturate(t),
            Easing::QuadInOut => ease_in_out_quad(t),
            Easing::CubicInOut => ease_in_out_cubic(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::QuadInOut, Easing::CubicInOut] {
            assert_eq!(easing.evaluate(0.0), 0.0);
            assert_eq!(easing.evaluate(1.0), 1.0);
        }
    }

    #[test]
    fn test_cubic_midpoint_is_half() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_is_monotone() {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let v = ease_in_out_cubic(i as f32 / 1000.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_saturate_handles_nan() {
        assert_eq!(saturate(f32::NAN), 0.0);
        assert_eq!(saturate(f32::INFINITY), 1.0);
        assert_eq!(saturate(-2.0), 0.0);
    }
}
