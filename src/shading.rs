//! Scalar helpers with GLSL semantics, shared by the CPU path and mirrored in
//! `shaders/lines.frag`.

use std::ops::{Add, Mul};

/// Fractional part, `x - floor(x)`, kept inside `[0, 1)`.
#[inline]
pub fn fract(x: f64) -> f64 {
    let f = x - x.floor();
    // x - floor(x) rounds up to 1.0 for tiny negative inputs
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Hermite step between `edge0` and `edge1`.
///
/// Edges are used in the order given: with `edge0 > edge1` the curve falls
/// from 1 to 0 instead of rising, which is what the centre brightening relies on.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation, `a * (1 - t) + b * t`.
#[inline]
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Adds `s` to both components (GLSL `vec2 + float`).
    #[inline]
    pub fn offset(self, s: f64) -> Self {
        Self::new(self.x + s, self.y + s)
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Linear RGB triple, each channel nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Per-channel [`mix`].
    #[inline]
    pub fn mix(self, other: Self, t: f64) -> Self {
        Self::new(
            mix(self.r, other.r, t),
            mix(self.g, other.g, t),
            mix(self.b, other.b, t),
        )
    }

    /// Opaque RGBA8, rounding to the nearest byte.
    pub fn to_rgba8(self) -> [u8; 4] {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(self.r), byte(self.g), byte(self.b), 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fract_wraps_negative_inputs() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-12);
        assert_eq!(fract(-1e-20), 0.0);
        assert_eq!(fract(3.0), 0.0);
    }

    #[test]
    fn smoothstep_follows_edge_order() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        // inverted edges fall instead of rise
        assert_eq!(smoothstep(1.0, 0.0, -1.0), 1.0);
        assert_eq!(smoothstep(1.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn rgba8_is_opaque_and_clamped() {
        assert_eq!(Rgb::new(1.2, 0.5, -0.1).to_rgba8(), [255, 128, 0, 255]);
    }
}
