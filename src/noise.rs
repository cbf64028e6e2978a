//! Value noise and its fractal sum.

use crate::shading::{fract, mix, Vec2};

/// Number of fbm octaves.
pub const OCTAVES: usize = 6;

/// Lattice row stride used to fold a 2D lattice point into one hash input.
const ROW_STRIDE: f64 = 57.0;

/// Deterministic pseudo-random scalar in `[0, 1)`.
#[inline]
pub fn hash(n: f64) -> f64 {
    fract(n.sin() * 43758.5453)
}

/// Value noise: hashes of the four surrounding lattice points blended with
/// smoothstep-shaped weights, so the result is continuous across cell edges.
pub fn noise(p: Vec2) -> f64 {
    let (ix, iy) = (p.x.floor(), p.y.floor());
    let fx = p.x - ix;
    let fy = p.y - iy;
    let wx = fx * fx * (3.0 - 2.0 * fx);
    let wy = fy * fy * (3.0 - 2.0 * fy);

    let n = ix + iy * ROW_STRIDE;
    let a = hash(n);
    let b = hash(n + 1.0);
    let c = hash(n + ROW_STRIDE);
    let d = hash(n + ROW_STRIDE + 1.0);

    mix(mix(a, b, wx), mix(c, d, wx), wy)
}

/// Fractal Brownian motion: [`OCTAVES`] octaves of [`noise`], amplitude
/// halving from 0.5 and frequency doubling from 1.0. Not normalised; the
/// result stays below `1 - 0.5^OCTAVES`.
pub fn fbm(p: Vec2) -> f64 {
    let mut sum = 0.0;
    let mut amp = 0.5;
    let mut freq = 1.0;
    for _ in 0..OCTAVES {
        sum += amp * noise(p * freq);
        amp *= 0.5;
        freq *= 2.0;
    }
    sum
}
