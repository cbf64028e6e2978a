//! Wavy line pattern and per-pixel colour composition.
//!
//! Every function here is pure over `(fragment, resolution, time)`, so a frame
//! can be evaluated pixel by pixel in any order. `shaders/lines.frag` is the
//! GPU twin of this module and must stay in sync with it.

use tracing::warn;

use crate::lifecycle::SurfaceSize;
use crate::noise::fbm;
use crate::shading::{fract, smoothstep, Rgb, Vec2};

/// Soft edge half-width of each band.
pub const LINE_THICKNESS: f64 = 0.03;
/// How far fbm pushes the bands vertically.
pub const LINE_DISTORTION: f64 = 0.1;
/// Bands per unit of uv height.
pub const BAND_FREQUENCY: f64 = 40.0;
/// uv units per second the noise field drifts by.
pub const DRIFT_RATE: f64 = 0.1;

pub const BACKGROUND_BOTTOM: Rgb = Rgb::new(1.0, 1.0, 1.0);
pub const BACKGROUND_TOP: Rgb = Rgb::new(0.973, 0.976, 0.980);
pub const LINE_COLOR: Rgb = Rgb::new(0.85, 0.85, 0.85);
pub const NEAR_WHITE: Rgb = Rgb::new(0.99, 0.99, 1.0);

/// Brightening fades out between these fractions of the half short side.
const BRIGHTEN_OUTER: f64 = 0.75;
const BRIGHTEN_INNER: f64 = 0.45;
/// Strength of the centre blend at full brightening.
const BRIGHTEN_WEIGHT: f64 = 0.48;

/// Maps a fragment coordinate to uv with x stretched by the aspect ratio.
#[inline]
pub fn surface_uv(frag: Vec2, resolution: Vec2) -> Vec2 {
    Vec2::new(
        frag.x / resolution.x * (resolution.x / resolution.y),
        frag.y / resolution.y,
    )
}

/// Soft stripe intensity in `[0, 1]`: 1 at each band centre, 0 at band edges.
pub fn lines(uv: Vec2, thickness: f64, distortion: f64, time: f64) -> f64 {
    let y = uv.y + distortion * fbm((uv * 2.0).offset(time * DRIFT_RATE));
    let pattern = fract(y * BAND_FREQUENCY);
    smoothstep(0.5 - thickness, 0.5, pattern) - smoothstep(0.5, 0.5 + thickness, pattern)
}

/// Centre brightening weight: 1 inside `0.45 * radius`, 0 beyond `0.75 * radius`.
pub fn brighten(frag: Vec2, resolution: Vec2) -> f64 {
    let dist = frag.distance(resolution * 0.5);
    let radius = resolution.x.min(resolution.y) * 0.5;
    smoothstep(radius * BRIGHTEN_OUTER, radius * BRIGHTEN_INNER, dist)
}

/// Colour of the line field before centre brightening.
pub fn base_color(uv: Vec2, time: f64) -> Rgb {
    let wave = lines(uv, LINE_THICKNESS, LINE_DISTORTION, time);
    BACKGROUND_BOTTOM
        .mix(BACKGROUND_TOP, uv.y)
        .mix(LINE_COLOR, wave)
}

/// Final colour at fragment coordinate `frag` (origin bottom-left).
pub fn color_at(frag: Vec2, resolution: Vec2, time: f64) -> Rgb {
    let uv = surface_uv(frag, resolution);
    base_color(uv, time).mix(NEAR_WHITE, brighten(frag, resolution) * BRIGHTEN_WEIGHT)
}

/// One frame of output: the colour function bound to a resolution and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorField {
    pub resolution: SurfaceSize,
    pub time: f64,
}

impl ColorField {
    pub fn new(resolution: SurfaceSize, time: f64) -> Self {
        Self { resolution, time }
    }

    pub fn color_at(&self, frag: Vec2) -> Rgb {
        color_at(frag, self.resolution.to_vec2(), self.time)
    }

    /// Fills `out` with `width * height` RGBA8 pixels, top row first, sampling
    /// pixel centres stretched over the whole surface.
    ///
    /// `out` is resized when its length does not match. Returns `false`, with
    /// `out` untouched, when the buffer size is not addressable.
    pub fn rasterize_rgba8(&self, width: u32, height: u32, out: &mut Vec<u8>) -> bool {
        let (w, h) = (width.max(1) as usize, height.max(1) as usize);
        let Some((stride, len)) = w
            .checked_mul(4)
            .and_then(|stride| Some((stride, stride.checked_mul(h)?)))
            .filter(|&(_, len)| len <= isize::MAX as usize)
        else {
            warn!(width, height, "frame skipped: raster too large");
            return false;
        };
        out.resize(len, 0);

        let res = self.resolution.to_vec2();
        let sx = res.x / w as f64;
        let sy = res.y / h as f64;
        for (row, pixels) in out.chunks_exact_mut(stride).enumerate() {
            // fragment y grows upwards, buffer rows grow downwards
            let fy = (h - 1 - row) as f64 + 0.5;
            for (col, px) in pixels.chunks_exact_mut(4).enumerate() {
                let frag = Vec2::new((col as f64 + 0.5) * sx, fy * sy);
                px.copy_from_slice(&color_at(frag, res, self.time).to_rgba8());
            }
        }
        true
    }
}
