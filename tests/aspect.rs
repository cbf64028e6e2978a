use landing_wasm::pattern::{brighten, surface_uv};
use landing_wasm::shading::Vec2;

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

const SURFACES: [(f64, f64); 3] = [
    (1920.0, 1080.0), // wide
    (1080.0, 1920.0), // tall
    (800.0, 800.0),
];

#[test]
fn uv_steps_equally_per_pixel_in_x_and_y() {
    for &(w, h) in &SURFACES {
        let res = Vec2::new(w, h);
        let origin = surface_uv(Vec2::new(100.0, 100.0), res);
        let right = surface_uv(Vec2::new(101.0, 100.0), res);
        let up = surface_uv(Vec2::new(100.0, 101.0), res);
        assert!(
            approx_eq(right.x - origin.x, up.y - origin.y, 1e-12),
            "{w}x{h}: dx={} dy={}",
            right.x - origin.x,
            up.y - origin.y
        );
    }
}

#[test]
fn uv_spans_unit_height_and_aspect_width() {
    for &(w, h) in &SURFACES {
        let res = Vec2::new(w, h);
        let top_right = surface_uv(res, res);
        assert!(approx_eq(top_right.y, 1.0, 1e-12));
        assert!(approx_eq(top_right.x, w / h, 1e-12));
        assert_eq!(surface_uv(Vec2::new(0.0, 0.0), res), Vec2::new(0.0, 0.0));
    }
}

#[test]
fn brightening_is_circular_on_any_aspect() {
    for &(w, h) in &SURFACES {
        let res = Vec2::new(w, h);
        let centre = res * 0.5;
        let radius = w.min(h) * 0.5;
        for dir in [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-0.6, 0.8)] {
            let inside = centre + dir * (radius * 0.45 - 1.0);
            let outside = centre + dir * (radius * 0.75 + 1.0);
            assert_eq!(brighten(inside, res), 1.0, "{w}x{h} inside along {dir:?}");
            assert_eq!(brighten(outside, res), 0.0, "{w}x{h} outside along {dir:?}");
        }
    }
}
