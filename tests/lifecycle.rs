use std::cell::RefCell;
use std::rc::Rc;

use landing_wasm::lifecycle::{
    Phase, RenderTarget, Renderer, SurfaceHandle, SurfaceSize, MAX_BACKING_DIMENSION,
};
use landing_wasm::pattern::{base_color, surface_uv, ColorField, NEAR_WHITE};
use landing_wasm::shading::{Rgb, Vec2};
use landing_wasm::InitError;

#[derive(Debug, Default)]
struct Log {
    configured: Vec<SurfaceSize>,
    frames: Vec<ColorField>,
    released: usize,
}

type SharedLog = Rc<RefCell<Log>>;

struct RecordingTarget {
    log: SharedLog,
}

impl RenderTarget for RecordingTarget {
    fn configure(&mut self, size: SurfaceSize) {
        self.log.borrow_mut().configured.push(size);
    }

    fn draw(&mut self, field: &ColorField) {
        self.log.borrow_mut().frames.push(*field);
    }

    fn release(self) {
        self.log.borrow_mut().released += 1;
    }
}

struct FakeSurface {
    log: SharedLog,
    width: u32,
    height: u32,
    available: bool,
}

impl FakeSurface {
    fn new(log: &SharedLog, width: u32, height: u32) -> Self {
        Self {
            log: log.clone(),
            width,
            height,
            available: true,
        }
    }

    fn unavailable(log: &SharedLog) -> Self {
        Self {
            available: false,
            ..Self::new(log, 1, 1)
        }
    }
}

impl SurfaceHandle for FakeSurface {
    type Target = RecordingTarget;

    fn acquire(self) -> Result<(RecordingTarget, SurfaceSize), InitError> {
        if !self.available {
            return Err(InitError::ContextUnavailable("WebGL2"));
        }
        Ok((
            RecordingTarget { log: self.log },
            SurfaceSize::clamped(self.width, self.height),
        ))
    }
}

fn size(width: u32, height: u32) -> SurfaceSize {
    SurfaceSize::new(width, height).unwrap()
}

fn approx_rgb(a: Rgb, b: Rgb) -> bool {
    (a.r - b.r).abs() < 1e-12 && (a.g - b.g).abs() < 1e-12 && (a.b - b.b).abs() < 1e-12
}

#[test]
fn idle_renderer_ignores_everything() {
    let mut renderer: Renderer<RecordingTarget> = Renderer::new();
    assert_eq!(renderer.phase(), Phase::Uninitialized);
    assert!(!renderer.tick(1.0));
    assert!(!renderer.resize(10, 10));
    renderer.stop();
    assert_eq!(renderer.phase(), Phase::Uninitialized);
}

#[test]
fn failed_start_is_reported_and_holds_nothing() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    let err = renderer.start(FakeSurface::unavailable(&log)).unwrap_err();
    assert_eq!(err, InitError::ContextUnavailable("WebGL2"));
    assert_eq!(renderer.phase(), Phase::Uninitialized);
    assert!(!renderer.tick(0.0));
    let log = log.borrow();
    assert!(log.configured.is_empty() && log.frames.is_empty());
    assert_eq!(log.released, 0);
}

#[test]
fn start_configures_once_and_first_frame_is_time_zero() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    assert_eq!(renderer.phase(), Phase::Running);
    assert_eq!(log.borrow().configured, vec![size(400, 300)]);

    assert!(renderer.tick(1000.0));
    assert!(renderer.tick(1000.25));
    let log = log.borrow();
    let times: Vec<f64> = log.frames.iter().map(|f| f.time).collect();
    assert_eq!(times, vec![0.0, 0.25]);
    assert!(log.frames.iter().all(|f| f.resolution == size(400, 300)));
}

#[test]
fn empty_container_starts_at_one_pixel() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 0, 0)).unwrap();
    assert_eq!(renderer.size(), Some(size(1, 1)));
}

#[test]
fn resize_takes_effect_on_next_tick() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    renderer.tick(0.0);

    assert!(renderer.resize(800, 600));
    assert_eq!(log.borrow().configured.len(), 1);
    assert_eq!(renderer.size(), Some(size(800, 600)));

    renderer.tick(0.5);
    let log = log.borrow();
    assert_eq!(log.configured, vec![size(400, 300), size(800, 600)]);
    assert_eq!(log.frames.last().map(|f| f.resolution), Some(size(800, 600)));
    // clock is unaffected by resizing
    assert_eq!(log.frames.last().map(|f| f.time), Some(0.5));
}

#[test]
fn repeated_or_empty_resizes_are_ignored() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();

    assert!(!renderer.resize(400, 300));
    assert!(renderer.resize(800, 600));
    assert!(!renderer.resize(800, 600));
    assert!(!renderer.resize(0, 600));
    assert!(!renderer.resize(800, 0));
    renderer.tick(0.0);
    assert!(!renderer.resize(800, 600));
    renderer.tick(0.1);

    assert_eq!(log.borrow().configured, vec![size(400, 300), size(800, 600)]);
}

#[test]
fn stop_releases_once_and_is_idempotent() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    renderer.stop();
    renderer.stop();

    assert_eq!(renderer.phase(), Phase::Stopped);
    assert_eq!(log.borrow().released, 1);
    assert!(!renderer.tick(1.0));
    assert!(!renderer.resize(100, 100));
    assert_eq!(renderer.elapsed(), None);
}

#[test]
fn restart_resets_the_clock() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    renderer.tick(10.0);
    renderer.tick(12.0);
    assert_eq!(renderer.elapsed(), Some(2.0));
    renderer.stop();

    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    renderer.tick(30.0);
    assert_eq!(renderer.elapsed(), Some(0.0));
}

#[test]
fn start_while_running_releases_the_previous_target() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();
    renderer.start(FakeSurface::new(&log, 640, 480)).unwrap();
    assert_eq!(log.borrow().released, 1);
    assert_eq!(renderer.size(), Some(size(640, 480)));

    // a failed restart still gives back what was running
    renderer.start(FakeSurface::unavailable(&log)).unwrap_err();
    assert_eq!(log.borrow().released, 2);
    assert_eq!(renderer.phase(), Phase::Stopped);
}

#[test]
fn first_frame_on_square_surface() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 400)).unwrap();
    renderer.tick(0.0);

    let field = log.borrow().frames[0];
    assert_eq!(field.time, 0.0);
    let res = field.resolution.to_vec2();

    let centre = Vec2::new(200.0, 200.0);
    let expected = base_color(surface_uv(centre, res), 0.0).mix(NEAR_WHITE, 0.48);
    assert!(approx_rgb(field.color_at(centre), expected));

    let corner = Vec2::new(0.0, 0.0);
    assert!(approx_rgb(field.color_at(corner), base_color(corner, 0.0)));
}

#[test]
fn js_sizes_below_one_pixel_or_non_finite_are_rejected() {
    for (w, h) in [
        (-1.0, 300.0),
        (400.0, -300.0),
        (0.0, 300.0),
        (0.5, 300.0),
        (f64::NAN, 300.0),
        (f64::INFINITY, 300.0),
        (400.0, f64::NEG_INFINITY),
    ] {
        assert_eq!(SurfaceSize::from_css(w, h), None, "{w}x{h}");
    }
    assert_eq!(SurfaceSize::from_css(640.7, 480.0), Some(size(640, 480)));
}

#[test]
fn negative_js_resize_leaves_the_surface_alone() {
    let log = SharedLog::default();
    let mut renderer = Renderer::new();
    renderer.start(FakeSurface::new(&log, 400, 300)).unwrap();

    if let Some(requested) = SurfaceSize::from_css(-1.0, 300.0) {
        renderer.resize(requested.width(), requested.height());
    }
    renderer.tick(0.0);

    assert!(renderer.is_running());
    assert_eq!(renderer.size(), Some(size(400, 300)));
    assert_eq!(log.borrow().configured, vec![size(400, 300)]);
}

#[test]
fn backing_store_respects_edge_and_pixel_limits() {
    assert_eq!(size(400, 300).backing(2.0, None), size(800, 600));

    let wide = size(100_000, 100).backing(2.0, None);
    assert!(wide.width() <= MAX_BACKING_DIMENSION);
    assert!(wide.height() >= 1);

    let capped = size(1920, 1080).backing(0.5, Some(120_000));
    let pixels = u64::from(capped.width()) * u64::from(capped.height());
    assert!(pixels <= 120_000, "{capped:?}");
    let aspect = f64::from(capped.width()) / f64::from(capped.height());
    assert!((aspect - 1920.0 / 1080.0).abs() < 0.02, "{capped:?}");

    // nonsense ratios fall back to one backing pixel per CSS pixel
    assert_eq!(size(400, 300).backing(f64::NAN, None), size(400, 300));
}
