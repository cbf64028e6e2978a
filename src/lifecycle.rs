//! Render-loop lifecycle: `Uninitialized -> Running -> Stopped`.
//!
//! The state machine is platform independent. A [`SurfaceHandle`] acquires a
//! [`RenderTarget`] on start; the target owns every surface-bound resource and
//! gives them back in [`RenderTarget::release`], which runs at most once per
//! successful start because stopping moves the target out of the renderer.
//! A renderer dropped while running drops its target without `release`.

use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::error::InitError;
use crate::pattern::ColorField;
use crate::shading::Vec2;

/// Longest backing-store edge handed to a canvas, the usual browser limit.
pub const MAX_BACKING_DIMENSION: u32 = 16_384;

/// Surface dimensions in CSS pixels, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    /// `None` when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Clamps zero dimensions up to 1.
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Sizes coming from JS numbers. `None` for NaN, infinities, and anything
    /// below one pixel, negatives included.
    pub fn from_css(width: f64, height: f64) -> Option<Self> {
        let dimension = |v: f64| (v.is_finite() && v >= 1.0).then(|| v.min(f64::from(u32::MAX)) as u32);
        Self::new(dimension(width)?, dimension(height)?)
    }

    /// Backing-store size at `scale` pixels per CSS pixel, limited to
    /// [`MAX_BACKING_DIMENSION`] per edge and to `max_pixels` in total. The
    /// aspect ratio is kept when a limit applies.
    pub fn backing(self, scale: f64, max_pixels: Option<u64>) -> Self {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let edge = f64::from(MAX_BACKING_DIMENSION);

        let mut scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        scale = scale.min(edge / w).min(edge / h);
        if let Some(max) = max_pixels {
            let pixels = w * h * scale * scale;
            if pixels > max as f64 {
                scale *= (max as f64 / pixels).sqrt();
            }
        }
        Self::clamped((w * scale).floor() as u32, (h * scale).floor() as u32)
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Something frames can be drawn into.
pub trait RenderTarget {
    /// Applies new surface dimensions before the next draw.
    fn configure(&mut self, size: SurfaceSize);

    /// Presents one frame.
    fn draw(&mut self, field: &ColorField);

    /// Gives back every surface-bound resource.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// Host-provided access to a rendering surface.
pub trait SurfaceHandle {
    type Target: RenderTarget;

    /// Acquires the target and reports the surface's current size.
    fn acquire(self) -> Result<(Self::Target, SurfaceSize), InitError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Stopped,
}

#[derive(Debug)]
struct Running<T> {
    target: T,
    size: SurfaceSize,
    pending: Option<SurfaceSize>,
    clock: Clock,
}

#[derive(Debug)]
enum State<T> {
    Uninitialized,
    Running(Running<T>),
    Stopped,
}

/// The renderer instance owned by the host.
#[derive(Debug)]
pub struct Renderer<T> {
    state: State<T>,
}

impl<T> Default for Renderer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Renderer<T> {
    pub fn new() -> Self {
        Self {
            state: State::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Uninitialized => Phase::Uninitialized,
            State::Running(_) => Phase::Running,
            State::Stopped => Phase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Size the next frame will be drawn at, including a queued resize.
    pub fn size(&self) -> Option<SurfaceSize> {
        match &self.state {
            State::Running(run) => Some(run.pending.unwrap_or(run.size)),
            _ => None,
        }
    }

    /// Elapsed time of the last frame, if running.
    pub fn elapsed(&self) -> Option<f64> {
        match &self.state {
            State::Running(run) => Some(run.clock.elapsed()),
            _ => None,
        }
    }

    /// Queues new dimensions for the next tick. Returns `false` when the
    /// request is ignored: not running, a zero dimension, or no change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let State::Running(run) = &mut self.state else {
            trace!(width, height, "resize ignored: not running");
            return false;
        };
        let Some(size) = SurfaceSize::new(width, height) else {
            trace!(width, height, "resize ignored: empty surface");
            return false;
        };
        if run.pending.unwrap_or(run.size) == size {
            trace!(width, height, "resize ignored: unchanged");
            return false;
        }
        run.pending = Some(size);
        true
    }
}

impl<T: RenderTarget> Renderer<T> {
    /// Acquires the surface and starts running from `t = 0`.
    ///
    /// A running renderer is stopped first. On failure nothing is held and the
    /// renderer is left stopped (or uninitialized if it never ran).
    pub fn start<S>(&mut self, surface: S) -> Result<(), InitError>
    where
        S: SurfaceHandle<Target = T>,
    {
        self.stop();

        let (mut target, size) = surface.acquire()?;
        target.configure(size);
        info!(width = size.width, height = size.height, "landing animation started");

        self.state = State::Running(Running {
            target,
            size,
            pending: None,
            clock: Clock::new(),
        });
        Ok(())
    }

    /// Draws one frame at host timestamp `now` (seconds). Returns `false` when
    /// not running, in which case the host should stop scheduling ticks.
    pub fn tick(&mut self, now: f64) -> bool {
        let State::Running(run) = &mut self.state else {
            return false;
        };
        if let Some(size) = run.pending.take() {
            debug!(width = size.width, height = size.height, "surface resized");
            run.size = size;
            run.target.configure(size);
        }
        let time = run.clock.advance(now);
        let field = ColorField::new(run.size, time);
        run.target.draw(&field);
        true
    }

    /// Releases the surface. Stopping twice is a no-op.
    pub fn stop(&mut self) {
        match std::mem::replace(&mut self.state, State::Stopped) {
            State::Running(run) => {
                run.target.release();
                info!("landing animation stopped");
            }
            State::Uninitialized => self.state = State::Uninitialized,
            State::Stopped => {}
        }
    }
}
