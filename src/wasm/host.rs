//! Browser host: mounts a canvas into the landing container and drives the
//! renderer from `requestAnimationFrame`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, Window};

use super::canvas::SoftwareLines;
use super::render::LineShader;
use crate::config::{AnimationConfig, BackendPreference};
use crate::error::InitError;
use crate::lifecycle::{RenderTarget, Renderer, SurfaceHandle, SurfaceSize};
use crate::pattern::ColorField;

type SharedRenderer = Rc<RefCell<Renderer<Mounted>>>;
type FrameCallback = Closure<dyn FnMut(f64)>;

/// Landing-page animation bound to a container element.
///
/// ```js
/// const landing = new LandingAnimation("landingAnimation");
/// try { landing.start(); } catch (err) { /* keep the static page */ }
/// ```
#[wasm_bindgen]
pub struct LandingAnimation {
    container_id: String,
    renderer: SharedRenderer,
}

#[wasm_bindgen]
impl LandingAnimation {
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> LandingAnimation {
        LandingAnimation {
            container_id: container_id.to_string(),
            renderer: Rc::new(RefCell::new(Renderer::new())),
        }
    }

    /// Mounts the canvas and starts animating. Throws if no rendering context
    /// can be created; the page should then carry on without the animation.
    pub fn start(&self) -> Result<(), JsValue> {
        let surface = WebSurface {
            container_id: self.container_id.clone(),
            renderer: Rc::downgrade(&self.renderer),
        };
        let mut renderer = self
            .renderer
            .try_borrow_mut()
            .map_err(|_| InitError::Js("renderer is busy".to_string()))?;
        renderer.start(surface).map_err(|err| {
            warn!("landing animation unavailable: {err}");
            JsValue::from(err)
        })
    }

    /// Resizes the surface, in CSS pixels, from the next frame on. Sizes below
    /// one pixel and non-finite numbers are ignored.
    pub fn resize(&self, width: f64, height: f64) {
        let Some(size) = SurfaceSize::from_css(width, height) else {
            trace!(width, height, "resize ignored: not a surface size");
            return;
        };
        if let Ok(mut renderer) = self.renderer.try_borrow_mut() {
            renderer.resize(size.width(), size.height());
        }
    }

    /// Unmounts the canvas and releases GPU resources. Safe to call repeatedly.
    pub fn stop(&self) {
        if let Ok(mut renderer) = self.renderer.try_borrow_mut() {
            renderer.stop();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.renderer
            .try_borrow()
            .map(|renderer| renderer.is_running())
            .unwrap_or(false)
    }

    /// Reveals the container and its companions and locks page scrolling.
    pub fn show(&self) -> Result<(), JsValue> {
        Page::lookup(&self.container_id)?
            .set_visible(true)
            .map_err(JsValue::from)
    }

    /// Hides the container and its companions and releases the scroll lock.
    pub fn hide(&self) -> Result<(), JsValue> {
        Page::lookup(&self.container_id)?
            .set_visible(false)
            .map_err(JsValue::from)
    }
}

/// The DOM pieces the animation works with.
struct Page {
    window: Window,
    document: Document,
    container: HtmlElement,
    config: AnimationConfig,
}

impl Page {
    fn lookup(container_id: &str) -> Result<Self, InitError> {
        let window = window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoWindow)?;
        let container = document
            .get_element_by_id(container_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| InitError::ContainerNotFound(container_id.to_string()))?;
        let config = match container.get_attribute("data-animation") {
            Some(json) => AnimationConfig::from_json(&json)?,
            None => AnimationConfig::default(),
        };
        Ok(Self {
            window,
            document,
            container,
            config,
        })
    }

    fn css_size(&self) -> SurfaceSize {
        css_size(&self.container)
    }

    fn attach_canvas(&self) -> Result<AttachedCanvas, InitError> {
        let element = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| InitError::ContextUnavailable("canvas"))?;
        self.container.append_child(&element)?;
        Ok(AttachedCanvas { element })
    }

    fn set_visible(&self, visible: bool) -> Result<(), InitError> {
        let hidden = &self.config.hidden_class;
        toggle_class(&self.container, hidden, !visible)?;
        for id in &self.config.companions {
            if let Some(el) = self.document.get_element_by_id(id) {
                toggle_class(&el, hidden, !visible)?;
            }
        }
        if let Some(selector) = &self.config.scroll_lock_selector {
            if let Some(el) = self.document.query_selector(selector)? {
                toggle_class(&el, &self.config.scroll_lock_class, visible)?;
            }
        }
        Ok(())
    }
}

fn css_size(container: &Element) -> SurfaceSize {
    SurfaceSize::clamped(
        container.client_width().max(0) as u32,
        container.client_height().max(0) as u32,
    )
}

fn toggle_class(el: &Element, class: &str, on: bool) -> Result<(), InitError> {
    el.class_list().toggle_with_force(class, on)?;
    Ok(())
}

struct WebSurface {
    container_id: String,
    renderer: Weak<RefCell<Renderer<Mounted>>>,
}

impl SurfaceHandle for WebSurface {
    type Target = Mounted;

    fn acquire(self) -> Result<(Mounted, SurfaceSize), InitError> {
        let page = Page::lookup(&self.container_id)?;

        let (canvas, backend) = match page.config.backend {
            BackendPreference::WebGl2 => {
                let canvas = page.attach_canvas()?;
                let shader = LineShader::new(&canvas.element, &page.config)?;
                (canvas, Backend::Gpu(shader))
            }
            BackendPreference::Canvas2d => {
                let canvas = page.attach_canvas()?;
                let software = SoftwareLines::new(&canvas.element)?;
                (canvas, Backend::Software(software))
            }
            BackendPreference::Auto => {
                let canvas = page.attach_canvas()?;
                match LineShader::new(&canvas.element, &page.config) {
                    Ok(shader) => (canvas, Backend::Gpu(shader)),
                    Err(err) => {
                        warn!("{err}; falling back to software rendering");
                        // a canvas that handed out a webgl2 context refuses "2d"
                        drop(canvas);
                        let canvas = page.attach_canvas()?;
                        let software = SoftwareLines::new(&canvas.element)?;
                        (canvas, Backend::Software(software))
                    }
                }
            }
        };

        let resize = {
            let renderer = self.renderer.clone();
            let container = page.container.clone();
            let on_resize = Closure::wrap(Box::new(move || {
                let Some(renderer) = renderer.upgrade() else {
                    return;
                };
                // zero sizes reach the renderer so it can ignore them
                if let Ok(mut renderer) = renderer.try_borrow_mut() {
                    renderer.resize(
                        container.client_width().max(0) as u32,
                        container.client_height().max(0) as u32,
                    );
                }
            }) as Box<dyn FnMut()>);
            Listener::new(&page.window, "resize", on_resize)?
        };

        let frames = FrameLoop::start(&page.window, self.renderer)?;

        let pixel_ratio = page
            .config
            .effective_pixel_ratio(page.window.device_pixel_ratio());
        let mounted = Mounted {
            _frames: frames,
            _resize: resize,
            backend,
            canvas,
            pixel_ratio,
            software_scale: page.config.software_scale,
            software_max_pixels: page.config.software_max_pixels,
        };
        Ok((mounted, page.css_size()))
    }
}

enum Backend {
    Gpu(LineShader),
    Software(SoftwareLines),
}

/// Everything a running animation holds on to. Fields drop in declaration
/// order: the frame loop and listener go first, the canvas leaves the DOM last.
struct Mounted {
    _frames: FrameLoop,
    _resize: Listener,
    backend: Backend,
    canvas: AttachedCanvas,
    pixel_ratio: f64,
    software_scale: f64,
    software_max_pixels: u64,
}

impl RenderTarget for Mounted {
    fn configure(&mut self, size: SurfaceSize) {
        let backing = match self.backend {
            Backend::Gpu(_) => size.backing(self.pixel_ratio, None),
            Backend::Software(_) => size.backing(
                self.pixel_ratio * self.software_scale,
                Some(self.software_max_pixels),
            ),
        };
        let (width, height) = (backing.width(), backing.height());

        let canvas = &self.canvas.element;
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        let styled = style
            .set_property("width", &format!("{}px", size.width()))
            .and_then(|_| style.set_property("height", &format!("{}px", size.height())))
            .and_then(|_| style.set_property("display", "block"));
        if let Err(err) = styled {
            warn!("failed to style landing canvas: {err:?}");
        }

        match &mut self.backend {
            Backend::Gpu(shader) => shader.viewport(width, height),
            Backend::Software(software) => software.set_size(width, height),
        }
    }

    fn draw(&mut self, field: &ColorField) {
        match &mut self.backend {
            Backend::Gpu(shader) => shader.draw(field),
            Backend::Software(software) => {
                if let Err(err) = software.draw(field) {
                    warn!("software frame dropped: {err:?}");
                }
            }
        }
    }
}

/// Canvas element removed from the page on drop.
struct AttachedCanvas {
    element: HtmlCanvasElement,
}

impl Drop for AttachedCanvas {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// Event listener removed on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut()>,
    ) -> Result<Self, InitError> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Self-rescheduling `requestAnimationFrame` loop, cancelled on drop.
struct FrameLoop {
    window: Window,
    // holds the callback that re-requests itself; cleared on drop to break the cycle
    slot: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(window: &Window, renderer: Weak<RefCell<Renderer<Mounted>>>) -> Result<Self, InitError> {
        let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let tick = {
            let window = window.clone();
            let slot = slot.clone();
            let pending = pending.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                pending.set(None);
                let Some(renderer) = renderer.upgrade() else {
                    return;
                };
                // a busy renderer only skips this frame
                let running = match renderer.try_borrow_mut() {
                    Ok(mut renderer) => renderer.tick(timestamp / 1000.0),
                    Err(_) => true,
                };
                if running {
                    if let Err(err) = request_frame(&window, &slot, &pending) {
                        warn!("animation frame request failed: {err:?}");
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        };
        *slot.borrow_mut() = Some(tick);

        request_frame(window, &slot, &pending)?;
        Ok(Self {
            window: window.clone(),
            slot,
            pending,
        })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.slot.borrow_mut().take();
    }
}

fn request_frame(
    window: &Window,
    slot: &RefCell<Option<FrameCallback>>,
    pending: &Cell<Option<i32>>,
) -> Result<(), JsValue> {
    if let Some(callback) = slot.borrow().as_ref() {
        let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        pending.set(Some(id));
    }
    Ok(())
}
