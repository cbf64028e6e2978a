//! Procedural line-noise backdrop for the portfolio landing page.
//!
//! The numeric core (`noise`, `pattern`) and the render-loop state machine
//! (`lifecycle`) build on every target. The browser host that mounts a
//! WebGL2 or Canvas 2D surface only compiles for wasm32.

pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod noise;
pub mod pattern;
pub mod shading;

pub use config::{AnimationConfig, BackendPreference};
pub use error::InitError;
pub use lifecycle::{Phase, RenderTarget, Renderer, SurfaceHandle, SurfaceSize};
pub use pattern::{color_at, lines, ColorField};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod canvas;
    mod host;
    mod render;

    pub use host::LandingAnimation;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        crate::logging::init();
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::LandingAnimation;
