//! Host-side options for mounting the animation.
//!
//! These cover presentation only; the pattern's visual constants are fixed.

use serde::{Deserialize, Serialize};

use crate::error::InitError;

/// Which rendering context to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    /// WebGL2, falling back to the Canvas 2D software path
    #[default]
    Auto,
    #[serde(rename = "webgl2")]
    WebGl2,
    #[serde(rename = "canvas2d")]
    Canvas2d,
}

/// Roughly 400x300: every pixel costs six octaves of noise on the main thread.
pub const DEFAULT_SOFTWARE_MAX_PIXELS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub backend: BackendPreference,

    /// Backing-store pixels per CSS pixel; `None` uses the device pixel ratio
    pub pixel_ratio: Option<f64>,

    /// WebGL context antialiasing
    pub antialias: bool,

    /// Transparent canvas backdrop
    pub alpha: bool,

    /// Backing-store scale of the software path, in (0, 1]
    pub software_scale: f64,

    /// Most pixels the software path rasterises per frame
    pub software_max_pixels: u64,

    /// Class that hides the container and its companions
    pub hidden_class: String,

    /// Ids of elements shown and hidden together with the container
    pub companions: Vec<String>,

    /// Element whose scrolling is locked while the animation is shown
    pub scroll_lock_selector: Option<String>,

    pub scroll_lock_class: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            pixel_ratio: None,
            antialias: true,
            alpha: true,
            software_scale: 0.5,
            software_max_pixels: DEFAULT_SOFTWARE_MAX_PIXELS,
            hidden_class: "hidden".to_string(),
            companions: Vec::new(),
            scroll_lock_selector: None,
            scroll_lock_class: "no-scroll".to_string(),
        }
    }
}

impl AnimationConfig {
    /// Parses a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, InitError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InitError> {
        if let Some(ratio) = self.pixel_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(InitError::Config(format!(
                    "pixel_ratio must be a positive number, got {ratio}"
                )));
            }
        }
        if !(self.software_scale > 0.0 && self.software_scale <= 1.0) {
            return Err(InitError::Config(format!(
                "software_scale must be in (0, 1], got {}",
                self.software_scale
            )));
        }
        if self.software_max_pixels == 0 {
            return Err(InitError::Config(
                "software_max_pixels must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective pixel ratio given the device's, falling back to 1.
    pub fn effective_pixel_ratio(&self, device: f64) -> f64 {
        match self.pixel_ratio {
            Some(ratio) => ratio,
            None if device.is_finite() && device > 0.0 => device,
            None => 1.0,
        }
    }
}
