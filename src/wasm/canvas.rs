use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::error::InitError;
use crate::pattern::ColorField;

/// CPU rendition of the line field blitted through a 2D context.
pub struct SoftwareLines {
    ctx: CanvasRenderingContext2d,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl SoftwareLines {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, InitError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(InitError::ContextUnavailable("Canvas 2D"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| InitError::ContextUnavailable("Canvas 2D"))?;
        Ok(Self {
            ctx,
            pixels: Vec::new(),
            width: 1,
            height: 1,
        })
    }

    /// Sets the backing-store size frames are rasterised at.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn draw(&mut self, field: &ColorField) -> Result<(), JsValue> {
        if !field.rasterize_rgba8(self.width, self.height, &mut self.pixels) {
            return Ok(());
        }
        let image =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&self.pixels), self.width, self.height)?;
        self.ctx.put_image_data(&image, 0.0, 0.0)?;
        Ok(())
    }
}
