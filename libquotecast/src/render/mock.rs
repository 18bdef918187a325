//! Flat renderer for testing
//!
//! Produces a real canvas-sized JPEG without drawing any text, so
//! integration tests get a valid upload payload on machines with no fonts
//! installed.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::{Arc, Mutex};

use crate::error::{RenderError, Result};
use crate::render::{QuoteRenderer, RenderedImage};

pub struct FlatRenderer {
    width: u32,
    height: u32,
    /// (quote, author) pairs rendered, for verification
    rendered: Arc<Mutex<Vec<(String, String)>>>,
}

impl FlatRenderer {
    pub fn new() -> Self {
        Self {
            width: super::template::CANVAS_WIDTH,
            height: super::template::CANVAS_HEIGHT,
            rendered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn rendered(&self) -> Vec<(String, String)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl Default for FlatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteRenderer for FlatRenderer {
    fn render(&self, quote: &str, author: &str) -> Result<RenderedImage> {
        self.rendered
            .lock()
            .unwrap()
            .push((quote.to_string(), author.to_string()));

        let canvas = RgbImage::from_pixel(self.width, self.height, Rgb([0, 0, 0]));

        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, 90);
        DynamicImage::ImageRgb8(canvas)
            .write_with_encoder(encoder)
            .map_err(RenderError::Encode)?;

        Ok(RenderedImage {
            width: self.width,
            height: self.height,
            jpeg,
        })
    }
}
