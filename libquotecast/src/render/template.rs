//! The fixed posting template
//!
//! 1080x1080 solid black canvas. The quote is word-wrapped at 30
//! characters, drawn at 60 px in white and centered as a block both
//! horizontally and vertically; each line is additionally centered on its
//! own. The author goes underneath at 40 px, centered, at a fixed
//! vertical offset. Output is JPEG at quality 90.

use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::render::{QuoteRenderer, RenderedImage};

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1080;
pub const WRAP_WIDTH: usize = 30;
const QUOTE_SIZE: f32 = 60.0;
const AUTHOR_SIZE: f32 = 40.0;
const LINE_SPACING: u32 = 10;
const AUTHOR_Y: i32 = 920;
const JPEG_QUALITY: u8 = 90;
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Fonts tried, in order, when no preferred font is configured or the
/// preferred font cannot be loaded.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct TemplateRenderer {
    font: FontVec,
}

impl TemplateRenderer {
    /// Build the renderer, resolving a usable font.
    ///
    /// A missing or unreadable preferred font degrades silently to the
    /// fallback chain (warn-level log only). Only a machine with no
    /// candidate font at all produces an error.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let mut tried = Vec::new();

        if let Some(preferred) = &config.font_file {
            match load_font(preferred) {
                Ok(font) => {
                    debug!("Using configured font: {}", preferred);
                    return Ok(Self { font });
                }
                Err(_) => {
                    warn!(
                        "Configured font {} not usable, falling back to system fonts",
                        preferred
                    );
                    tried.push(preferred.clone());
                }
            }
        }

        for candidate in FALLBACK_FONTS {
            match load_font(candidate) {
                Ok(font) => {
                    debug!("Using font: {}", candidate);
                    return Ok(Self { font });
                }
                Err(_) => tried.push((*candidate).to_string()),
            }
        }

        Err(RenderError::NoUsableFont(tried.join(", ")).into())
    }
}

impl QuoteRenderer for TemplateRenderer {
    fn render(&self, quote: &str, author: &str) -> Result<RenderedImage> {
        let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

        let quote_scale = PxScale::from(QUOTE_SIZE);
        let author_scale = PxScale::from(AUTHOR_SIZE);

        // Quote block: wrapped lines, each centered horizontally, the
        // block centered vertically.
        let lines = wrap_quote(quote);
        let line_advance = QUOTE_SIZE as u32 + LINE_SPACING;
        let block_height = block_height(lines.len() as u32, QUOTE_SIZE as u32, LINE_SPACING);
        let top = block_top(CANVAS_HEIGHT, block_height);

        for (i, line) in lines.iter().enumerate() {
            let (line_width, _) = text_size(quote_scale, &self.font, line);
            let x = centered_x(CANVAS_WIDTH, line_width);
            let y = top + (i as u32 * line_advance) as i32;
            draw_text_mut(&mut canvas, FOREGROUND, x, y, quote_scale, &self.font, line);
        }

        // Author line under the block, fixed vertical offset.
        let attribution = attribution_line(author);
        let (author_width, _) = text_size(author_scale, &self.font, &attribution);
        draw_text_mut(
            &mut canvas,
            FOREGROUND,
            centered_x(CANVAS_WIDTH, author_width),
            AUTHOR_Y,
            author_scale,
            &self.font,
            &attribution,
        );

        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
        DynamicImage::ImageRgb8(canvas)
            .write_with_encoder(encoder)
            .map_err(RenderError::Encode)?;

        Ok(RenderedImage {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            jpeg,
        })
    }
}

fn load_font(path: &str) -> std::result::Result<FontVec, RenderError> {
    let expanded = shellexpand::tilde(path).to_string();
    let data = std::fs::read(&expanded).map_err(RenderError::IoError)?;
    // Index 0 handles .ttc collections as well as plain .ttf files.
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|_| RenderError::NoUsableFont(expanded))
}

/// Word-wrap the quote to the fixed per-line character budget.
pub fn wrap_quote(quote: &str) -> Vec<String> {
    textwrap::wrap(quote, WRAP_WIDTH)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Horizontal offset that centers an item of the given width.
pub fn centered_x(canvas_width: u32, item_width: u32) -> i32 {
    (canvas_width as i32 - item_width as i32) / 2
}

/// Vertical offset that centers a block of the given height.
pub fn block_top(canvas_height: u32, block_height: u32) -> i32 {
    (canvas_height as i32 - block_height as i32) / 2
}

/// Total height of a block of `lines` text lines.
pub fn block_height(lines: u32, line_height: u32, spacing: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    lines * line_height + (lines - 1) * spacing
}

fn attribution_line(author: &str) -> String {
    format!("- {}", author)
}
