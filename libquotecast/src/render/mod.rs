//! Quote image rendering
//!
//! Turns a (quote, author) pair into a fixed-size raster image. There is a
//! single hardcoded visual template; the publishing cadence is low-volume
//! and the product scope is one visual style, so nothing here is
//! configurable beyond the font file.

use crate::error::Result;

pub mod template;

// Flat renderer is available for all builds (not just tests) to support
// integration tests on machines without fonts installed.
pub mod mock;

/// A rendered, encoded image ready for upload.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

/// Renders a quotation onto the posting canvas.
///
/// Rendering is CPU-bound and synchronous; given identical inputs the
/// output layout is deterministic.
pub trait QuoteRenderer: Send + Sync {
    fn render(&self, quote: &str, author: &str) -> Result<RenderedImage>;
}
