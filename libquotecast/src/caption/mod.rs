//! Caption generation
//!
//! A caption generator turns a quotation into a short social caption via
//! an external text-generation service. The contract is best-effort prompt
//! compliance: the response text is returned trimmed but otherwise
//! verbatim, with no validation of emoji or hashtag counts.

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;

// Canned captioner is available for all builds (not just tests) to
// support integration tests.
pub mod mock;

#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    /// Generate a caption for the given quotation text.
    async fn generate(&self, quote: &str) -> Result<String>;

    /// Short identifier for logs (e.g., "gemini", "canned")
    fn name(&self) -> &str;
}
