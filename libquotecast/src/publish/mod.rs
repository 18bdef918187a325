//! Publishing
//!
//! A publisher owns the session with one social platform: it
//! authenticates (reusing a persisted session credential when possible)
//! and uploads an image with a caption. Upload failures are not handled
//! specially; they propagate and abort the current run so the selected
//! quote stays eligible for a future attempt.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

pub mod instagram;

// Mock publisher is available for all builds (not just tests) to support
// integration tests.
pub mod mock;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Establish an authenticated session.
    ///
    /// Implementations should reuse a persisted session credential when
    /// one is available and fall back to a fresh login, persisting the new
    /// credential for future runs.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Authentication` when no session can be
    /// established.
    async fn authenticate(&mut self) -> Result<()>;

    /// Upload the image file with the given caption.
    ///
    /// # Returns
    ///
    /// The platform-specific media id of the created post.
    async fn publish(&self, image: &Path, caption: &str) -> Result<String>;

    /// Platform identifier for logs (e.g., "instagram", "mock")
    fn name(&self) -> &str;

    /// Whether credentials are present so authentication can be attempted
    fn is_configured(&self) -> bool;
}
