//! Quote sourcing
//!
//! A supplier produces one new quotation per call from some external
//! source. Suppliers never retry internally; a failed fetch is reported to
//! the caller, which decides whether to try again on a later attempt.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::FetchedQuote;

pub mod http;

// Scripted supplier is available for all builds (not just tests) to
// support integration tests.
pub mod mock;

/// Source of fresh quotations.
#[async_trait]
pub trait QuoteSupplier: Send + Sync {
    /// Fetch a single quotation.
    ///
    /// # Errors
    ///
    /// Returns `SupplierError::Request` for transport failures (including
    /// timeouts) and `SupplierError::Malformed` when the response cannot be
    /// interpreted as a quotation. Both are non-fatal during inventory
    /// top-up; the controller logs them and moves on.
    async fn fetch_one(&self) -> Result<FetchedQuote>;

    /// Short identifier for logs (e.g., "zenquotes", "scripted")
    fn name(&self) -> &str;
}
