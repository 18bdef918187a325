//! HTTP quote supplier
//!
//! Talks to a public quote API that answers GET requests with a JSON array
//! whose first element carries the quotation under `q` and the author
//! under `a`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SupplierConfig;
use crate::error::{Result, SupplierError};
use crate::supplier::QuoteSupplier;
use crate::types::FetchedQuote;

#[derive(Debug, Deserialize)]
struct WireQuote {
    q: String,
    a: String,
}

pub struct HttpQuoteSupplier {
    client: reqwest::Client,
    url: String,
}

impl HttpQuoteSupplier {
    /// Build a supplier from configuration. The timeout applies to the
    /// whole request, connect included.
    pub fn new(config: &SupplierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SupplierError::Request)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl QuoteSupplier for HttpQuoteSupplier {
    async fn fetch_one(&self) -> Result<FetchedQuote> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(SupplierError::Request)?
            .error_for_status()
            .map_err(SupplierError::Request)?
            .text()
            .await
            .map_err(SupplierError::Request)?;

        Ok(parse_quote_payload(&body)?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Interpret the API response body as a quotation.
///
/// Factored out of the transport so malformed payloads can be exercised
/// without a server.
fn parse_quote_payload(body: &str) -> std::result::Result<FetchedQuote, SupplierError> {
    let quotes: Vec<WireQuote> = serde_json::from_str(body)
        .map_err(|e| SupplierError::Malformed(format!("not a quote array: {}", e)))?;

    let first = quotes
        .into_iter()
        .next()
        .ok_or_else(|| SupplierError::Malformed("empty quote array".to_string()))?;

    let text = first.q.trim().to_string();
    let author = first.a.trim().to_string();

    if text.is_empty() {
        return Err(SupplierError::Malformed("blank quote text".to_string()));
    }

    Ok(FetchedQuote { text, author })
}
