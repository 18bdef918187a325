//! Core types for Quotecast

use serde::{Deserialize, Serialize};

/// One stored quotation with author and consumption flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub used: bool,
    pub created_at: i64,
    pub used_at: Option<i64>,
}

/// A quotation pulled from the external supplier, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedQuote {
    pub text: String,
    pub author: String,
}

impl FetchedQuote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Outcome of the inventory top-up phase of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InventoryOutcome {
    /// The unused-quote buffer reached the target count.
    Filled { added: u32 },
    /// Supplier attempts ran out before the target was reached. The cycle
    /// continues with whatever inventory exists.
    Shortfall {
        available: u32,
        target: u32,
        attempts: u32,
        last_error: Option<String>,
    },
}

impl InventoryOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, InventoryOutcome::Filled { .. })
    }
}

/// One successfully published quote within a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedQuote {
    pub quote_id: i64,
    pub text: String,
    pub author: String,
    pub caption: String,
    pub platform_post_id: String,
}

/// Report for one full cycle run, serializable for `--format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub inventory: InventoryOutcome,
    pub posted: Vec<PostedQuote>,
}

impl CycleReport {
    /// True when the run completed without a shortfall and published
    /// everything it selected.
    pub fn is_clean(&self) -> bool {
        self.inventory.is_filled()
    }
}
