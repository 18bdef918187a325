//! Scripted supplier for testing
//!
//! Plays back a fixed sequence of fetch outcomes, then keeps failing. Used
//! to exercise inventory top-up without network access: bounded-attempt
//! behavior, duplicate fetches, and supplier crashes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{Result, SupplierError};
use crate::supplier::QuoteSupplier;
use crate::types::FetchedQuote;

/// One scripted fetch outcome
#[derive(Debug, Clone)]
pub enum ScriptedFetch {
    Quote(FetchedQuote),
    Failure(String),
}

pub struct ScriptedSupplier {
    script: Arc<Mutex<VecDeque<ScriptedFetch>>>,
    exhausted_reason: String,
    fetch_calls: Arc<Mutex<usize>>,
}

impl ScriptedSupplier {
    pub fn new(script: Vec<ScriptedFetch>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            exhausted_reason: "script exhausted".to_string(),
            fetch_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Supplier that returns the given quotes in order, then fails
    pub fn with_quotes(quotes: Vec<(&str, &str)>) -> Self {
        Self::new(
            quotes
                .into_iter()
                .map(|(text, author)| ScriptedFetch::Quote(FetchedQuote::new(text, author)))
                .collect(),
        )
    }

    /// Supplier that fails every fetch with the given reason
    pub fn always_failing(reason: &str) -> Self {
        let mut supplier = Self::new(Vec::new());
        supplier.exhausted_reason = reason.to_string();
        supplier
    }

    /// Number of times fetch_one was called
    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.lock().unwrap()
    }
}

#[async_trait]
impl QuoteSupplier for ScriptedSupplier {
    async fn fetch_one(&self) -> Result<FetchedQuote> {
        *self.fetch_calls.lock().unwrap() += 1;

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedFetch::Quote(quote)) => Ok(quote),
            Some(ScriptedFetch::Failure(reason)) => Err(SupplierError::Malformed(reason).into()),
            None => Err(SupplierError::Malformed(self.exhausted_reason.clone()).into()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
