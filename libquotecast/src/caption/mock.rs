//! Canned captioner for testing

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::caption::CaptionGenerator;
use crate::error::{CaptionError, Result};

pub struct CannedCaptioner {
    caption: String,
    fails: bool,
    /// Quotes this captioner was asked about, for verification
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedCaptioner {
    /// Captioner that always returns the given caption
    pub fn with_caption(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            fails: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Captioner that fails every request
    pub fn failing() -> Self {
        Self {
            caption: String::new(),
            fails: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionGenerator for CannedCaptioner {
    async fn generate(&self, quote: &str) -> Result<String> {
        self.requests.lock().unwrap().push(quote.to_string());

        if self.fails {
            return Err(CaptionError::EmptyResponse.into());
        }

        Ok(self.caption.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
