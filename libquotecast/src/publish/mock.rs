//! Mock publisher for testing
//!
//! Configurable mock that can simulate authentication and upload
//! behaviors. Designed for integration tests that verify cycle logic
//! without platform credentials or network access.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{PublishError, Result};
use crate::publish::Publisher;

/// Configuration for mock publisher behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub name: String,
    pub auth_succeeds: bool,
    pub publish_succeeds: bool,
    pub auth_error: Option<String>,
    pub publish_error: Option<String>,
    pub is_configured: bool,

    /// Number of times authenticate has been called
    pub auth_call_count: Arc<Mutex<usize>>,
    /// Number of times publish has been called
    pub publish_call_count: Arc<Mutex<usize>>,
    /// (image path, caption) pairs published, for verification
    pub published: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            auth_succeeds: true,
            publish_succeeds: true,
            auth_error: None,
            publish_error: None,
            is_configured: true,
            auth_call_count: Arc::new(Mutex::new(0)),
            publish_call_count: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

pub struct MockPublisher {
    config: MockConfig,
    authenticated: bool,
}

impl MockPublisher {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            authenticated: false,
        }
    }

    /// Publisher that always succeeds
    pub fn success() -> Self {
        Self::new(MockConfig::default())
    }

    /// Publisher that fails authentication
    pub fn auth_failure(error: &str) -> Self {
        Self::new(MockConfig {
            auth_succeeds: false,
            auth_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Publisher that authenticates but fails every upload
    pub fn publish_failure(error: &str) -> Self {
        Self::new(MockConfig {
            publish_succeeds: false,
            publish_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn auth_call_count(&self) -> usize {
        *self.config.auth_call_count.lock().unwrap()
    }

    pub fn publish_call_count(&self) -> usize {
        *self.config.publish_call_count.lock().unwrap()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.config.published.lock().unwrap().clone()
    }

    /// Shared handles for asserting after the publisher has been moved
    /// into a cycle controller.
    pub fn probes(&self) -> MockProbes {
        MockProbes {
            auth_call_count: self.config.auth_call_count.clone(),
            publish_call_count: self.config.publish_call_count.clone(),
            published: self.config.published.clone(),
        }
    }
}

/// Counters shared with a MockPublisher that has been moved elsewhere.
#[derive(Clone)]
pub struct MockProbes {
    auth_call_count: Arc<Mutex<usize>>,
    publish_call_count: Arc<Mutex<usize>>,
    published: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockProbes {
    pub fn auth_call_count(&self) -> usize {
        *self.auth_call_count.lock().unwrap()
    }

    pub fn publish_call_count(&self) -> usize {
        *self.publish_call_count.lock().unwrap()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn authenticate(&mut self) -> Result<()> {
        *self.config.auth_call_count.lock().unwrap() += 1;

        if self.config.auth_succeeds {
            self.authenticated = true;
            Ok(())
        } else {
            let error_msg = self
                .config
                .auth_error
                .clone()
                .unwrap_or_else(|| "Mock authentication failed".to_string());
            Err(PublishError::Authentication(error_msg).into())
        }
    }

    async fn publish(&self, image: &Path, caption: &str) -> Result<String> {
        *self.config.publish_call_count.lock().unwrap() += 1;

        if !self.authenticated {
            return Err(PublishError::Authentication("Not authenticated".to_string()).into());
        }

        if self.config.publish_succeeds {
            self.config
                .published
                .lock()
                .unwrap()
                .push((image.display().to_string(), caption.to_string()));

            let count = *self.config.publish_call_count.lock().unwrap();
            Ok(format!("{}:mock-media-{}", self.config.name, count))
        } else {
            let error_msg = self
                .config
                .publish_error
                .clone()
                .unwrap_or_else(|| "Mock publish failed".to_string());
            Err(PublishError::Upload(error_msg).into())
        }
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured
    }
}
