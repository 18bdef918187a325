//! Error types for Quotecast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuotecastError>;

#[derive(Error, Debug)]
pub enum QuotecastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Supplier error: {0}")]
    Supplier(#[from] SupplierError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl QuotecastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            QuotecastError::InvalidInput(_) => 3,
            QuotecastError::Publish(PublishError::Authentication(_)) => 2,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Credential file {path} unusable: {reason}")]
    Credential { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Supplier failures are explicit so callers can tell "no quote available
/// this attempt" from a crashed supplier, even though both are non-fatal
/// during inventory top-up.
#[derive(Error, Debug)]
pub enum SupplierError {
    #[error("Quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed quote response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No usable font found (tried: {0})")]
    NoUsableFont(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Caption request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Caption API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Caption response contained no text")]
    EmptyResponse,
}

#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}
