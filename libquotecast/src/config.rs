//! Configuration management for Quotecast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub supplier: SupplierConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub caption: CaptionConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/quotecast/quotes.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            url: "https://zenquotes.io/api/random".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Preferred font file. When unset or unreadable the renderer falls
    /// back to a chain of common system fonts.
    pub font_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    #[serde(default = "default_caption_model")]
    pub model: String,
    pub api_key_file: String,
    #[serde(default = "default_caption_timeout")]
    pub timeout_secs: u64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            model: default_caption_model(),
            api_key_file: String::new(),
            timeout_secs: default_caption_timeout(),
        }
    }
}

fn default_caption_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_caption_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub username: String,
    pub password_file: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    /// Alternate credential-loading strategy: base64-encoded session JSON
    /// supplied inline. The session file, when present, wins.
    pub session: Option<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password_file: String::new(),
            session_file: default_session_file(),
            session: None,
        }
    }
}

fn default_session_file() -> String {
    "~/.local/share/quotecast/session.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// How many quotes one cycle publishes (and the unused-inventory target).
    pub posts_per_cycle: u32,
    /// Fixed pause between successive publishes in a multi-post cycle.
    pub post_delay_secs: u64,
    /// Cap on supplier calls during inventory top-up.
    pub max_fill_attempts: u32,
    /// Where the rendered image is written before upload. Fixed per run.
    pub image_path: String,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            posts_per_cycle: 1,
            post_delay_secs: 60,
            max_fill_attempts: 10,
            image_path: "post.jpg".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Verify that everything a publishing run needs is present.
    ///
    /// Called by `quote-cycle` before any work so a misconfigured process
    /// fails fast. `quote-queue` skips this: it only touches the store.
    pub fn validate_credentials(&self) -> Result<()> {
        if self.publisher.username.trim().is_empty() {
            return Err(ConfigError::MissingField("publisher.username".to_string()).into());
        }
        if self.publisher.password_file.trim().is_empty() {
            return Err(ConfigError::MissingField("publisher.password_file".to_string()).into());
        }
        if self.caption.api_key_file.trim().is_empty() {
            return Err(ConfigError::MissingField("caption.api_key_file".to_string()).into());
        }
        Ok(())
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            store: StoreConfig::default(),
            supplier: SupplierConfig::default(),
            render: RenderConfig::default(),
            caption: CaptionConfig {
                model: default_caption_model(),
                api_key_file: "~/.config/quotecast/gemini.key".to_string(),
                timeout_secs: default_caption_timeout(),
            },
            publisher: PublisherConfig {
                username: String::new(),
                password_file: "~/.config/quotecast/instagram.password".to_string(),
                session_file: default_session_file(),
                session: None,
            },
            cycle: CycleConfig::default(),
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("QUOTECAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("quotecast").join("config.toml"))
}

/// Read a credential from a file named in the config: expand `~`, trim
/// surrounding whitespace, reject empty content.
pub fn read_credential_file(path: &str) -> Result<String> {
    let expanded = shellexpand::tilde(path).to_string();
    let content = std::fs::read_to_string(&expanded).map_err(|e| ConfigError::Credential {
        path: expanded.clone(),
        reason: e.to_string(),
    })?;

    let trimmed = content.trim().to_string();
    if trimmed.is_empty() {
        return Err(ConfigError::Credential {
            path: expanded,
            reason: "file is empty".to_string(),
        }
        .into());
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn minimal_toml() -> &'static str {
        r#"
[caption]
api_key_file = "/tmp/gemini.key"

[publisher]
username = "quotebot"
password_file = "/tmp/ig.password"
"#
    }

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();

        assert_eq!(config.store.path, "~/.local/share/quotecast/quotes.db");
        assert_eq!(config.supplier.url, "https://zenquotes.io/api/random");
        assert_eq!(config.supplier.timeout_secs, 10);
        assert_eq!(config.caption.model, "gemini-2.5-flash");
        assert_eq!(config.caption.timeout_secs, 30);
        assert_eq!(config.cycle.posts_per_cycle, 1);
        assert_eq!(config.cycle.post_delay_secs, 60);
        assert_eq!(config.cycle.max_fill_attempts, 10);
        assert_eq!(config.cycle.image_path, "post.jpg");
        assert!(config.render.font_file.is_none());
        assert!(config.publisher.session.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[store]
path = "/var/lib/quotecast/quotes.db"

[supplier]
url = "https://example.test/api/random"
timeout_secs = 5

[render]
font_file = "/usr/share/fonts/custom/Quote.ttf"

[caption]
model = "gemini-2.0-flash"
api_key_file = "/etc/quotecast/gemini.key"
timeout_secs = 15

[publisher]
username = "quotebot"
password_file = "/etc/quotecast/ig.password"
session_file = "/var/lib/quotecast/session.json"
session = "eyJmYWtlIjoiYmxvYiJ9"

[cycle]
posts_per_cycle = 3
post_delay_secs = 120
max_fill_attempts = 5
image_path = "/tmp/quotecast.jpg"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.path, "/var/lib/quotecast/quotes.db");
        assert_eq!(config.supplier.timeout_secs, 5);
        assert_eq!(
            config.render.font_file.as_deref(),
            Some("/usr/share/fonts/custom/Quote.ttf")
        );
        assert_eq!(config.caption.model, "gemini-2.0-flash");
        assert_eq!(config.publisher.session.as_deref(), Some("eyJmYWtlIjoiYmxvYiJ9"));
        assert_eq!(config.cycle.posts_per_cycle, 3);
        assert_eq!(config.cycle.post_delay_secs, 120);
    }

    #[test]
    fn test_empty_config_parses_but_fails_validation() {
        // quote-queue only needs the store section; publishing binaries
        // must still fail fast on the missing credentials.
        let config: Config = toml::from_str("").unwrap();
        assert!(config.validate_credentials().is_err());
    }

    #[test]
    fn test_validate_credentials_ok() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert!(config.validate_credentials().is_ok());
    }

    #[test]
    fn test_validate_credentials_missing_username() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.publisher.username = "  ".to_string();

        let err = config.validate_credentials().unwrap_err();
        assert!(err.to_string().contains("publisher.username"));
    }

    #[test]
    fn test_validate_credentials_missing_api_key_file() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.caption.api_key_file = String::new();

        let err = config.validate_credentials().unwrap_err();
        assert!(err.to_string().contains("caption.api_key_file"));
    }

    #[test]
    fn test_read_credential_file_trims() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  s3cret\n").unwrap();

        let value = read_credential_file(path.to_str().unwrap()).unwrap();
        assert_eq!(value, "s3cret");
    }

    #[test]
    fn test_read_credential_file_empty_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n  \n").unwrap();

        let result = read_credential_file(path.to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_read_credential_file_missing_is_error() {
        let result = read_credential_file("/nonexistent/quotecast/token");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_env_override() {
        std::env::set_var("QUOTECAST_CONFIG", "/tmp/quotecast-test/config.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var("QUOTECAST_CONFIG");

        assert_eq!(path, PathBuf::from("/tmp/quotecast-test/config.toml"));
    }

    #[test]
    #[serial]
    fn test_load_from_path_missing_file() {
        let result = Config::load_from_path(&PathBuf::from("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
