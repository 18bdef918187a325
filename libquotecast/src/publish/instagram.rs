//! Instagram publisher
//!
//! Thin client over the Instagram mobile endpoints: login, session reuse,
//! and the two-step photo upload (raw JPEG upload, then media configure
//! with the caption).
//!
//! The session credential (user id, session cookie, CSRF token, device id)
//! is persisted as JSON after a fresh login and reused on later runs to
//! avoid re-authenticating every cycle. It can alternatively be supplied
//! inline in the config as a base64-encoded blob; the file, when present,
//! wins, and fresh logins always write the file.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{read_credential_file, PublisherConfig};
use crate::error::{PublishError, Result};
use crate::publish::Publisher;

const API_BASE: &str = "https://i.instagram.com/api/v1";
const UPLOAD_BASE: &str = "https://i.instagram.com/rupload_igphoto";
const USER_AGENT: &str = "Instagram 275.0.0.27.98 Android (30/11; 420dpi; 1080x2137)";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Opaque authentication state enabling login reuse across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramSession {
    pub user_id: u64,
    pub session_id: String,
    pub csrf_token: String,
    pub device_id: String,
}

impl InstagramSession {
    pub fn from_json(json: &str) -> std::result::Result<Self, PublishError> {
        serde_json::from_str(json).map_err(|e| {
            PublishError::Authentication(format!("Unreadable session credential: {}", e))
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("session serializes")
    }

    /// Decode a base64-encoded session blob supplied via configuration.
    pub fn from_inline_blob(blob: &str) -> std::result::Result<Self, PublishError> {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(blob.trim())
            .map_err(|e| {
                PublishError::Authentication(format!("Invalid inline session blob: {}", e))
            })?;
        let json = String::from_utf8(decoded).map_err(|e| {
            PublishError::Authentication(format!("Invalid inline session blob: {}", e))
        })?;
        Self::from_json(&json)
    }

    fn cookie_header(&self) -> String {
        format!(
            "sessionid={}; csrftoken={}; ds_user_id={}",
            self.session_id, self.csrf_token, self.user_id
        )
    }
}

pub struct InstagramPublisher {
    client: reqwest::Client,
    username: String,
    password: String,
    session_file: PathBuf,
    session: Option<InstagramSession>,
}

impl InstagramPublisher {
    /// Build the publisher from configuration: read the password file and
    /// load any persisted session (file first, inline blob second).
    pub fn from_config(config: &PublisherConfig) -> Result<Self> {
        let password = read_credential_file(&config.password_file)?;

        let session_file =
            PathBuf::from(shellexpand::tilde(&config.session_file).to_string());

        let session = match std::fs::read_to_string(&session_file) {
            Ok(json) => {
                debug!("Loaded session credential from {}", session_file.display());
                Some(InstagramSession::from_json(&json)?)
            }
            Err(_) => match &config.session {
                Some(blob) => {
                    debug!("Loaded session credential from inline config value");
                    Some(InstagramSession::from_inline_blob(blob)?)
                }
                None => None,
            },
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PublishError::Network(e.to_string()))?;

        Ok(Self {
            client,
            username: config.username.clone(),
            password,
            session_file,
            session,
        })
    }

    /// Check whether a persisted session is still accepted.
    async fn session_alive(&self, session: &InstagramSession) -> bool {
        let response = self
            .client
            .get(format!("{}/accounts/current_user/", API_BASE))
            .header("Cookie", session.cookie_header())
            .send()
            .await;

        matches!(response, Ok(r) if r.status().is_success())
    }

    /// Fresh login. On success the session is persisted for future runs.
    async fn login(&mut self) -> Result<()> {
        let device_id = format!("android-{:016x}", chrono::Utc::now().timestamp_millis());

        let params = [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("device_id", device_id.as_str()),
            ("login_attempt_count", "0"),
        ];

        let response = self
            .client
            .post(format!("{}/accounts/login/", API_BASE))
            .form(&params)
            .send()
            .await
            .map_err(|e| PublishError::Network(format!("login: {}", e)))?;

        let status = response.status();

        let mut session_id = None;
        let mut csrf_token = None;
        for cookie in response.cookies() {
            match cookie.name() {
                "sessionid" => session_id = Some(cookie.value().to_string()),
                "csrftoken" => csrf_token = Some(cookie.value().to_string()),
                _ => {}
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| PublishError::Network(format!("login: {}", e)))?;

        if !status.is_success() {
            return Err(map_status(status, "login", &body).into());
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| PublishError::Authentication(format!("login response: {}", e)))?;

        let user_id = payload["logged_in_user"]["pk"].as_u64().ok_or_else(|| {
            PublishError::Authentication("login response missing user id".to_string())
        })?;

        let session = InstagramSession {
            user_id,
            session_id: session_id.ok_or_else(|| {
                PublishError::Authentication("login set no session cookie".to_string())
            })?,
            csrf_token: csrf_token.unwrap_or_default(),
            device_id,
        };

        self.persist_session(&session)?;
        info!("Logged in as {} and persisted session", self.username);
        self.session = Some(session);

        Ok(())
    }

    fn persist_session(&self, session: &InstagramSession) -> Result<()> {
        if let Some(parent) = self.session_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PublishError::Authentication(format!("persist session: {}", e))
            })?;
        }
        std::fs::write(&self.session_file, session.to_json())
            .map_err(|e| PublishError::Authentication(format!("persist session: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl Publisher for InstagramPublisher {
    async fn authenticate(&mut self) -> Result<()> {
        if let Some(session) = self.session.clone() {
            if self.session_alive(&session).await {
                debug!("Reusing persisted session for {}", self.username);
                return Ok(());
            }
            warn!("Persisted session rejected, performing fresh login");
        }

        self.login().await
    }

    async fn publish(&self, image: &Path, caption: &str) -> Result<String> {
        let session = self.session.as_ref().ok_or_else(|| {
            PublishError::Authentication("Not authenticated".to_string())
        })?;

        let bytes = std::fs::read(image)
            .map_err(|e| PublishError::Upload(format!("read {}: {}", image.display(), e)))?;

        let upload_id = chrono::Utc::now().timestamp_millis().to_string();

        // Step 1: raw JPEG upload under the generated upload id.
        let response = self
            .client
            .post(format!("{}/{}", UPLOAD_BASE, upload_id))
            .header("Cookie", session.cookie_header())
            .header("X-CSRFToken", &session.csrf_token)
            .header("X-Entity-Name", format!("{}.jpg", upload_id))
            .header("X-Entity-Length", bytes.len().to_string())
            .header("Offset", "0")
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PublishError::Network(format!("upload: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, "upload", &body).into());
        }

        // Step 2: attach the caption and create the post.
        let params = [
            ("upload_id", upload_id.as_str()),
            ("caption", caption),
            ("source_type", "library"),
            ("device_id", session.device_id.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/media/configure/", API_BASE))
            .header("Cookie", session.cookie_header())
            .header("X-CSRFToken", &session.csrf_token)
            .form(&params)
            .send()
            .await
            .map_err(|e| PublishError::Network(format!("configure: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(map_status(status, "configure", &body).into());
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| PublishError::Upload(format!("configure response: {}", e)))?;

        extract_media_id(&payload)
            .ok_or_else(|| {
                PublishError::Upload("configure returned no media id".to_string()).into()
            })
    }

    fn name(&self) -> &str {
        "instagram"
    }

    fn is_configured(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

fn extract_media_id(payload: &serde_json::Value) -> Option<String> {
    let media = &payload["media"];
    media["id"]
        .as_str()
        .map(|s| s.to_string())
        .or_else(|| media["pk"].as_u64().map(|pk| pk.to_string()))
}

/// Map an HTTP status to a publish error.
///
/// 401/403 mean the session or credentials are bad, 429 is the platform
/// pushing back on cadence, 5xx is the platform itself; everything else is
/// an upload failure with the body attached for diagnosis.
fn map_status(status: StatusCode, context: &str, body: &str) -> PublishError {
    let detail = format!("Instagram {} failed (HTTP {}): {}", context, status.as_u16(), body);

    match status.as_u16() {
        401 | 403 => PublishError::Authentication(detail),
        429 => PublishError::RateLimit(detail),
        500..=599 => PublishError::Network(detail),
        _ => PublishError::Upload(detail),
    }
}
