//! Gemini caption generator
//!
//! Calls the generative-language `generateContent` endpoint with a fixed
//! prompt template embedding the quote.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::caption::CaptionGenerator;
use crate::error::{CaptionError, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiCaptioner {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiCaptioner {
    pub fn new(model: &str, api_key: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(CaptionError::Request)?;

        Ok(Self {
            client,
            url: format!("{}/{}:generateContent", API_BASE, model),
            api_key,
        })
    }
}

#[async_trait]
impl CaptionGenerator for GeminiCaptioner {
    async fn generate(&self, quote: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: caption_prompt(quote),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(CaptionError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let payload: GenerateContentResponse =
            response.json().await.map_err(CaptionError::Request)?;

        Ok(extract_text(payload)?)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// The fixed prompt template. One short sentence, two emoji related to the
/// quote, exactly three hashtags. Compliance is the model's problem.
fn caption_prompt(quote: &str) -> String {
    format!(
        "Create a very simple Instagram caption (one short sentence),\n\
         include two emojis related to the quote:\n\
         \"{}\"\n\
         Add ONLY 3 simple hashtags.",
        quote
    )
}

/// Pull the first candidate's text out of a generateContent response.
fn extract_text(
    response: GenerateContentResponse,
) -> std::result::Result<String, CaptionError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return Err(CaptionError::EmptyResponse);
    }

    Ok(trimmed)
}
