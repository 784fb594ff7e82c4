//! Gemini backend implementation
//!
//! Calls the `generateContent` REST endpoint with a system instruction and a
//! native `responseSchema`, so replies come back as a single JSON document.
//!
//! # Configuration
//!
//! - `GEMINI_API_KEY`: API key (required, variable name configurable)
//! - `GEMINI_HOST`: API root (default: https://generativelanguage.googleapis.com)
//! - `GEMINI_MODEL`: model for every task (default: per-task models from config)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

use super::{CoachBackend, GenerationRequest};

#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[async_trait]
impl CoachBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let body = GenerateContentRequest {
            system_instruction: (!request.system.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part {
                    text: request.system.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.user.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.schema.to_gemini(),
            },
        };

        let response = self
            .http_client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidData("No candidates in Gemini response".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::InvalidData(format!(
                "Empty Gemini response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        debug!(model = request.model, "Gemini response: {}", text);
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models", self.base_url);
        match self
            .http_client
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
