//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - Ollama's OpenAI endpoint (http://localhost:11434)
//!
//! The response schema is sent as `response_format: json_schema`. Servers that
//! ignore it still get the schema described in the system prompt, and replies
//! are validated the same way either way.
//!
//! # Configuration
//!
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name for every task
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};

use super::{CoachBackend, GenerationRequest};

#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: Value,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_request(request: &GenerationRequest<'_>) -> ChatCompletionRequest {
    let schema = request.schema.to_json_schema();
    let system = format!(
        "{}\n\nReply with a single JSON object matching this schema:\n{}",
        request.system, schema
    );

    ChatCompletionRequest {
        model: request.model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system.trim_start().to_string(),
            },
            ChatMessage {
                role: "user",
                content: request.user.to_string(),
            },
        ],
        temperature: Some(0.7),
        response_format: json!({
            "type": "json_schema",
            "json_schema": {
                "name": request.schema.name,
                "schema": schema,
            }
        }),
        stream: false,
    }
}

#[async_trait]
impl CoachBackend for OpenAICompatibleBackend {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        let body = build_request(request);

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))?;

        debug!(model = request.model, "OpenAI-compatible response: {}", content);
        Ok(content)
    }

    async fn health_check(&self) -> bool {
        let mut req = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }
        match req.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "openai_compatible"
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::schema::ResponseSchema;
    use crate::test_utils::MockCoachServer;

    fn request<'a>(schema: &'a ResponseSchema) -> GenerationRequest<'a> {
        GenerationRequest {
            model: "llama3.2",
            system: "You are a coach.",
            user: "GOAL STRATEGY: House",
            schema,
        }
    }

    #[test]
    fn test_request_carries_json_schema() {
        let schema = ResponseSchema::goal_strategy();
        let body = serde_json::to_value(build_request(&request(&schema))).unwrap();

        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .starts_with("You are a coach."));
        assert_eq!(body["messages"][1]["content"], "GOAL STRATEGY: House");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["name"],
            "goal_strategy"
        );
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["type"],
            "object"
        );
    }

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let server = MockCoachServer::start().await;
        let backend = OpenAICompatibleBackend::new(
            &server.url(),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let schema = ResponseSchema::goal_strategy();

        let text = backend.generate(&request(&schema)).await.unwrap();
        assert!(text.contains("feasibilityStatus"));
        assert!(backend.health_check().await);

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "llama3.2");
        assert_eq!(seen[0].api_key.as_deref(), Some("secret"));
        assert_eq!(seen[0].user, "GOAL STRATEGY: House");
    }
}
