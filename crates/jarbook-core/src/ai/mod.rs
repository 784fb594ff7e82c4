//! Pluggable AI backend abstraction
//!
//! Backends only move text: they take a rendered system and user prompt plus
//! a response schema and return the model's raw reply. Prompt rendering and
//! response validation live in [`crate::coach`].
//!
//! # Architecture
//!
//! - `CoachBackend` trait: the interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! The backend is chosen by `[ai] backend` in the config file or the
//! `AI_BACKEND` environment variable (gemini, openai_compatible, mock).
//! See [`crate::config`] for the full list of overrides.

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;
pub mod schema;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, RecordedRequest};
pub use openai_compatible::OpenAICompatibleBackend;
pub use schema::ResponseSchema;
pub use types::*;

use async_trait::async_trait;
use tracing::warn;

use crate::config::{AiConfig, BackendKind};
use crate::error::Result;

/// One structured generation round trip
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub schema: &'a ResponseSchema,
}

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait CoachBackend: Send + Sync {
    /// Send one request and return the raw reply text
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Backend name (for logging)
    fn name(&self) -> &'static str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    Gemini(GeminiBackend),
    /// vLLM, LocalAI, llama-server, Ollama, etc.
    OpenAICompatible(OpenAICompatibleBackend),
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns `Ok(None)` when the selected backend is missing a required
    /// setting (API key for Gemini, host for OpenAI-compatible servers).
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        match config.backend {
            BackendKind::Gemini => {
                let Some(api_key) = config.api_key() else {
                    warn!(
                        env = config.api_key_env(),
                        "Gemini API key not set, AI coaching disabled"
                    );
                    return Ok(None);
                };
                let host = config.host().unwrap_or(crate::config::GEMINI_DEFAULT_HOST);
                let backend = GeminiBackend::new(host, &api_key, config.timeout)?;
                Ok(Some(AIClient::Gemini(backend)))
            }
            BackendKind::OpenAICompatible => {
                let Some(host) = config.host() else {
                    warn!("OpenAI-compatible host not set, AI coaching disabled");
                    return Ok(None);
                };
                let backend =
                    OpenAICompatibleBackend::new(host, config.api_key(), config.timeout)?;
                Ok(Some(AIClient::OpenAICompatible(backend)))
            }
            BackendKind::Mock => Ok(Some(AIClient::Mock(MockBackend::new()))),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl CoachBackend for AIClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(request).await,
            AIClient::OpenAICompatible(b) => b.generate(request).await,
            AIClient::Mock(b) => b.generate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AIClient::Gemini(b) => b.name(),
            AIClient::OpenAICompatible(b) => b.name(),
            AIClient::Mock(b) => b.name(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.name(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(AIClient::mock().health_check().await);
    }

    #[test]
    fn test_from_config_mock() {
        let mut config = Config::default().ai;
        config.backend = BackendKind::Mock;
        let client = AIClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.name(), "mock");
    }

    #[test]
    fn test_from_config_gemini_without_key() {
        let mut config = Config::default().ai;
        config.api_key_env = Some("JARBOOK_TEST_KEY_THAT_IS_NEVER_SET".to_string());
        assert!(AIClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_openai_without_host() {
        let mut config = Config::default().ai;
        config.backend = BackendKind::OpenAICompatible;
        config.host = None;
        assert!(AIClient::from_config(&config).unwrap().is_none());

        config.host = Some("http://localhost:8080/".to_string());
        let client = AIClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.host(), "http://localhost:8080");
    }
}
