//! Mock backend for testing
//!
//! Answers every request with a canned, schema-valid JSON document chosen by
//! schema name. Responses can be replaced per schema, the backend can be put
//! into a failing mode, and every request is recorded for inspection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{CoachBackend, GenerationRequest};

const COACHING_RESPONSE: &str = r#"{
  "currentLevel": 2,
  "factIdentification": "Income and spending are almost equal and there is no reserve.",
  "timeImpact": "In 1 year nothing changes; in 5 years one emergency wipes out your progress; in 10 years you are still starting over.",
  "priceToPay": "Every unexpected bill costs sleep and options.",
  "specificAdjustment": "Move 10% of income into the reserve jar on payday, before any spending.",
  "accountabilityQuestion": "Which expense will you cut this week to fund the reserve?",
  "financialLongevity": "About 1 month without income"
}"#;

const GOAL_STRATEGY_RESPONSE: &str = r#"{
  "factIdentification": "A quarter of the target is already saved.",
  "timeImpact": "At the current pace the deadline will slip by two years.",
  "priceToPay": "Fewer leisure purchases until the target is met.",
  "specificAdjustment": "Automate a fixed monthly transfer to the goal.",
  "accountabilityQuestion": "Is this goal worth skipping one dinner out per week?",
  "monthlyTarget": "Save a fixed amount every month",
  "feasibilityStatus": "challenging"
}"#;

const CONTENT_IDEA_RESPONSE: &str = r#"{
  "strategyTag": "Expertise",
  "contentType": "Wish I knew sooner",
  "hook": "The money habit I wish I had started at 22.",
  "scriptOutline": ["Hook with the mistake", "Show the numbers", "Give one rule", "Ask viewers for theirs"]
}"#;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub schema: String,
}

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    failing: bool,
    responses: HashMap<&'static str, String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Mock that fails every request like an unreachable server
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
            ..Default::default()
        }
    }

    /// Replace the canned response for a schema (`coaching_result`,
    /// `goal_strategy`, `content_idea`)
    pub fn with_response(mut self, schema: &'static str, response: impl Into<String>) -> Self {
        self.responses.insert(schema, response.into());
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn canned(schema: &str) -> Option<&'static str> {
        match schema {
            "coaching_result" => Some(COACHING_RESPONSE),
            "goal_strategy" => Some(GOAL_STRATEGY_RESPONSE),
            "content_idea" => Some(CONTENT_IDEA_RESPONSE),
            _ => None,
        }
    }
}

#[async_trait]
impl CoachBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                model: request.model.to_string(),
                system: request.system.to_string(),
                user: request.user.to_string(),
                schema: request.schema.name.to_string(),
            });
        }

        if self.failing {
            return Err(Error::InvalidData("Mock backend is failing".into()));
        }

        if let Some(response) = self.responses.get(request.schema.name) {
            return Ok(response.clone());
        }
        Self::canned(request.schema.name)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidData(format!("No mock response for {}", request.schema.name))
            })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
