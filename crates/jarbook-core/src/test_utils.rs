//! Test utilities for jarbook-core
//!
//! A mock HTTP server speaking both the Gemini `generateContent` API and the
//! OpenAI chat completions API, for backend and end-to-end tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub model: String,
    /// From `x-goog-api-key` or a bearer `Authorization` header
    pub api_key: Option<String>,
    pub system: String,
    pub user: String,
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
    failing: bool,
    /// Fixed reply text; `None` picks a canned reply from the schema
    reply: Option<String>,
    /// Hold each generation reply for this long
    delay: Option<Duration>,
}

/// Mock Gemini / OpenAI-compatible server
pub struct MockCoachServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCoachServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::spawn(ServerState::default()).await
    }

    /// Server answering every generation request with HTTP 500
    pub async fn start_failing() -> Self {
        Self::spawn(ServerState {
            failing: true,
            ..Default::default()
        })
        .await
    }

    /// Server answering every generation request with `reply` as model text
    pub async fn start_with_reply(reply: impl Into<String>) -> Self {
        Self::spawn(ServerState {
            reply: Some(reply.into()),
            ..Default::default()
        })
        .await
    }

    /// Server that waits `delay` before answering each generation request
    pub async fn start_with_delay(delay: Duration) -> Self {
        Self::spawn(ServerState {
            delay: Some(delay),
            ..Default::default()
        })
        .await
    }

    async fn spawn(state: ServerState) -> Self {
        let app = Router::new()
            .route("/v1beta/models", get(handle_list_models))
            .route("/v1beta/models/:model_action", post(handle_generate_content))
            .route("/v1/models", get(handle_list_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Generation requests received so far
    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCoachServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_list_models() -> Json<Value> {
    Json(json!({ "models": [{ "name": "models/gemini-3-flash-preview" }], "data": [] }))
}

/// POST /v1beta/models/{model}:generateContent
async fn handle_generate_content(
    State(state): State<ServerState>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let model = model_action
        .strip_suffix(":generateContent")
        .unwrap_or(&model_action)
        .to_string();

    state.requests.lock().unwrap().push(ReceivedRequest {
        model,
        api_key: header_str(&headers, "x-goog-api-key"),
        system: body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        user: body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
    }

    let text = state
        .reply
        .clone()
        .unwrap_or_else(|| canned_reply(&body["generationConfig"]["responseSchema"]));

    Json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

/// POST /v1/chat/completions
async fn handle_chat_completions(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = header_str(&headers, "authorization")
        .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string));

    state.requests.lock().unwrap().push(ReceivedRequest {
        model: body["model"].as_str().unwrap_or_default().to_string(),
        api_key,
        system: body["messages"][0]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        user: body["messages"][1]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
    }

    let text = state
        .reply
        .clone()
        .unwrap_or_else(|| canned_reply(&body["response_format"]["json_schema"]["schema"]));

    Json(json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Pick a schema-valid reply based on the requested properties
fn canned_reply(schema: &Value) -> String {
    let has = |field: &str| schema["properties"].get(field).is_some();

    let reply = if has("scriptOutline") {
        json!({
            "strategyTag": "Story",
            "contentType": "Storytelling",
            "hook": "I had zero savings at 30.",
            "scriptOutline": ["The moment", "The change", "The result"]
        })
    } else if has("feasibilityStatus") {
        json!({
            "factIdentification": "Half the target is saved.",
            "timeImpact": "On track within 3 years.",
            "priceToPay": "Less travel this year.",
            "specificAdjustment": "Raise the monthly transfer by 5%.",
            "accountabilityQuestion": "What will you do with the next bonus?",
            "monthlyTarget": "5,000,000",
            "feasibilityStatus": "safe"
        })
    } else {
        json!({
            "currentLevel": 3,
            "factIdentification": "Six months of reserve are in place.",
            "timeImpact": "Assets start compounding within 5 years.",
            "priceToPay": "Discipline on lifestyle upgrades.",
            "specificAdjustment": "Open a second income stream.",
            "accountabilityQuestion": "Which skill could earn you money on weekends?",
            "financialLongevity": "6 months"
        })
    };
    reply.to_string()
}
