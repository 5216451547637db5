//! MockProvider - scripted OpenAI-compatible chat-completion endpoint

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use listingd::Config;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// What the provider answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a chat completion whose message content is the given text
    Completion(String),
    /// Given status with a plain body
    Status(u16, String),
    /// 200 with the given body verbatim
    Raw(String),
    /// Wait, then answer like `Completion`
    Slow(Duration, String),
}

impl MockReply {
    pub fn completion(content: &str) -> Self {
        MockReply::Completion(content.to_string())
    }
}

/// A request the provider received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct ProviderState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock chat-completion provider on a random port
pub struct MockProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockProvider {
    pub async fn start(reply: MockReply) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            reply,
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            requests,
            handle,
        })
    }

    /// Server config pointing at this provider, with a test credential
    pub fn config(&self) -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: format!("http://{}/v1", self.addr),
            ..Config::default()
        }
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn chat_completions(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .requests
        .lock()
        .await
        .push(RecordedRequest { headers, body });

    match state.reply {
        MockReply::Completion(content) => completion(&content),
        MockReply::Status(status, body) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        MockReply::Raw(body) => (StatusCode::OK, body).into_response(),
        MockReply::Slow(delay, content) => {
            tokio::time::sleep(delay).await;
            completion(&content)
        }
    }
}

fn completion(content: &str) -> Response {
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
