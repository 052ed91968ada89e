#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::stream;
use palaver_bedrock::anthropic::ModelRequest;
use palaver_bedrock::client::{ModelInvoker, TextStream};
use palaver_bedrock::error::BedrockError;
use palaver_lambda::config::{Config, StoreBackend};
use palaver_lambda::state::AppState;
use palaver_storage::memory::MemoryConversationStore;
use serde_json::Value;
use tower::ServiceExt;

/// A model that replays a fixed script and records what it was asked.
#[derive(Default)]
pub struct ScriptedModel {
    fragments: Vec<Result<String, String>>,
    open_error: Option<String>,
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn replying(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn failing_after(fragments: &[&str], error: &str) -> Self {
        let mut model = Self::replying(fragments);
        model.fragments.push(Err(error.to_string()));
        model
    }

    pub fn unreachable(error: &str) -> Self {
        Self {
            open_error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn last_request(&self) -> ModelRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("model was never called")
    }

    fn record(&self, request: &ModelRequest) -> Result<(), BedrockError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.open_error {
            Some(e) => Err(BedrockError::Invocation(e.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModelInvoker for ScriptedModel {
    async fn invoke(&self, request: &ModelRequest) -> Result<String, BedrockError> {
        self.record(request)?;
        let mut reply = String::new();
        for fragment in &self.fragments {
            match fragment {
                Ok(text) => reply.push_str(text),
                Err(e) => return Err(BedrockError::Stream(e.clone())),
            }
        }
        Ok(reply)
    }

    async fn invoke_stream(&self, request: &ModelRequest) -> Result<TextStream, BedrockError> {
        self.record(request)?;
        let items: Vec<Result<String, BedrockError>> = self
            .fragments
            .iter()
            .map(|f| f.clone().map_err(BedrockError::Stream))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryConversationStore>,
    pub model: Arc<ScriptedModel>,
}

impl TestApp {
    pub fn new(model: ScriptedModel) -> Self {
        let store = Arc::new(MemoryConversationStore::new());
        let model = Arc::new(model);
        let config = Config {
            store: StoreBackend::Memory,
            ..Config::default()
        };

        let router = palaver_lambda::app(AppState {
            store: store.clone(),
            model: model.clone(),
            config: Arc::new(config),
        });

        Self {
            router,
            store,
            model,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body)
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.send(request).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

/// An unsigned token whose payload carries `sub`.
pub fn bearer(sub: &str) -> String {
    let payload = serde_json::json!({ "sub": sub, "token_use": "id" }).to_string();
    format!(
        "Bearer {}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"k"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

pub fn post_json(uri: &str, user: Option<&str>, body: &Value) -> Request<Body> {
    post_raw(uri, user, body.to_string())
}

pub fn post_raw(uri: &str, user: Option<&str>, body: impl Into<String>) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("authorization", bearer(user));
    }
    builder.body(Body::from(body.into())).unwrap()
}

pub fn get_as(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", bearer(user));
    }
    builder.body(Body::empty()).unwrap()
}
