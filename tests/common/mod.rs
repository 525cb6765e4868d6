//! Shared helpers for the integration tests.

use axum::{Json, Router, body::Body, extract::State, http::Request, routing::post};
use prompt_gateway::{GatewayConfig, build_router, state::AppState};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Everything the mock upstream received, in arrival order.
#[derive(Clone, Default)]
pub struct Recorded {
    pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

#[allow(dead_code)]
impl Recorded {
    pub fn count(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<serde_json::Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

/// Start a mock upstream that records each JSON body and answers with `reply`.
/// Serves `/chat/completions` and `/hook`.
#[allow(dead_code)]
pub async fn start_mock_upstream(reply: serde_json::Value) -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let reply = Arc::new(reply);

    async fn record(
        State((recorded, reply)): State<(Recorded, Arc<serde_json::Value>)>,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        recorded.bodies.lock().unwrap().push(body);
        Json((*reply).clone())
    }

    let app = Router::new()
        .route("/chat/completions", post(record))
        .route("/hook", post(record))
        .with_state((recorded.clone(), reply));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, recorded)
}

#[allow(dead_code)]
pub fn chat_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    })
}

pub fn app(config: GatewayConfig) -> Router {
    build_router(Arc::new(AppState::new(config)))
}

#[allow(dead_code)]
pub fn json_post(uri: &str, key: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
