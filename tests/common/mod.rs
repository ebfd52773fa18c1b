//! Mock image search endpoint shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};

/// A request received by the mock endpoint
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// A scripted reply
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: "{}".to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock search API answering from a script; once the script is used up every
/// request gets a 500
#[derive(Debug, Default)]
pub struct MockApi {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub const PASTA_RESPONSE: &str = r#"{"images":[{"title":"Pasta","imageUrl":"u1","source":"s1","link":"l1"}]}"#;

async fn images(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    api.requests.lock().unwrap().push(RecordedRequest {
        api_key: header("x-api-key"),
        content_type: header(CONTENT_TYPE.as_str()),
        body,
    });

    let reply = api.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => {
            if let Some(delay) = reply.delay {
                tokio::time::sleep(delay).await;
            }
            (reply.status, reply.body)
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string()),
    }
}

/// Starts the mock on a random local port and returns it with its endpoint URL
pub async fn start_mock(replies: Vec<Reply>) -> (Arc<MockApi>, String) {
    let api = Arc::new(MockApi {
        replies: Mutex::new(replies.into()),
        requests: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/images", post(images))
        .with_state(Arc::clone(&api));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (api, format!("http://{}/images", addr))
}
