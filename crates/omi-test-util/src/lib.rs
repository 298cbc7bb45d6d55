//! In-process mock of the Omi REST API.
//!
//! [`mock_api`] starts an axum server on an ephemeral port that records every
//! request and answers with scripted replies, in order. The last reply
//! repeats once the script runs out.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Uri};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

pub use axum::http::{Method, StatusCode};

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    /// The request body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

/// A scripted response.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
    delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: vec![],
            body: Some(body),
            delay: None,
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![],
            body: None,
            delay: None,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Requests received so far, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// Start a mock API answering with `replies` in order.
///
/// Returns the base URL (ending in `/v1`) and the request log.
pub async fn mock_api(replies: Vec<Reply>) -> (String, RequestLog) {
    assert!(!replies.is_empty(), "mock_api needs at least one reply");

    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let replies = Arc::new(replies);

    let handler_log = log.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
            let log = handler_log.clone();
            let replies = replies.clone();
            async move {
                let index = {
                    let mut log = log.lock().unwrap();
                    log.push(Recorded {
                        method,
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        headers,
                        body,
                    });
                    log.len() - 1
                };
                let reply = replies[index.min(replies.len() - 1)].clone();
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }

                let body = match &reply.body {
                    Some(value) => Body::from(value.to_string()),
                    None => Body::empty(),
                };
                let mut response = Response::new(body);
                *response.status_mut() = reply.status;
                for (name, value) in &reply.headers {
                    response
                        .headers_mut()
                        .insert(*name, HeaderValue::from_str(value).unwrap());
                }
                response
            }
        },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), log)
}
