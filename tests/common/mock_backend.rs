//! Mock RBAC API server for end-to-end tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query parameters in request order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query.as_deref().unwrap_or("");
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 204,
            body: Vec::new(),
            delay_ms: 0,
        }
    }
}

impl MockResponse {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string().into_bytes(),
            delay_ms: 0,
        }
    }

    /// A list page: `{"data": [...], "meta": {"count": ..}}`
    pub fn page(items: serde_json::Value, count: u64, limit: u32, offset: u32) -> Self {
        Self::json(serde_json::json!({
            "data": items,
            "meta": { "count": count, "limit": limit, "offset": offset },
        }))
    }

    pub fn no_content() -> Self {
        Self::default()
    }

    /// A rejection in the backend's `{"errors": [...]}` shape
    pub fn error(status: u16, source: &str, detail: &str) -> Self {
        let body = serde_json::json!({
            "errors": [{ "status": status.to_string(), "source": source, "detail": detail }],
        });
        Self {
            status,
            body: body.to_string().into_bytes(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

/// A response served to the first request whose path and query contain `needle`
#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    response: MockResponse,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    rules: Arc<Mutex<Vec<Rule>>>,
}

/// Mock RBAC API server.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockBackend {
    /// Start a new mock backend server.
    pub async fn start() -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Enqueue a response for the next request no rule matches.
    pub async fn enqueue_response(&self, resp: MockResponse) {
        self.state.responses.lock().await.push_back(resp);
    }

    /// Answer the first request whose path and query contain `needle` with `resp`.
    pub async fn respond_to(&self, needle: &str, resp: MockResponse) {
        self.state.rules.lock().await.push(Rule {
            needle: needle.to_string(),
            response: resp,
        });
    }

    /// Get all captured requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Root of the mocked RBAC API
    pub fn base_url(&self) -> String {
        format!("http://{}/api/rbac/v1", self.addr)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn handle_request(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let body_bytes = axum::body::to_bytes(req.into_body(), 1024 * 1024)
        .await
        .unwrap_or_default()
        .to_vec();

    let target = match &query {
        Some(q) => format!("{path}?{q}"),
        None => path.clone(),
    };

    state.requests.lock().await.push(CapturedRequest {
        method,
        path,
        query,
        headers,
        body: body_bytes,
    });

    let ruled = {
        let mut rules = state.rules.lock().await;
        rules
            .iter()
            .position(|rule| target.contains(&rule.needle))
            .map(|idx| rules.remove(idx).response)
    };
    let resp = match ruled {
        Some(resp) => resp,
        None => state
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockResponse::error(404, "mock", "no response queued")),
    };

    if resp.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(resp.delay_ms)).await;
    }

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    if !resp.body.is_empty() {
        builder = builder.header("content-type", "application/json");
    }
    builder.body(Body::from(resp.body)).unwrap()
}
