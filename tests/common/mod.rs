//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apod_fetcher::apod::ApodClient;
use apod_fetcher::config::{AppConfig, UpstreamConfig};
use apod_fetcher::http::HttpServer;
use apod_fetcher::lifecycle::Shutdown;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

type Reply = Pin<Box<dyn Future<Output = (u16, String)> + Send>>;
type Responder = Arc<dyn Fn(HashMap<String, String>) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// Handle to a running mock upstream.
#[allow(dead_code)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: MockState,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Query parameters of every request received so far.
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.state.queries.lock().unwrap().len()
    }

    /// Highest number of requests the mock was serving at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

async fn apod(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.queries.lock().unwrap().push(params.clone());
    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let (status, body) = (state.responder)(params).await;

    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a programmable mock of `/planetary/apod` on an ephemeral port.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(HashMap<String, String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let state = MockState {
        responder: Arc::new(move |params: HashMap<String, String>| -> Reply { Box::pin(f(params)) }),
        queries: Arc::new(Mutex::new(Vec::new())),
        in_flight: Arc::new(AtomicUsize::new(0)),
        max_in_flight: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/planetary/apod", get(apod))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

/// Start a mock upstream that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// Start a mock upstream that waits `delay` before answering 200 with `body`.
#[allow(dead_code)]
pub async fn start_slow_upstream(delay: Duration, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| async move {
        tokio::time::sleep(delay).await;
        (200, body.to_string())
    })
    .await
}

/// Address on which nothing is listening.
#[allow(dead_code)]
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Plain client that ignores proxy settings from the environment.
#[allow(dead_code)]
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn upstream_config(endpoint: String, concurrent_requests: usize) -> UpstreamConfig {
    UpstreamConfig {
        endpoint,
        api_key: "key".into(),
        concurrent_requests,
        timeout_secs: 5,
    }
}

/// Start the full service against `upstream_endpoint`. Returns its base URL.
#[allow(dead_code)]
pub async fn start_service(
    upstream_endpoint: String,
    concurrent_requests: usize,
    shutdown: &Shutdown,
) -> String {
    let mut config = AppConfig::default();
    config.upstream = upstream_config(upstream_endpoint, concurrent_requests);

    let client = ApodClient::with_http_client(&config.upstream, http_client(config.upstream.timeout()));
    let server = HttpServer::with_source(config, Arc::new(client));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    format!("http://{}", addr)
}
