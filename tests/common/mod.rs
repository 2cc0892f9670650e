//! Shared helpers: a fake Prometheus `/api/v1/query` endpoint.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use modelwatch::types::{BackendConfig, ServiceUrls};
use modelwatch::{Config, Dispatcher};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = dyn Fn(&str) -> (StatusCode, Value) + Send + Sync;

#[derive(Clone)]
struct FakeState {
    responder: Arc<Responder>,
    seen: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
    delay: Duration,
}

async fn instant_query(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let query = params.get("query").cloned().unwrap_or_default();
    state.seen.lock().unwrap().push(query.clone());
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let (status, body) = (state.responder)(&query);
    (status, Json(body))
}

/// Handle on a running fake Prometheus.
pub struct FakePrometheus {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
}

impl FakePrometheus {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of query requests received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Query expressions received, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

/// Prometheus success body with the given result vector.
pub fn vector(result: Value) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({"status": "success", "data": {"resultType": "vector", "result": result}}),
    )
}

pub async fn start_fake_prometheus<F>(responder: F) -> FakePrometheus
where
    F: Fn(&str) -> (StatusCode, Value) + Send + Sync + 'static,
{
    start_fake_prometheus_with_delay(responder, Duration::ZERO).await
}

pub async fn start_fake_prometheus_with_delay<F>(responder: F, delay: Duration) -> FakePrometheus
where
    F: Fn(&str) -> (StatusCode, Value) + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));
    let state = FakeState {
        responder: Arc::new(responder),
        seen: seen.clone(),
        hits: hits.clone(),
        delay,
    };

    let app = Router::new()
        .route("/api/v1/query", get(instant_query))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakePrometheus { addr, seen, hits }
}

/// An address nothing is listening on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config_for(prometheus_url: &str, timeout: Duration) -> Config {
    Config {
        services: ServiceUrls {
            prometheus_url: prometheus_url.to_string(),
            ..ServiceUrls::default()
        },
        backend: BackendConfig {
            query_timeout: timeout,
        },
        ..Config::default()
    }
}

pub fn dispatcher_for(prometheus_url: &str) -> Dispatcher {
    Dispatcher::from_config(&config_for(prometheus_url, Duration::from_secs(5))).unwrap()
}
