//! In-process fake of the renamer backend: REST endpoints plus the log
//! WebSocket, served by axum on an ephemeral port.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Value, json};

/// What one WebSocket connection does
#[derive(Debug, Clone)]
pub struct Script {
    /// Text frames sent in order right after the upgrade
    pub frames: Vec<String>,
    /// Close the connection once the frames are sent
    pub close: bool,
}

impl Script {
    pub fn send_then_close(frames: Vec<String>) -> Self {
        Self { frames, close: true }
    }

    pub fn send_then_hold(frames: Vec<String>) -> Self {
        Self { frames, close: false }
    }
}

/// Mutable backend state shared with the tests
#[derive(Debug, Default)]
pub struct Backend {
    pub running: bool,
    pub scheduler: bool,
    pub fail_scheduler_writes: bool,
    pub library_path: String,
    pub inventory: Vec<Value>,
    /// Rows served by the export download
    pub export: Vec<Value>,
    /// Files served under `/files/`, keyed by the path after it
    pub covers: HashMap<String, Vec<u8>>,
    /// Scripts for successive connections; once exhausted, connections hold open silently
    pub scripts: VecDeque<Script>,
    pub connections: usize,
    pub scheduler_writes: Vec<String>,
    pub start_calls: usize,
    /// Arrival time of every `GET /api/status`, on the tokio clock
    pub status_calls: Vec<tokio::time::Instant>,
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub async fn start(backend: Backend) -> Self {
        let state: Shared = Arc::new(Mutex::new(backend));
        let router = Router::new()
            .route("/api/status", get(status))
            .route("/api/start", post(start))
            .route("/api/stop", post(stop))
            .route("/api/update_db", post(update_db))
            .route("/api/scheduler", get(scheduler).post(set_scheduler))
            .route("/api/config", get(config).post(save_config))
            .route("/api/inventory", get(inventory))
            .route("/api/export_inventory", get(export))
            .route("/files/{*path}", get(file))
            .route("/ws/logs", get(logs))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Backend) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

/// A log frame as the backend encodes it
pub fn frame(level: &str, message: &str, timestamp: f64) -> String {
    json!({ "timestamp": timestamp, "level": level, "message": message }).to_string()
}

async fn status(State(state): State<Shared>) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    backend.status_calls.push(tokio::time::Instant::now());
    Json(json!({ "running": backend.running }))
}

async fn start(State(state): State<Shared>) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    backend.start_calls += 1;
    backend.running = true;
    Json(json!({ "status": "started" }))
}

async fn stop(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().running = false;
    Json(json!({ "status": "stopping" }))
}

async fn update_db() -> Json<Value> {
    Json(json!({ "status": "Database update started" }))
}

async fn scheduler(State(state): State<Shared>) -> Json<Value> {
    Json(json!({ "active": state.lock().unwrap().scheduler }))
}

async fn set_scheduler(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let enable = params.get("enable").cloned().unwrap_or_default();
    backend.scheduler_writes.push(enable.clone());
    if backend.fail_scheduler_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, "scheduler unavailable").into_response();
    }
    backend.scheduler = enable == "true";
    Json(json!({ "status": "ok", "active": backend.scheduler })).into_response()
}

async fn config(State(state): State<Shared>) -> Json<Value> {
    Json(json!({ "library_path": state.lock().unwrap().library_path }))
}

async fn save_config(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let path = body["library_path"].as_str().unwrap_or_default().to_string();
    state.lock().unwrap().library_path = path;
    Json(json!({ "status": "saved" }))
}

async fn inventory(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().inventory.clone()))
}

async fn export(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().export.clone()))
}

async fn file(State(state): State<Shared>, Path(path): Path<String>) -> Response {
    match state.lock().unwrap().covers.get(&path) {
        Some(bytes) => bytes.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn logs(ws: WebSocketUpgrade, State(state): State<Shared>) -> Response {
    ws.on_upgrade(move |socket| run_script(socket, state))
}

async fn run_script(mut socket: WebSocket, state: Shared) {
    let script = {
        let mut backend = state.lock().unwrap();
        backend.connections += 1;
        backend
            .scripts
            .pop_front()
            .unwrap_or_else(|| Script::send_then_hold(Vec::new()))
    };

    for text in script.frames {
        if socket.send(Message::Text(text.into())).await.is_err() {
            return;
        }
    }

    if script.close {
        // Let the frames flush before closing
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
}
