//! Wire types exchanged with the renamer backend.
//!
//! Everything here mirrors the JSON the backend produces. Records are
//! read-only on the client: they are decoded, displayed and dropped.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Severity attached to a backend log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Label as the backend spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One log line delivered over the stream connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Seconds since the Unix epoch, fractional
    pub timestamp: f64,
    pub level: LogLevel,
    pub message: String,
}

impl LogEvent {
    /// Decode a single stream frame
    pub fn from_frame(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Local wall-clock time of the event as `HH:MM:SS`
    pub fn local_time(&self) -> String {
        let secs = self.timestamp.floor() as i64;
        let nanos = ((self.timestamp - self.timestamp.floor()) * 1e9) as u32;
        match Local.timestamp_opt(secs, nanos).single() {
            Some(dt) => dt.format("%H:%M:%S").to_string(),
            None => "--:--:--".to_string(),
        }
    }
}

/// `GET /api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub running: bool,
}

impl RunStatus {
    /// Badge text shown on the dashboard
    pub fn badge(running: bool) -> &'static str {
        if running { "SCANNING RUNNING" } else { "IDLE" }
    }
}

/// Server-side configuration (`GET/POST /api/config`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub library_path: String,
}

/// `GET /api/scheduler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub active: bool,
}

/// `POST /api/update_db`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDbResponse {
    pub status: String,
}

/// Acknowledgement body of start/stop/scheduler calls.
///
/// The backend answers with loosely shaped objects (`{"status": "..."}`);
/// only the status text is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub status: Option<String>,
}

impl Acknowledgement {
    /// Extract the acknowledgement from an arbitrary JSON body
    pub fn from_value(value: &serde_json::Value) -> Self {
        let status = value
            .get("status")
            .and_then(|s| s.as_str())
            .map(str::to_string);
        Self { status }
    }
}

/// One catalog record from `GET /api/inventory`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub ean: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub has_cover: bool,
    #[serde(default, alias = "relative_cover_path")]
    pub cover_path: Option<String>,
}

impl InventoryItem {
    /// Presence label used in tables
    pub fn presence(&self) -> &'static str {
        if self.exists { "In Library" } else { "Missing" }
    }

    /// Cover path, when the backend says there is one
    pub fn cover(&self) -> Option<&str> {
        self.cover_path.as_deref().filter(|_| self.has_cover)
    }
}

/// One row of the `GET /api/export_inventory` download, a JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "EAN")]
    pub ean: String,
    #[serde(rename = "Author", default)]
    pub author: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Release Date", default)]
    pub release_date: Option<String>,
    #[serde(rename = "Status")]
    pub status: String,
}
