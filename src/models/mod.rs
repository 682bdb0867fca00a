use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which of the two supported servers a connection targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Sonarr,
    Radarr,
}

impl ServerKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ServerKind::Sonarr => "Sonarr",
            ServerKind::Radarr => "Radarr",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServerKind::Sonarr => 8989,
            ServerKind::Radarr => 7878,
        }
    }

    /// Status-check URL for a connection of this kind. Both servers expose
    /// the same v3 status endpoint; the kind only differs in defaults.
    pub fn status_url(&self, base_url: &str) -> String {
        format!("{}/api/v3/system/status", base_url.trim_end_matches('/'))
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A user-entered server connection record, persisted in the settings store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConnection {
    pub id: Uuid,
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub kind: ServerKind,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub instance_name: Option<String>,
    pub version: String,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub startup_path: Option<String>,
    #[serde(default)]
    pub url_base: Option<String>,
    #[serde(flatten)]
    pub extra_fields: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "type")]
    pub check_type: String,
    pub message: String,
    #[serde(default)]
    pub wiki_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpace {
    pub path: String,
    #[serde(default)]
    pub label: Option<String>,
    pub free_space: i64,
    pub total_space: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub cover_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
}

/// One message attached to a queue record by the download client or indexer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Paged envelope returned by the queue and wanted/missing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_direction: Option<String>,
    pub total_records: u64,
    pub records: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response to a queued command. The body is open-ended; whatever the server
/// echoes back beyond the known fields lands in `extra_fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub command_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra_fields: serde_json::Value,
}
