use crate::http::HttpClient;
use crate::models::{ServerConnection, ServerKind};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// The whole settings file is one JSON object; the server list lives under
// this single fixed key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    servers: Vec<ServerConnection>,
}

/// File-backed preference store for the connection list. A missing file
/// reads as the empty list.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<ServerConnection>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let settings: SettingsFile = serde_json::from_str(&content)?;
        Ok(settings.servers)
    }

    pub fn save(&self, servers: &[ServerConnection]) -> Result<(), StoreError> {
        let settings = SettingsFile {
            servers: servers.to_vec(),
        };
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Fields the user enters when registering a server.
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub kind: ServerKind,
}

/// The set of registered connections, with an observable view of the full
/// list. Mutations are read-modify-write against the store; two overlapping
/// writers can lose an update, which matches the source design.
pub struct ServerRegistry {
    store: SettingsStore,
    tx: watch::Sender<Vec<ServerConnection>>,
}

impl ServerRegistry {
    pub fn open(store: SettingsStore) -> Result<Self, StoreError> {
        let servers = store.load()?;
        let (tx, _) = watch::channel(servers);
        Ok(Self { store, tx })
    }

    /// Observable read of the full connection list. The receiver sees the
    /// latest list after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ServerConnection>> {
        self.tx.subscribe()
    }

    pub fn servers(&self) -> Vec<ServerConnection> {
        self.tx.borrow().clone()
    }

    #[instrument(skip(self, server), fields(name = %server.name, kind = %server.kind))]
    pub fn add(&self, server: NewServer) -> Result<ServerConnection, RegistryError> {
        url::Url::parse(&server.base_url)?;

        let connection = ServerConnection {
            id: Uuid::new_v4(),
            name: server.name,
            base_url: server.base_url,
            api_key: server.api_key,
            kind: server.kind,
            active: true,
            created_at: Utc::now(),
        };

        let mut servers = self.store.load()?;
        servers.push(connection.clone());
        self.store.save(&servers)?;
        self.tx.send_replace(servers);

        info!("Registered {} server: {}", connection.kind, connection.name);
        Ok(connection)
    }

    #[instrument(skip(self, connection), fields(name = %connection.name))]
    pub fn update(&self, connection: ServerConnection) -> Result<(), RegistryError> {
        let mut servers = self.store.load()?;

        match servers.iter_mut().find(|s| s.id == connection.id) {
            Some(existing) => *existing = connection,
            None => {
                warn!("Ignoring update for unknown server id {}", connection.id);
                return Ok(());
            }
        }

        self.store.save(&servers)?;
        self.tx.send_replace(servers);
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<(), RegistryError> {
        let mut servers = self.store.load()?;
        servers.retain(|s| s.id != id);
        self.store.save(&servers)?;
        self.tx.send_replace(servers);

        info!("Deleted server {}", id);
        Ok(())
    }
}

/// One GET against the connection's status endpoint: 2xx is success,
/// everything else - non-2xx status or a transport fault - is a failure
/// with a descriptive message.
#[instrument(skip(http, connection), fields(name = %connection.name, kind = %connection.kind))]
pub async fn check_connection(
    http: &HttpClient,
    connection: &ServerConnection,
) -> Result<(), String> {
    let url = connection.kind.status_url(&connection.base_url);

    match http.get(&url, &connection.api_key).await {
        Ok(_) => {
            debug!("Connection test succeeded");
            Ok(())
        }
        Err(fault) => {
            warn!("Connection test failed: {}", fault);
            Err(fault.to_string())
        }
    }
}
