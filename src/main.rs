use anyhow::Result;
use clap::Parser;
use remotarr::http::HttpClient;
use remotarr::models::{Paged, ServerKind, SystemStatus};
use remotarr::radarr::RadarrClient;
use remotarr::registry::{check_connection, ServerRegistry, SettingsStore};
use remotarr::repository::{RadarrRepository, SonarrRepository};
use remotarr::sonarr::SonarrClient;
use remotarr::state::{DataState, MovieScreens, SeriesScreens};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "settings.json")]
    settings: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .init();

    info!("Starting remotarr v0.1.0");

    let registry = ServerRegistry::open(SettingsStore::new(&cli.settings))?;
    let servers = registry.servers();
    info!("Loaded {} server(s) from {}", servers.len(), cli.settings);

    if servers.is_empty() {
        warn!("No servers registered; add one to {} first", cli.settings);
        return Ok(());
    }

    let http = HttpClient::new();

    for connection in servers.into_iter().filter(|s| s.active) {
        if let Err(message) = check_connection(&http, &connection).await {
            error!("{} is unreachable: {}", connection.name, message);
            continue;
        }

        match connection.kind {
            ServerKind::Sonarr => {
                let client = SonarrClient::new(http.clone(), connection.clone());
                let screens = SeriesScreens::new(Arc::new(SonarrRepository::new(client)));
                screens.refresh_all().await;

                report_status(&connection.name, &screens.status.current());
                report_list(&connection.name, "library", &screens.library.current());
                report_page(&connection.name, "queue", &screens.queue.current());
                report_list(&connection.name, "calendar", &screens.calendar.current());
            }
            ServerKind::Radarr => {
                let client = RadarrClient::new(http.clone(), connection.clone());
                let screens = MovieScreens::new(Arc::new(RadarrRepository::new(client)));
                screens.refresh_all().await;

                report_status(&connection.name, &screens.status.current());
                report_list(&connection.name, "library", &screens.library.current());
                report_page(&connection.name, "queue", &screens.queue.current());
                report_list(&connection.name, "calendar", &screens.calendar.current());
            }
        }
    }

    Ok(())
}

fn report_status(server: &str, state: &DataState<SystemStatus>) {
    match state {
        DataState::Success(status) => info!("{}: version {}", server, status.version),
        DataState::Error(message) => error!("{}: status failed: {}", server, message),
        DataState::Loading => {}
    }
}

fn report_list<T>(server: &str, screen: &str, state: &DataState<Vec<T>>) {
    match state {
        DataState::Success(items) => info!("{}: {} has {} item(s)", server, screen, items.len()),
        DataState::Error(message) => error!("{}: {} failed: {}", server, screen, message),
        DataState::Loading => {}
    }
}

fn report_page<T>(server: &str, screen: &str, state: &DataState<Paged<T>>) {
    match state {
        DataState::Success(page) => {
            info!("{}: {} has {} record(s)", server, screen, page.total_records);
        }
        DataState::Error(message) => error!("{}: {} failed: {}", server, screen, message),
        DataState::Loading => {}
    }
}
