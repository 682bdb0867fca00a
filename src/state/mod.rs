use crate::models::{Paged, SystemStatus};
use crate::radarr;
use crate::radarr::Movie;
use crate::repository::{RadarrRepository, RepoResult, SonarrRepository};
use crate::sonarr;
use crate::sonarr::{Episode, Series};
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// What a screen area currently shows: the initial spinner, the latest
/// fetched payload, or the latest failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> DataState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            DataState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DataState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Observable state cell with a single transition rule: a (re)load resets to
/// `Loading` - discarding any previous payload - then settles on `Success`
/// or `Error` when the single-shot fetch resolves.
pub struct StateCell<T> {
    tx: watch::Sender<DataState<T>>,
}

impl<T: Clone> StateCell<T> {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DataState::Loading);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<DataState<T>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> DataState<T> {
        self.tx.borrow().clone()
    }

    pub async fn load<F>(&self, fetch: F)
    where
        F: Future<Output = RepoResult<T>>,
    {
        self.tx.send_replace(DataState::Loading);

        let state = match fetch.await {
            Ok(payload) => DataState::Success(payload),
            Err(error) => DataState::Error(error.to_string()),
        };
        self.tx.send_replace(state);
    }
}

impl<T: Clone> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Default agenda window for calendar screens: yesterday through a week out.
pub fn default_calendar_window() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::days(1), now + Duration::days(7))
}

/// View state for the four series screen areas. Each cell is independent;
/// `refresh_all` re-triggers every load in parallel with no ordering
/// guarantee between them.
pub struct SeriesScreens {
    repo: Arc<SonarrRepository>,
    pub library: StateCell<Vec<Series>>,
    pub queue: StateCell<Paged<sonarr::QueueRecord>>,
    pub status: StateCell<SystemStatus>,
    pub calendar: StateCell<Vec<Episode>>,
}

impl SeriesScreens {
    pub fn new(repo: Arc<SonarrRepository>) -> Self {
        Self {
            repo,
            library: StateCell::new(),
            queue: StateCell::new(),
            status: StateCell::new(),
            calendar: StateCell::new(),
        }
    }

    pub async fn load_library(&self) {
        self.library.load(self.repo.get_series()).await;
    }

    pub async fn load_queue(&self) {
        self.queue.load(self.repo.get_queue()).await;
    }

    pub async fn load_status(&self) {
        self.status.load(self.repo.get_system_status()).await;
    }

    pub async fn load_calendar(&self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.calendar.load(self.repo.get_calendar(start, end)).await;
    }

    pub async fn refresh_all(&self) {
        let (start, end) = default_calendar_window();
        tokio::join!(
            self.load_library(),
            self.load_queue(),
            self.load_status(),
            self.load_calendar(start, end),
        );
    }
}

/// View state for the four movie screen areas, mirroring [`SeriesScreens`].
pub struct MovieScreens {
    repo: Arc<RadarrRepository>,
    pub library: StateCell<Vec<Movie>>,
    pub queue: StateCell<Paged<radarr::QueueRecord>>,
    pub status: StateCell<SystemStatus>,
    pub calendar: StateCell<Vec<Movie>>,
}

impl MovieScreens {
    pub fn new(repo: Arc<RadarrRepository>) -> Self {
        Self {
            repo,
            library: StateCell::new(),
            queue: StateCell::new(),
            status: StateCell::new(),
            calendar: StateCell::new(),
        }
    }

    pub async fn load_library(&self) {
        self.library.load(self.repo.get_movies()).await;
    }

    pub async fn load_queue(&self) {
        self.queue.load(self.repo.get_queue()).await;
    }

    pub async fn load_status(&self) {
        self.status.load(self.repo.get_system_status()).await;
    }

    pub async fn load_calendar(&self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.calendar.load(self.repo.get_calendar(start, end)).await;
    }

    pub async fn refresh_all(&self) {
        let (start, end) = default_calendar_window();
        tokio::join!(
            self.load_library(),
            self.load_queue(),
            self.load_status(),
            self.load_calendar(start, end),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepoError;
    use std::future::ready;

    #[test]
    fn test_cell_starts_loading() {
        let cell: StateCell<Vec<i32>> = StateCell::new();
        assert!(cell.current().is_loading());
    }

    #[tokio::test]
    async fn test_successful_fetch_lands_in_success_even_when_empty() {
        let cell: StateCell<Vec<i32>> = StateCell::new();
        cell.load(ready(Ok(Vec::new()))).await;
        assert_eq!(cell.current(), DataState::Success(Vec::new()));
    }

    #[tokio::test]
    async fn test_failed_fetch_lands_in_error_text() {
        let cell: StateCell<Vec<i32>> = StateCell::new();
        cell.load(ready(Err(RepoError {
            category: "Transport".to_string(),
            message: "connection refused".to_string(),
        })))
        .await;

        assert_eq!(
            cell.current(),
            DataState::Error("Transport: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_reload_discards_previous_payload() {
        let cell: StateCell<Vec<i32>> = StateCell::new();
        cell.load(ready(Ok(vec![1, 2, 3]))).await;
        assert_eq!(cell.current(), DataState::Success(vec![1, 2, 3]));

        // A failed reload must not leave the stale payload behind.
        cell.load(ready(Err(RepoError {
            category: "HttpStatus".to_string(),
            message: "HTTP 500 Internal Server Error".to_string(),
        })))
        .await;

        assert!(cell.current().success().is_none());
        assert!(cell.current().error().unwrap().contains("HttpStatus"));
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let cell: StateCell<i32> = StateCell::new();
        let mut rx = cell.subscribe();

        cell.load(ready(Ok(7))).await;

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), DataState::Success(7));
    }

    #[test]
    fn test_default_calendar_window_spans_past_and_future() {
        let (start, end) = default_calendar_window();
        assert!(start < end);
        assert!(end - start == Duration::days(8));
    }
}
