use crate::http::ApiError;
use crate::models::{CommandResponse, DiskSpace, HealthCheck, Paged, SystemStatus};
use crate::radarr;
use crate::radarr::{Movie, RadarrClient};
use crate::sonarr;
use crate::sonarr::{Episode, Series, SonarrClient};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A fault surfaced to the view layer as screen text: the caught fault's
/// category name plus its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category}: {message}")]
pub struct RepoError {
    pub category: String,
    pub message: String,
}

impl From<ApiError> for RepoError {
    fn from(fault: ApiError) -> Self {
        Self {
            category: fault.category().to_string(),
            message: fault.to_string(),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Thin pass-through over [`SonarrClient`]. Every method is a single-shot
/// producer: one call, one outcome, no retries, no shared in-flight state.
pub struct SonarrRepository {
    client: SonarrClient,
}

impl SonarrRepository {
    pub fn new(client: SonarrClient) -> Self {
        Self { client }
    }

    pub async fn get_system_status(&self) -> RepoResult<SystemStatus> {
        self.client.get_system_status().await.map_err(RepoError::from)
    }

    pub async fn get_health(&self) -> RepoResult<Vec<HealthCheck>> {
        self.client.get_health().await.map_err(RepoError::from)
    }

    pub async fn get_disk_space(&self) -> RepoResult<Vec<DiskSpace>> {
        self.client.get_disk_space().await.map_err(RepoError::from)
    }

    pub async fn get_series(&self) -> RepoResult<Vec<Series>> {
        self.client.get_series().await.map_err(RepoError::from)
    }

    pub async fn get_series_by_id(&self, id: i64) -> RepoResult<Series> {
        self.client.get_series_by_id(id).await.map_err(RepoError::from)
    }

    pub async fn add_series(&self, series: &Series) -> RepoResult<Series> {
        self.client.add_series(series).await.map_err(RepoError::from)
    }

    pub async fn update_series(&self, id: i64, series: &Series) -> RepoResult<Series> {
        self.client
            .update_series(id, series)
            .await
            .map_err(RepoError::from)
    }

    pub async fn delete_series(&self, id: i64, delete_files: bool) -> RepoResult<()> {
        self.client
            .delete_series(id, delete_files)
            .await
            .map_err(RepoError::from)
    }

    pub async fn get_queue(&self) -> RepoResult<Paged<sonarr::QueueRecord>> {
        self.client.get_queue().await.map_err(RepoError::from)
    }

    pub async fn remove_queue_item(&self, id: i64) -> RepoResult<()> {
        self.client.remove_queue_item(id).await.map_err(RepoError::from)
    }

    pub async fn get_calendar(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Episode>> {
        self.client
            .get_calendar(start, end)
            .await
            .map_err(RepoError::from)
    }

    pub async fn get_missing(
        &self,
        query: &sonarr::MissingQuery,
    ) -> RepoResult<Paged<Episode>> {
        self.client.get_missing(query).await.map_err(RepoError::from)
    }

    pub async fn lookup_series(&self, term: &str) -> RepoResult<Vec<Series>> {
        self.client.lookup_series(term).await.map_err(RepoError::from)
    }

    pub async fn execute_command(
        &self,
        request: &sonarr::CommandRequest,
    ) -> RepoResult<CommandResponse> {
        self.client
            .execute_command(request)
            .await
            .map_err(RepoError::from)
    }
}

/// Thin pass-through over [`RadarrClient`], mirroring [`SonarrRepository`].
pub struct RadarrRepository {
    client: RadarrClient,
}

impl RadarrRepository {
    pub fn new(client: RadarrClient) -> Self {
        Self { client }
    }

    pub async fn get_system_status(&self) -> RepoResult<SystemStatus> {
        self.client.get_system_status().await.map_err(RepoError::from)
    }

    pub async fn get_health(&self) -> RepoResult<Vec<HealthCheck>> {
        self.client.get_health().await.map_err(RepoError::from)
    }

    pub async fn get_disk_space(&self) -> RepoResult<Vec<DiskSpace>> {
        self.client.get_disk_space().await.map_err(RepoError::from)
    }

    pub async fn get_movies(&self) -> RepoResult<Vec<Movie>> {
        self.client.get_movies().await.map_err(RepoError::from)
    }

    pub async fn get_movie_by_id(&self, id: i64) -> RepoResult<Movie> {
        self.client.get_movie_by_id(id).await.map_err(RepoError::from)
    }

    pub async fn add_movie(&self, movie: &Movie) -> RepoResult<Movie> {
        self.client.add_movie(movie).await.map_err(RepoError::from)
    }

    pub async fn update_movie(&self, id: i64, movie: &Movie) -> RepoResult<Movie> {
        self.client
            .update_movie(id, movie)
            .await
            .map_err(RepoError::from)
    }

    pub async fn delete_movie(&self, id: i64, delete_files: bool) -> RepoResult<()> {
        self.client
            .delete_movie(id, delete_files)
            .await
            .map_err(RepoError::from)
    }

    pub async fn get_queue(&self) -> RepoResult<Paged<radarr::QueueRecord>> {
        self.client.get_queue().await.map_err(RepoError::from)
    }

    pub async fn remove_queue_item(&self, id: i64) -> RepoResult<()> {
        self.client.remove_queue_item(id).await.map_err(RepoError::from)
    }

    pub async fn get_calendar(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Movie>> {
        self.client
            .get_calendar(start, end)
            .await
            .map_err(RepoError::from)
    }

    pub async fn get_missing(&self, query: &radarr::MissingQuery) -> RepoResult<Paged<Movie>> {
        self.client.get_missing(query).await.map_err(RepoError::from)
    }

    pub async fn lookup_movie(&self, term: &str) -> RepoResult<Vec<Movie>> {
        self.client.lookup_movie(term).await.map_err(RepoError::from)
    }

    pub async fn execute_command(
        &self,
        request: &radarr::CommandRequest,
    ) -> RepoResult<CommandResponse> {
        self.client
            .execute_command(request)
            .await
            .map_err(RepoError::from)
    }
}
