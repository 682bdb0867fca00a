use crate::http::{ApiError, HttpClient};
use crate::models::{
    CommandResponse, DiskSpace, HealthCheck, Image, Paged, ServerConnection, SortDir,
    StatusMessage, SystemStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub struct RadarrClient {
    http: HttpClient,
    connection: ServerConnection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub movie_file: Option<MovieFile>,
    #[serde(default)]
    pub in_cinemas: Option<DateTime<Utc>>,
    #[serde(default)]
    pub physical_release: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digital_release: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quality_profile_id: Option<i64>,
    #[serde(default)]
    pub root_folder_path: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub ratings: Option<MovieRatings>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub statistics: Option<MovieStatistics>,
    // Unknown fields ride along so an update round-trips the full shape.
    #[serde(flatten)]
    pub extra_fields: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieFile {
    pub id: i64,
    #[serde(default)]
    pub relative_path: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quality: Option<QualityModel>,
    #[serde(default)]
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityModel {
    pub quality: Quality,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRatings {
    #[serde(default)]
    pub imdb: Option<RatingValue>,
    #[serde(default)]
    pub tmdb: Option<RatingValue>,
    #[serde(default)]
    pub metacritic: Option<RatingValue>,
    #[serde(default)]
    pub rotten_tomatoes: Option<RatingValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingValue {
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieStatistics {
    #[serde(default)]
    pub movie_file_count: i64,
    #[serde(default)]
    pub size_on_disk: i64,
    #[serde(default)]
    pub release_groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub id: i64,
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: f64,
    #[serde(rename = "sizeleft", default)]
    pub size_left: f64,
    #[serde(rename = "timeleft", default)]
    pub time_left: Option<String>,
    #[serde(default)]
    pub estimated_completion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tracked_download_status: Option<String>,
    #[serde(default)]
    pub tracked_download_state: Option<String>,
    #[serde(default)]
    pub status_messages: Vec<StatusMessage>,
    #[serde(default)]
    pub download_client: Option<String>,
    #[serde(default)]
    pub indexer: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_ids: Option<Vec<i64>>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movie_ids: None,
        }
    }
}

/// Query for the wanted/missing page. Defaults to the first page of twenty,
/// newest physical release first.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_key: String,
    pub sort_dir: SortDir,
}

impl Default for MissingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            sort_key: "physicalRelease".to_string(),
            sort_dir: SortDir::Desc,
        }
    }
}

impl RadarrClient {
    pub fn new(http: HttpClient, connection: ServerConnection) -> Self {
        Self { http, connection }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.connection.base_url.trim_end_matches('/'), path)
    }

    fn api_key(&self) -> &str {
        &self.connection.api_key
    }

    #[instrument(skip(self))]
    pub async fn get_system_status(&self) -> Result<SystemStatus, ApiError> {
        let url = self.url("/api/v3/system/status");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_health(&self) -> Result<Vec<HealthCheck>, ApiError> {
        let url = self.url("/api/v3/health");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_disk_space(&self) -> Result<Vec<DiskSpace>, ApiError> {
        let url = self.url("/api/v3/diskspace");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_movies(&self) -> Result<Vec<Movie>, ApiError> {
        let url = self.url("/api/v3/movie");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_movie_by_id(&self, id: i64) -> Result<Movie, ApiError> {
        let url = self.url(&format!("/api/v3/movie/{}", id));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, movie), fields(title = %movie.title))]
    pub async fn add_movie(&self, movie: &Movie) -> Result<Movie, ApiError> {
        info!("Adding movie to Radarr: {}", movie.title);
        let url = self.url("/api/v3/movie");
        self.http.post_json(&url, self.api_key(), movie).await
    }

    #[instrument(skip(self, movie), fields(title = %movie.title))]
    pub async fn update_movie(&self, id: i64, movie: &Movie) -> Result<Movie, ApiError> {
        let url = self.url(&format!("/api/v3/movie/{}", id));
        self.http.put_json(&url, self.api_key(), movie).await
    }

    #[instrument(skip(self))]
    pub async fn delete_movie(&self, id: i64, delete_files: bool) -> Result<(), ApiError> {
        info!("Deleting movie {} from Radarr", id);
        let url = self.url(&format!(
            "/api/v3/movie/{}?deleteFiles={}",
            id, delete_files
        ));
        self.http.delete(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_queue(&self) -> Result<Paged<QueueRecord>, ApiError> {
        let url = self.url("/api/v3/queue");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn remove_queue_item(&self, id: i64) -> Result<(), ApiError> {
        info!("Removing queue item {} from Radarr", id);
        let url = self.url(&format!("/api/v3/queue/{}", id));
        self.http.delete(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_calendar(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Movie>, ApiError> {
        let url = self.url(&format!(
            "/api/v3/calendar?start={}&end={}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, query))]
    pub async fn get_missing(&self, query: &MissingQuery) -> Result<Paged<Movie>, ApiError> {
        let url = self.url(&format!(
            "/api/v3/wanted/missing?page={}&pageSize={}&sortKey={}&sortDir={}",
            query.page, query.page_size, query.sort_key, query.sort_dir
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn lookup_movie(&self, term: &str) -> Result<Vec<Movie>, ApiError> {
        debug!("Looking up movie: {}", term);
        let url = self.url(&format!(
            "/api/v3/movie/lookup?term={}",
            urlencoding::encode(term)
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn execute_command(
        &self,
        request: &CommandRequest,
    ) -> Result<CommandResponse, ApiError> {
        info!("Executing Radarr command: {}", request.name);
        let url = self.url("/api/v3/command");
        self.http.post_json(&url, self.api_key(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_defaults() {
        let query = MissingQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.sort_key, "physicalRelease");
        assert_eq!(query.sort_dir, SortDir::Desc);
    }

    #[test]
    fn test_movie_with_file_deserializes() {
        let json = r#"{
            "id": 7,
            "title": "Test Movie",
            "tmdbId": 550,
            "monitored": true,
            "hasFile": true,
            "movieFile": {
                "id": 12,
                "relativePath": "Test Movie (1999).mkv",
                "size": 4000000000,
                "quality": {"quality": {"id": 7, "name": "Bluray-1080p"}},
                "languages": [{"id": 1, "name": "English"}]
            },
            "ratings": {"imdb": {"votes": 100, "value": 8.4}}
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert!(movie.has_file);
        let file = movie.movie_file.expect("movie file");
        assert_eq!(file.quality.unwrap().quality.name, "Bluray-1080p");
        assert_eq!(file.languages.len(), 1);
        assert_eq!(movie.ratings.unwrap().imdb.unwrap().value, 8.4);
    }

    #[test]
    fn test_queue_record_parent_may_be_absent() {
        let json = r#"{"id": 4, "size": 100.0, "sizeleft": 50.0, "status": "paused"}"#;
        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.movie_id, None);
        assert_eq!(record.status.as_deref(), Some("paused"));
    }

    #[test]
    fn test_command_request_with_targets() {
        let request = CommandRequest {
            name: "MoviesSearch".to_string(),
            movie_ids: Some(vec![7]),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"name":"MoviesSearch","movieIds":[7]}"#);
    }
}
