use crate::http::{ApiError, HttpClient};
use crate::models::{
    CommandResponse, DiskSpace, HealthCheck, Image, Paged, ServerConnection, SortDir,
    StatusMessage, SystemStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub struct SonarrClient {
    http: HttpClient,
    connection: ServerConnection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub tvdb_id: Option<i64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub quality_profile_id: Option<i64>,
    #[serde(default)]
    pub root_folder_path: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub ratings: Option<Ratings>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
    // Unknown fields ride along so an update round-trips the full shape.
    #[serde(flatten)]
    pub extra_fields: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: i32,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub season_count: Option<i32>,
    #[serde(default)]
    pub episode_count: i64,
    #[serde(default)]
    pub episode_file_count: i64,
    #[serde(default)]
    pub total_episode_count: i64,
    #[serde(default)]
    pub size_on_disk: i64,
    #[serde(default)]
    pub percent_of_episodes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    pub series_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub series: Option<Series>,
    #[serde(flatten)]
    pub extra_fields: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub id: i64,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub episode_id: Option<i64>,
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
    pub series_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_ids: Option<Vec<i64>>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series_id: None,
            episode_ids: None,
        }
    }
}

/// Query for the wanted/missing page. Defaults to the first page of twenty,
/// newest air date first.
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
            sort_key: "airDateUtc".to_string(),
            sort_dir: SortDir::Desc,
        }
    }
}

impl SonarrClient {
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
    pub async fn get_series(&self) -> Result<Vec<Series>, ApiError> {
        let url = self.url("/api/v3/series");
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_series_by_id(&self, id: i64) -> Result<Series, ApiError> {
        let url = self.url(&format!("/api/v3/series/{}", id));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, series), fields(title = %series.title))]
    pub async fn add_series(&self, series: &Series) -> Result<Series, ApiError> {
        info!("Adding series to Sonarr: {}", series.title);
        let url = self.url("/api/v3/series");
        self.http.post_json(&url, self.api_key(), series).await
    }

    #[instrument(skip(self, series), fields(title = %series.title))]
    pub async fn update_series(&self, id: i64, series: &Series) -> Result<Series, ApiError> {
        let url = self.url(&format!("/api/v3/series/{}", id));
        self.http.put_json(&url, self.api_key(), series).await
    }

    #[instrument(skip(self))]
    pub async fn delete_series(&self, id: i64, delete_files: bool) -> Result<(), ApiError> {
        info!("Deleting series {} from Sonarr", id);
        let url = self.url(&format!(
            "/api/v3/series/{}?deleteFiles={}",
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
        info!("Removing queue item {} from Sonarr", id);
        let url = self.url(&format!("/api/v3/queue/{}", id));
        self.http.delete(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn get_calendar(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Episode>, ApiError> {
        let url = self.url(&format!(
            "/api/v3/calendar?start={}&end={}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, query))]
    pub async fn get_missing(&self, query: &MissingQuery) -> Result<Paged<Episode>, ApiError> {
        let url = self.url(&format!(
            "/api/v3/wanted/missing?page={}&pageSize={}&sortKey={}&sortDir={}",
            query.page, query.page_size, query.sort_key, query.sort_dir
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self))]
    pub async fn lookup_series(&self, term: &str) -> Result<Vec<Series>, ApiError> {
        debug!("Looking up series: {}", term);
        let url = self.url(&format!(
            "/api/v3/series/lookup?term={}",
            urlencoding::encode(term)
        ));
        self.http.get_json(&url, self.api_key()).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn execute_command(
        &self,
        request: &CommandRequest,
    ) -> Result<CommandResponse, ApiError> {
        info!("Executing Sonarr command: {}", request.name);
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
        assert_eq!(query.sort_key, "airDateUtc");
        assert_eq!(query.sort_dir, SortDir::Desc);
    }

    #[test]
    fn test_series_keeps_unknown_fields() {
        let json = r#"{
            "id": 5,
            "title": "Test Show",
            "tvdbId": 12345,
            "monitored": true,
            "tags": [1, 2],
            "seasonFolder": true,
            "languageProfileId": 1
        }"#;

        let series: Series = serde_json::from_str(json).unwrap();
        assert_eq!(series.id, Some(5));
        assert_eq!(series.tvdb_id, Some(12345));
        assert!(series.monitored);
        assert_eq!(series.tags, vec![1, 2]);

        // Round-trip must preserve fields the client does not model.
        let back = serde_json::to_value(&series).unwrap();
        assert_eq!(back["seasonFolder"], serde_json::json!(true));
        assert_eq!(back["languageProfileId"], serde_json::json!(1));
    }

    #[test]
    fn test_queue_record_wire_names() {
        let json = r#"{
            "id": 9,
            "seriesId": 5,
            "size": 1000.0,
            "sizeleft": 250.0,
            "timeleft": "00:05:00",
            "status": "downloading",
            "trackedDownloadStatus": "ok",
            "statusMessages": [{"title": "t", "messages": ["m"]}]
        }"#;

        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.series_id, Some(5));
        assert_eq!(record.size_left, 250.0);
        assert_eq!(record.time_left.as_deref(), Some("00:05:00"));
        assert_eq!(record.status_messages.len(), 1);
    }

    #[test]
    fn test_queue_record_parent_may_be_absent() {
        let json = r#"{"id": 3, "size": 0.0, "sizeleft": 0.0}"#;
        let record: QueueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.series_id, None);
        assert_eq!(record.episode_id, None);
    }

    #[test]
    fn test_command_request_skips_absent_targets() {
        let request = CommandRequest::new("RssSync");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"name":"RssSync"}"#);

        let targeted = CommandRequest {
            name: "EpisodeSearch".to_string(),
            series_id: None,
            episode_ids: Some(vec![1, 2]),
        };
        let json = serde_json::to_string(&targeted).unwrap();
        assert_eq!(json, r#"{"name":"EpisodeSearch","episodeIds":[1,2]}"#);
    }
}
