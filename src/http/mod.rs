use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Header both server kinds expect the API key in.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// A fault raised during a network call or data decode.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Transport",
            ApiError::Status { .. } => "HttpStatus",
            ApiError::Decode(_) => "Decode",
        }
    }

    fn from_status(status: StatusCode) -> Self {
        ApiError::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("remotarr/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    #[instrument(skip(self, api_key), fields(url = %url))]
    pub async fn get(&self, url: &str, api_key: &str) -> Result<Response, ApiError> {
        debug!("Making GET request");
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP request failed with status: {}", status);
            return Err(ApiError::from_status(status));
        }

        Ok(response)
    }

    #[instrument(skip(self, api_key), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
    ) -> Result<T, ApiError> {
        let response = self.get(url, api_key).await?;
        Self::decode_body(response).await
    }

    #[instrument(skip(self, api_key, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("Making POST request");
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP POST failed with status: {}", status);
            return Err(ApiError::from_status(status));
        }

        Self::decode_body(response).await
    }

    #[instrument(skip(self, api_key, body), fields(url = %url))]
    pub async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("Making PUT request");
        let response = self
            .client
            .put(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP PUT failed with status: {}", status);
            return Err(ApiError::from_status(status));
        }

        Self::decode_body(response).await
    }

    #[instrument(skip(self, api_key), fields(url = %url))]
    pub async fn delete(&self, url: &str, api_key: &str) -> Result<(), ApiError> {
        debug!("Making DELETE request");
        let response = self
            .client
            .delete(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP DELETE failed with status: {}", status);
            return Err(ApiError::from_status(status));
        }

        Ok(())
    }

    // Bodies are read as text and decoded explicitly so a shape mismatch
    // surfaces as a Decode fault rather than a transport one.
    async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fault_carries_code_and_reason() {
        let fault = ApiError::from_status(StatusCode::NOT_FOUND);
        assert_eq!(fault.category(), "HttpStatus");
        assert_eq!(fault.to_string(), "HTTP 404 Not Found");
    }

    #[test]
    fn test_decode_fault_category() {
        let parse_error = serde_json::from_str::<i32>("not json").unwrap_err();
        let fault = ApiError::from(parse_error);
        assert_eq!(fault.category(), "Decode");
        assert!(!fault.to_string().is_empty());
    }
}
