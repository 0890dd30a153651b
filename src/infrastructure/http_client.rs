//! # HTTP Client Utilities
//!
//! Thin JSON-over-HTTP wrapper used by the gas price oracle.
//!
//! # Examples
//!
//! ```ignore
//! use web3_client::infrastructure::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client.get("https://api.example.com/endpoint").await?;
//! ```

use crate::infrastructure::blockchain::{BlockchainError, BlockchainResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `BlockchainError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> BlockchainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BlockchainError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `BlockchainError::Connection` or `Timeout` if the request fails.
    /// Returns `BlockchainError::InvalidResponse` if the response cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> BlockchainResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }
}

/// Checks the status and deserializes the JSON body.
async fn handle_response<T: DeserializeOwned>(response: Response) -> BlockchainResult<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.map_err(|e| {
            BlockchainError::invalid_response(format!("Failed to parse response: {e}"))
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> BlockchainError {
    if error.is_timeout() {
        BlockchainError::timeout("Request timed out")
    } else if error.is_connect() {
        BlockchainError::connection(format!("Connection failed: {error}"))
    } else {
        BlockchainError::connection(format!("HTTP request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> BlockchainError {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            BlockchainError::connection(format!("Server error ({status}): {body}"))
        }
        _ => BlockchainError::invalid_response(format!("HTTP error ({status}): {body}")),
    }
}
