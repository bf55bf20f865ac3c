use std::time::Duration;

use futures_util::StreamExt;
use jobwatch_core::StatusMap;
use jobwatch_logging::watch_debug;

use crate::{FailureKind, FetchError};

pub const DEFAULT_STATUS_ENDPOINT: &str = "http://127.0.0.1:8080/status";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch_statuses(&self) -> Result<StatusMap, FetchError>;
}

/// `GET`s the status endpoint and decodes the body as a [`StatusMap`].
#[derive(Debug, Clone)]
pub struct ReqwestStatusFetcher {
    settings: FetchSettings,
    endpoint: reqwest::Url,
    display_endpoint: String,
    client: reqwest::Client,
}

impl ReqwestStatusFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            display_endpoint: redact_endpoint(endpoint.as_str()),
            settings,
            endpoint,
            client,
        })
    }

    /// The endpoint with any password removed, for logs and pages.
    pub fn endpoint(&self) -> &str {
        &self.display_endpoint
    }
}

/// Drop the password from an endpoint URL. Text that does not parse as a URL
/// is returned unchanged.
pub fn redact_endpoint(endpoint: &str) -> String {
    match reqwest::Url::parse(endpoint) {
        Ok(mut url) => {
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => endpoint.to_string(),
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ReqwestStatusFetcher {
    async fn fetch_statuses(&self) -> Result<StatusMap, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        watch_debug!("GET {} -> {} bytes", self.display_endpoint, bytes.len());

        StatusMap::from_json(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
