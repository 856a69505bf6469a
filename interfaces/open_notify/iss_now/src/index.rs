use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

pub const ISS_NOW_URL: &str = "http://api.open-notify.org/iss-now.json";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct IssNowResult {
    pub body: String,
    pub status: StatusCode,
}

/// Reusable HTTP client bound to one ISS position URL.
#[derive(Debug, Clone)]
pub struct OpenNotifyClient {
    client: Client,
    url: String,
}

impl OpenNotifyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchIssNowError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent("rust-client")
            .build()
            .map_err(|source| FetchIssNowError::ClientBuild { source })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_iss_now(&self) -> Result<IssNowResult, FetchIssNowError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| FetchIssNowError::RequestSend { source })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| FetchIssNowError::ResponseRead { source })?;

        Ok(IssNowResult { body, status })
    }
}

#[derive(Debug, Error)]
pub enum FetchIssNowError {
    #[error("ClientBuild: {source}")]
    ClientBuild {
        source: reqwest::Error,
    },

    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
