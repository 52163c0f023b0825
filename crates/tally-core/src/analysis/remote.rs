//! Remote analysis endpoint client
//!
//! Forwards uploaded rows to a user-supplied URL as `{"rows": [...]}` and hands
//! back whatever JSON the endpoint answers with. The response is not validated.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AnalysisSettings;
use crate::error::{Error, Result};
use crate::fields::AdHocRow;

/// Request body sent to the analysis endpoint
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    rows: &'a [AdHocRow],
}

/// HTTP client for an external analysis service
#[derive(Clone)]
pub struct RemoteAnalyzer {
    http_client: Client,
    url: String,
    timeout: Duration,
    retries: u32,
}

impl RemoteAnalyzer {
    /// Create a client with an explicit per-request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.trim().to_string(),
            timeout,
            retries: 1,
        })
    }

    /// Create from settings; `None` when no endpoint is configured
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Option<Self>> {
        match settings.url.as_deref() {
            Some(url) => Ok(Some(
                Self::new(url, settings.timeout)?.with_retries(settings.retries),
            )),
            None => Ok(None),
        }
    }

    /// Set how many times an idempotent GET is retried
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the rows and return the endpoint's JSON verbatim
    ///
    /// POST is not idempotent, so this is attempted exactly once.
    pub async fn analyze(&self, rows: &[AdHocRow]) -> Result<Value> {
        debug!("Sending {} rows to {}", rows.len(), self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(&AnalyzeRequest { rows })
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&self.url, status));
        }

        let data: Value = response.json().await.map_err(|e| {
            Error::RemoteAnalysis(format!("{} returned a non-JSON body: {}", self.url, e))
        })?;
        debug!("Analysis endpoint answered");
        Ok(data)
    }

    /// Check that the endpoint is reachable with a GET
    ///
    /// Failed attempts are retried up to the configured retry count.
    pub async fn health_check(&self) -> Result<()> {
        let attempts = self.retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.http_client.get(&self.url).send().await {
                Ok(response) if !response.status().is_server_error() => return Ok(()),
                Ok(response) => {
                    last_error = Some(status_error(&self.url, response.status()));
                }
                Err(e) => last_error = Some(self.request_error(e)),
            }
            if attempt < attempts {
                warn!(
                    "Health check of {} failed (attempt {}/{}), retrying",
                    self.url, attempt, attempts
                );
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::RemoteAnalysis(format!("{} unreachable", self.url))))
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::RemoteAnalysis(format!(
                "{} timed out after {}s",
                self.url,
                self.timeout.as_secs()
            ))
        } else {
            Error::RemoteAnalysis(format!("request to {} failed: {}", self.url, e))
        }
    }
}

fn status_error(url: &str, status: StatusCode) -> Error {
    Error::RemoteAnalysis(format!("{} returned HTTP {}", url, status))
}
