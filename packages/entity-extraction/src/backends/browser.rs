//! Headless-browser automation backend.
//!
//! Drives a browser automation service (a pool of headless Chrome
//! instances behind an HTTP API) for pages that only render under
//! JavaScript. The acquisition hints map directly onto the service's
//! wait/readiness/scroll options.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::error::{AcquisitionError, AcquisitionResult};
use crate::traits::backend::{ContentBackend, FetchRequest};
use crate::types::document::{AcquiredDocument, AcquisitionMethod};

/// Headless browser service adapter. Returns rendered HTML only.
pub struct BrowserBackend {
    client: Client,
    service_url: String,
    token: Option<SecretString>,
}

#[derive(Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
    #[serde(rename = "waitFor", skip_serializing_if = "Option::is_none")]
    wait_for: Option<u64>,
    #[serde(rename = "waitForSelector", skip_serializing_if = "Option::is_none")]
    wait_for_selector: Option<WaitForSelector<'a>>,
    #[serde(rename = "scrollPage")]
    scroll_page: bool,
}

#[derive(Serialize)]
struct WaitForSelector<'a> {
    selector: &'a str,
    timeout: u64,
}

impl BrowserBackend {
    /// Create an adapter for a browser service endpoint.
    pub fn new(service_url: impl Into<String>) -> AcquisitionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self {
            client,
            service_url: service_url.into(),
            token: None,
        })
    }

    /// Create from the `BROWSER_SERVICE_URL` (and optional
    /// `BROWSER_SERVICE_TOKEN`) environment variables.
    pub fn from_env() -> AcquisitionResult<Self> {
        let service_url =
            std::env::var("BROWSER_SERVICE_URL").map_err(|_| AcquisitionError::Api {
                status: 0,
                message: "BROWSER_SERVICE_URL environment variable not set".into(),
            })?;
        let mut backend = Self::new(service_url)?;
        if let Ok(token) = std::env::var("BROWSER_SERVICE_TOKEN") {
            backend.token = Some(token.into());
        }
        Ok(backend)
    }

    /// Attach an auth token.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }
}

#[async_trait]
impl ContentBackend for BrowserBackend {
    async fn fetch(&self, request: &FetchRequest) -> AcquisitionResult<AcquiredDocument> {
        let body = ContentRequest {
            url: &request.url,
            wait_for: request.hints.wait_ms,
            wait_for_selector: request.hints.ready_selector.as_deref().map(|selector| {
                WaitForSelector {
                    selector,
                    timeout: request.hints.wait_ms.unwrap_or(10_000),
                }
            }),
            scroll_page: request.hints.scroll,
        };

        let mut req = self
            .client
            .post(format!("{}/content", self.service_url))
            .json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.expose_secret());
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AcquisitionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(AcquisitionError::NoContent {
                url: request.url.clone(),
            });
        }

        tracing::debug!(url = %request.url, bytes = html.len(), "browser service rendered page");
        Ok(AcquiredDocument::new(&request.url, self.name())
            .with_html(html)
            .with_metadata("renderer", "headless-chrome"))
    }

    fn name(&self) -> &str {
        "browser"
    }

    fn method(&self) -> AcquisitionMethod {
        AcquisitionMethod::HeadlessBrowser
    }
}
