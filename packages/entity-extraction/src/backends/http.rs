//! Plain HTTP backend.
//!
//! The most generic and most brittle acquisition method: a direct GET
//! with browser-like headers. No JavaScript rendering, so it sits last
//! in every chain; static pages and embedded metadata still make it
//! worthwhile. All targets pass through the SSRF guard since this
//! backend fetches whatever URL it is given.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{AcquisitionError, AcquisitionResult};
use crate::security::TargetGuard;
use crate::traits::backend::{ContentBackend, FetchRequest};
use crate::types::document::{AcquiredDocument, AcquisitionMethod};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Direct HTTP fetcher.
pub struct PlainHttpBackend {
    client: Client,
    guard: TargetGuard,
}

impl PlainHttpBackend {
    pub fn new() -> AcquisitionResult<Self> {
        Self::with_guard(TargetGuard::new())
    }

    /// Create with a custom SSRF guard (e.g. to exempt a fixture host).
    pub fn with_guard(guard: TargetGuard) -> AcquisitionResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .expect("static header value"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().expect("static header value"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, guard })
    }
}

#[async_trait]
impl ContentBackend for PlainHttpBackend {
    async fn fetch(&self, request: &FetchRequest) -> AcquisitionResult<AcquiredDocument> {
        self.guard.validate_resolved(&request.url).await?;

        let response = self.client.get(&request.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::Api {
                status: status.as_u16(),
                message: format!("HTTP {status} for {}", request.url),
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(AcquisitionError::NoContent {
                url: request.url.clone(),
            });
        }

        tracing::debug!(url = %request.url, bytes = html.len(), "fetched page");
        Ok(AcquiredDocument::new(&request.url, self.name()).with_html(html))
    }

    fn name(&self) -> &str {
        "http"
    }

    fn method(&self) -> AcquisitionMethod {
        AcquisitionMethod::HttpFetch
    }
}
