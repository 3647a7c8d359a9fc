//! Hosted scrape API backend.
//!
//! Talks to a hosted scraping service that renders the page server-side
//! and returns both HTML and a markdown rendition. The same service
//! exposes a structured-extraction endpoint, which this adapter offers
//! as the chain's optional fast-path.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{AcquisitionError, AcquisitionResult};
use crate::traits::backend::{ContentBackend, FetchRequest, StructuredBackend};
use crate::types::document::{AcquiredDocument, AcquisitionMethod};
use crate::types::schema::FieldSchema;

const DEFAULT_API_URL: &str = "https://api.scrapehub.dev/v1";

/// Hosted scrape/extract API adapter.
pub struct ScrapeApiBackend {
    client: Client,
    api_url: String,
    api_key: SecretString,
}

// Request/response shapes for the provider's API. Kept private so the
// provider's naming never leaks out of this adapter.

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
    #[serde(rename = "waitFor", skip_serializing_if = "Option::is_none")]
    wait_for: Option<u64>,
    #[serde(rename = "waitForSelector", skip_serializing_if = "Option::is_none")]
    wait_for_selector: Option<&'a str>,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    html: Option<String>,
    markdown: Option<String>,
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
    schema: Value,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ExtractResponse {
    success: bool,
    data: Option<serde_json::Map<String, Value>>,
    error: Option<String>,
}

impl ScrapeApiBackend {
    /// Create an adapter against the default API URL.
    pub fn new(api_key: SecretString) -> AcquisitionResult<Self> {
        Self::with_api_url(api_key, DEFAULT_API_URL)
    }

    /// Create an adapter against a custom API URL (self-hosted or test
    /// fixture).
    pub fn with_api_url(
        api_key: SecretString,
        api_url: impl Into<String>,
    ) -> AcquisitionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }

    /// Create from the `SCRAPE_API_KEY` environment variable.
    pub fn from_env() -> AcquisitionResult<Self> {
        let key = std::env::var("SCRAPE_API_KEY").map_err(|_| AcquisitionError::Api {
            status: 0,
            message: "SCRAPE_API_KEY environment variable not set".into(),
        })?;
        Self::new(key.into())
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> AcquisitionResult<R> {
        let url = format!("{}{}", self.api_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AcquisitionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentBackend for ScrapeApiBackend {
    async fn fetch(&self, request: &FetchRequest) -> AcquisitionResult<AcquiredDocument> {
        let body = ScrapeRequest {
            url: &request.url,
            formats: vec!["html", "markdown"],
            wait_for: request.hints.wait_ms,
            wait_for_selector: request.hints.ready_selector.as_deref(),
        };

        let response: ScrapeResponse = self.post("/scrape", &body).await?;
        if !response.success {
            return Err(AcquisitionError::Api {
                status: 200,
                message: response.error.unwrap_or_else(|| "scrape failed".into()),
            });
        }

        let data = response.data.ok_or_else(|| AcquisitionError::NoContent {
            url: request.url.clone(),
        })?;

        let mut doc = AcquiredDocument::new(&request.url, ContentBackend::name(self));
        if let Some(html) = data.html {
            doc = doc.with_html(html);
        }
        if let Some(markdown) = data.markdown {
            doc = doc.with_markdown(markdown);
        }
        if !doc.has_content() {
            return Err(AcquisitionError::NoContent {
                url: request.url.clone(),
            });
        }

        tracing::debug!(url = %request.url, "scrape API returned document");
        Ok(doc)
    }

    fn name(&self) -> &str {
        "scrape-api"
    }

    fn method(&self) -> AcquisitionMethod {
        AcquisitionMethod::ScrapeApi
    }
}

#[async_trait]
impl StructuredBackend for ScrapeApiBackend {
    async fn extract_structured(
        &self,
        request: &FetchRequest,
        schema: &FieldSchema,
        prompt_hint: &str,
    ) -> AcquisitionResult<serde_json::Map<String, Value>> {
        let body = ExtractRequest {
            url: &request.url,
            schema: schema.to_remote_schema(),
            prompt: prompt_hint,
        };

        let response: ExtractResponse = self.post("/extract", &body).await?;
        if !response.success {
            return Err(AcquisitionError::Api {
                status: 200,
                message: response.error.unwrap_or_else(|| "extract failed".into()),
            });
        }

        response.data.ok_or_else(|| AcquisitionError::NoContent {
            url: request.url.clone(),
        })
    }

    fn name(&self) -> &str {
        "scrape-api-extract"
    }
}
