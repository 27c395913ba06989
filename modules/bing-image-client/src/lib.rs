pub mod error;

pub use error::{BingError, Result};

use std::time::Duration;

use serde::Deserialize;

const ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/images/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables sent with every search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Market code, e.g. `zh-CN`.
    pub market: String,
    /// `Off`, `Moderate` or `Strict`.
    pub safe_search: String,
    /// License filter, e.g. `Any`, `Public`, `Share`.
    pub license: String,
    pub count: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            market: "zh-CN".to_string(),
            safe_search: "Moderate".to_string(),
            license: "Any".to_string(),
            count: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub value: Vec<ImageHit>,
}

/// One image search result.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageHit {
    pub content_url: Option<String>,
    pub host_page_url: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

impl ImageHit {
    /// Direct image URL, if the hit has a usable one.
    pub fn direct_url(&self) -> Option<&str> {
        self.content_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Pixel area; a missing dimension counts as zero.
    pub fn area(&self) -> u64 {
        self.width.unwrap_or(0).saturating_mul(self.height.unwrap_or(0))
    }
}

/// Largest hit by `width * height` among those with a direct URL.
/// Ties keep the first hit encountered.
pub fn largest_hit(hits: &[ImageHit]) -> Option<&ImageHit> {
    hits.iter()
        .filter(|hit| hit.direct_url().is_some())
        .fold(None, |best: Option<&ImageHit>, hit| match best {
            Some(current) if current.area() >= hit.area() => Some(current),
            _ => Some(hit),
        })
}

pub struct BingImageClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    options: SearchOptions,
}

impl BingImageClient {
    pub fn new(api_key: &str, options: SearchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            options,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Run one image search and return the raw hits in ranking order.
    pub async fn search(&self, query: &str) -> Result<Vec<ImageHit>> {
        let count = self.options.count.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("mkt", self.options.market.as_str()),
                ("safeSearch", self.options.safe_search.as_str()),
                ("imageType", "Photo"),
                ("count", count.as_str()),
                ("license", self.options.license.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let data: ImagesResponse = serde_json::from_str(&body)?;
        tracing::debug!(query, hits = data.value.len(), "Bing image search complete");
        Ok(data.value)
    }
}
