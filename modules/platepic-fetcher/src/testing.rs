// Test mocks for the fetch pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockLookup (PageImageLookup) — (strategy, lang, title) → URL, records calls
// - MockSearch (ImageSearch) — query → hits, records queries
// - MockDownloader (ImageDownloader) — writes fixed bytes, records URLs
//
// Unregistered lookups return an empty response, not an error, matching a
// Wikipedia article that exists but has no image.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use bing_image_client::ImageHit;
use platepic_common::PlatepicError;
use wikipedia_client::{
    ImageRef, MediaItem, MediaListResponse, PageImagesPage, PageImagesQuery, PageImagesResponse,
    SummaryResponse,
};

use crate::providers::Strategy;
use crate::traits::{ImageDownloader, ImageSearch, PageImageLookup};

// ---------------------------------------------------------------------------
// MockLookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCall {
    pub strategy: Strategy,
    pub lang: String,
    pub title: String,
}

impl LookupCall {
    pub fn new(strategy: Strategy, lang: &str, title: &str) -> Self {
        Self {
            strategy,
            lang: lang.to_string(),
            title: title.to_string(),
        }
    }
}

type LookupKey = (&'static str, String, String);

fn key(strategy: Strategy, lang: &str, title: &str) -> LookupKey {
    (strategy.as_str(), lang.to_string(), title.to_string())
}

/// Builder pattern: `.on_summary()`, `.on_media_list()`, `.on_page_images()`,
/// `.fail_summary()`.
#[derive(Default)]
pub struct MockLookup {
    urls: HashMap<LookupKey, String>,
    failures: HashSet<LookupKey>,
    calls: Mutex<Vec<LookupCall>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_summary(mut self, lang: &str, title: &str, url: &str) -> Self {
        self.urls.insert(key(Strategy::Summary, lang, title), url.to_string());
        self
    }

    pub fn on_media_list(mut self, lang: &str, title: &str, url: &str) -> Self {
        self.urls.insert(key(Strategy::MediaList, lang, title), url.to_string());
        self
    }

    pub fn on_page_images(mut self, lang: &str, title: &str, url: &str) -> Self {
        self.urls.insert(key(Strategy::PageImages, lang, title), url.to_string());
        self
    }

    pub fn fail_summary(mut self, lang: &str, title: &str) -> Self {
        self.failures.insert(key(Strategy::Summary, lang, title));
        self
    }

    /// Every lookup made so far, in call order.
    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, strategy: Strategy, lang: &str, title: &str) -> Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(LookupCall::new(strategy, lang, title));
        let k = key(strategy, lang, title);
        if self.failures.contains(&k) {
            bail!("API error (status 503): upstream unavailable");
        }
        Ok(self.urls.get(&k).cloned())
    }
}

fn image_ref(url: String) -> ImageRef {
    ImageRef {
        source: Some(url),
        ..ImageRef::default()
    }
}

#[async_trait]
impl PageImageLookup for MockLookup {
    async fn summary(&self, title: &str, lang: &str) -> Result<SummaryResponse> {
        let url = self.answer(Strategy::Summary, lang, title)?;
        Ok(SummaryResponse {
            title: Some(title.to_string()),
            originalimage: url.map(image_ref),
            thumbnail: None,
        })
    }

    async fn media_list(&self, title: &str, lang: &str) -> Result<MediaListResponse> {
        let url = self.answer(Strategy::MediaList, lang, title)?;
        Ok(MediaListResponse {
            items: url
                .map(|src| MediaItem {
                    item_type: Some("image".to_string()),
                    src: Some(src),
                    ..MediaItem::default()
                })
                .into_iter()
                .collect(),
        })
    }

    async fn page_images(&self, title: &str, lang: &str) -> Result<PageImagesResponse> {
        let url = self.answer(Strategy::PageImages, lang, title)?;
        let pages = url
            .map(|source| {
                (
                    "1".to_string(),
                    PageImagesPage {
                        title: Some(title.to_string()),
                        original: None,
                        thumbnail: Some(image_ref(source)),
                    },
                )
            })
            .into_iter()
            .collect();
        Ok(PageImagesResponse {
            query: Some(PageImagesQuery { pages }),
        })
    }
}

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

/// Query-keyed image search. Unregistered queries return no hits.
#[derive(Default)]
pub struct MockSearch {
    hits: HashMap<String, Vec<ImageHit>>,
    failures: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(mut self, query: &str, hits: Vec<ImageHit>) -> Self {
        self.hits.insert(query.to_string(), hits);
        self
    }

    pub fn fail_query(mut self, query: &str) -> Self {
        self.failures.insert(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for MockSearch {
    async fn search(&self, query: &str) -> Result<Vec<ImageHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failures.contains(query) {
            bail!("Network error: operation timed out");
        }
        Ok(self.hits.get(query).cloned().unwrap_or_default())
    }
}

/// Search hit with the given direct URL and dimensions.
pub fn hit(url: Option<&str>, width: u64, height: u64) -> ImageHit {
    ImageHit {
        content_url: url.map(String::from),
        host_page_url: Some("https://example.com/recipe".to_string()),
        width: Some(width),
        height: Some(height),
    }
}

// ---------------------------------------------------------------------------
// MockDownloader
// ---------------------------------------------------------------------------

/// Writes a fixed body for every URL except those marked as failing.
#[derive(Default)]
pub struct MockDownloader {
    failures: HashSet<String>,
    urls: Mutex<Vec<String>>,
}

impl MockDownloader {
    pub const BODY: &'static [u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_url(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string());
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageDownloader for MockDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, PlatepicError> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.failures.contains(url) {
            return Err(PlatepicError::Download(format!("HTTP 404 Not Found for {url}")));
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, Self::BODY)?;
        Ok(Self::BODY.len() as u64)
    }
}
