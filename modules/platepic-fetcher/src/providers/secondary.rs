//! Bing image search fallback, only used once the Wikipedia chain is exhausted.

use std::sync::Arc;

use bing_image_client::largest_hit;
use platepic_common::{ImageResult, ImageSource};
use tracing::{debug, info, warn};

use crate::traits::ImageSearch;

/// Qualifiers appended to the dish name, most specific first.
const QUERY_QUALIFIERS: [&str; 5] = ["菜", "中国菜", "美食", "Chinese food", "dish"];

pub fn query_templates(name: &str) -> Vec<String> {
    QUERY_QUALIFIERS
        .iter()
        .map(|qualifier| format!("{name} {qualifier}"))
        .collect()
}

pub struct SecondaryChain {
    /// `None` when no credential is configured.
    search: Option<Arc<dyn ImageSearch>>,
}

impl SecondaryChain {
    pub fn new(search: Option<Arc<dyn ImageSearch>>) -> Self {
        Self { search }
    }

    pub fn disabled() -> Self {
        Self { search: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub async fn resolve(&self, name: &str) -> Option<ImageResult> {
        let search = self.search.as_ref()?;

        for query in query_templates(name) {
            let hits = match search.search(&query).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(query = query.as_str(), error = %e, "Image search failed");
                    continue;
                }
            };

            match largest_hit(&hits).and_then(|hit| hit.direct_url()) {
                Some(url) => {
                    info!(query = query.as_str(), url, "Secondary image found");
                    return Some(ImageResult {
                        url: url.to_string(),
                        source: ImageSource::Secondary,
                        meta: query,
                    });
                }
                None => debug!(query = query.as_str(), hits = hits.len(), "No usable image hit"),
            }
        }
        None
    }
}
