//! Wikipedia provider chain.
//!
//! Candidates are the outer loop, strategies the inner loop. The first
//! non-empty URL wins and nothing after it is called.

use std::fmt;
use std::sync::Arc;

use platepic_common::{ImageResult, ImageSource, TitleCandidate};
use tracing::{debug, info, warn};

use crate::traits::PageImageLookup;

/// One way of pulling an image URL out of Wikipedia, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Summary,
    MediaList,
    PageImages,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [Strategy::Summary, Strategy::MediaList, Strategy::PageImages];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Summary => "summary",
            Strategy::MediaList => "media-list",
            Strategy::PageImages => "pageimages",
        }
    }

    /// Run this strategy for one candidate. Any failure is "no result".
    async fn lookup(self, provider: &dyn PageImageLookup, candidate: &TitleCandidate) -> Option<String> {
        let (title, lang) = (candidate.title.as_str(), candidate.lang.as_str());
        let result = match self {
            Strategy::Summary => provider.summary(title, lang).await.map(|r| r.image_url()),
            Strategy::MediaList => provider.media_list(title, lang).await.map(|r| r.image_url()),
            Strategy::PageImages => provider.page_images(title, lang).await.map(|r| r.image_url()),
        };

        match result {
            Ok(url) => {
                debug!(strategy = self.as_str(), lang, title, found = url.is_some(), "Primary lookup");
                url
            }
            Err(e) => {
                warn!(strategy = self.as_str(), lang, title, error = %e, "Primary lookup failed");
                None
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct PrimaryChain {
    provider: Arc<dyn PageImageLookup>,
}

impl PrimaryChain {
    pub fn new(provider: Arc<dyn PageImageLookup>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, candidates: &[TitleCandidate]) -> Option<ImageResult> {
        for candidate in candidates {
            for strategy in Strategy::ORDER {
                if let Some(url) = strategy.lookup(self.provider.as_ref(), candidate).await {
                    info!(candidate = %candidate, strategy = %strategy, url = url.as_str(), "Primary image found");
                    return Some(ImageResult {
                        url,
                        source: ImageSource::Primary,
                        meta: candidate.to_string(),
                    });
                }
            }
        }
        debug!(candidates = candidates.len(), "Primary chain exhausted");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LookupCall, MockLookup};

    fn candidates() -> Vec<TitleCandidate> {
        vec![
            TitleCandidate::new("麻婆豆腐", "zh"),
            TitleCandidate::new("麻婆豆腐（菜肴）", "zh"),
            TitleCandidate::new("Mapo tofu", "en"),
        ]
    }

    #[tokio::test]
    async fn first_strategy_of_first_candidate_short_circuits() {
        let mock = Arc::new(MockLookup::new().on_summary("zh", "麻婆豆腐", "https://a/mapo.jpg"));
        let chain = PrimaryChain::new(mock.clone());

        let result = chain.resolve(&candidates()).await.unwrap();

        assert_eq!(result.url, "https://a/mapo.jpg");
        assert_eq!(result.source, ImageSource::Primary);
        assert_eq!(result.meta, "zh:麻婆豆腐");
        assert_eq!(mock.calls(), vec![LookupCall::new(Strategy::Summary, "zh", "麻婆豆腐")]);
    }

    #[tokio::test]
    async fn strategies_exhausted_before_next_candidate() {
        let mock = Arc::new(MockLookup::new().on_page_images("zh", "麻婆豆腐（菜肴）", "https://a/pi.jpg"));
        let chain = PrimaryChain::new(mock.clone());

        let result = chain.resolve(&candidates()).await.unwrap();

        assert_eq!(result.meta, "zh:麻婆豆腐（菜肴）");
        assert_eq!(
            mock.calls(),
            vec![
                LookupCall::new(Strategy::Summary, "zh", "麻婆豆腐"),
                LookupCall::new(Strategy::MediaList, "zh", "麻婆豆腐"),
                LookupCall::new(Strategy::PageImages, "zh", "麻婆豆腐"),
                LookupCall::new(Strategy::Summary, "zh", "麻婆豆腐（菜肴）"),
                LookupCall::new(Strategy::MediaList, "zh", "麻婆豆腐（菜肴）"),
                LookupCall::new(Strategy::PageImages, "zh", "麻婆豆腐（菜肴）"),
            ]
        );
    }

    #[tokio::test]
    async fn errors_are_treated_as_no_result() {
        let mock = Arc::new(
            MockLookup::new()
                .fail_summary("zh", "麻婆豆腐")
                .on_media_list("zh", "麻婆豆腐", "https://a/media.png"),
        );
        let chain = PrimaryChain::new(mock.clone());

        let result = chain.resolve(&candidates()).await.unwrap();

        assert_eq!(result.url, "https://a/media.png");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_chain_returns_none() {
        let mock = Arc::new(MockLookup::new());
        let chain = PrimaryChain::new(mock.clone());

        assert!(chain.resolve(&candidates()).await.is_none());
        assert_eq!(mock.calls().len(), 9);
    }
}
