// Trait seams for everything that touches the network.
//
// PageImageLookup — the three Wikipedia lookups behind the primary chain.
// ImageSearch — the Bing image search behind the secondary chain.
// ImageDownloader — streaming a resolved URL to disk.
//
// The real clients implement these directly; `testing` provides recording
// mocks so the pipeline runs without network access.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use bing_image_client::{BingImageClient, ImageHit};
use platepic_common::PlatepicError;
use wikipedia_client::{MediaListResponse, PageImagesResponse, SummaryResponse, WikipediaClient};

#[async_trait]
pub trait PageImageLookup: Send + Sync {
    /// REST page summary for `title` on the `lang` wiki.
    async fn summary(&self, title: &str, lang: &str) -> Result<SummaryResponse>;

    /// REST media list for `title` on the `lang` wiki.
    async fn media_list(&self, title: &str, lang: &str) -> Result<MediaListResponse>;

    /// Action API `pageimages` query for `title` on the `lang` wiki.
    async fn page_images(&self, title: &str, lang: &str) -> Result<PageImagesResponse>;
}

#[async_trait]
impl PageImageLookup for WikipediaClient {
    async fn summary(&self, title: &str, lang: &str) -> Result<SummaryResponse> {
        Ok(self.summary(title, lang).await?)
    }

    async fn media_list(&self, title: &str, lang: &str) -> Result<MediaListResponse> {
        Ok(self.media_list(title, lang).await?)
    }

    async fn page_images(&self, title: &str, lang: &str) -> Result<PageImagesResponse> {
        Ok(self.page_images(title, lang).await?)
    }
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ImageHit>>;
}

#[async_trait]
impl ImageSearch for BingImageClient {
    async fn search(&self, query: &str) -> Result<Vec<ImageHit>> {
        Ok(self.search(query).await?)
    }
}

#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// Write the body at `url` to `dest`, returning the byte count.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, PlatepicError>;
}
