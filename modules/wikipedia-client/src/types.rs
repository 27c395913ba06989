use std::collections::BTreeMap;

use serde::Deserialize;

// --- Shared shapes ---

/// An `{ "source": "..." }` image reference as used by the summary and
/// Action API responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    pub source: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRef {
    fn url(&self) -> Option<String> {
        self.source.as_deref().and_then(non_empty_url)
    }
}

// --- REST summary ---

/// Response of `GET /api/rest_v1/page/summary/{title}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    pub title: Option<String>,
    pub originalimage: Option<ImageRef>,
    pub thumbnail: Option<ImageRef>,
}

impl SummaryResponse {
    /// Full-size image first, then the thumbnail.
    pub fn image_url(&self) -> Option<String> {
        [&self.originalimage, &self.thumbnail]
            .into_iter()
            .flatten()
            .find_map(ImageRef::url)
    }
}

// --- REST media list ---

/// Response of `GET /api/rest_v1/page/media-list/{title}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaListResponse {
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    /// Ordered smallest to largest.
    pub srcset: Option<Vec<MediaSource>>,
    pub sources: Option<Vec<MediaSource>>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSource {
    pub src: Option<String>,
    pub scale: Option<String>,
}

impl MediaItem {
    pub fn is_image(&self) -> bool {
        self.item_type.as_deref() == Some("image")
    }

    /// Largest entry of `srcset` (or `sources` when `srcset` is empty),
    /// falling back to the direct `src` field.
    pub fn best_url(&self) -> Option<String> {
        let sized = [&self.srcset, &self.sources]
            .into_iter()
            .flatten()
            .find(|list| !list.is_empty());

        let largest = sized
            .and_then(|list| list.last())
            .and_then(|entry| entry.src.as_deref())
            .and_then(non_empty_url);

        largest.or_else(|| self.src.as_deref().and_then(non_empty_url))
    }
}

impl MediaListResponse {
    /// First image item that yields a URL.
    pub fn image_url(&self) -> Option<String> {
        self.items
            .iter()
            .filter(|item| item.is_image())
            .find_map(MediaItem::best_url)
    }
}

// --- Action API (prop=pageimages) ---

/// Response of `GET /w/api.php?action=query&prop=pageimages|info...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageImagesResponse {
    pub query: Option<PageImagesQuery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageImagesQuery {
    /// Keyed by page id. Missing pages come back with negative ids.
    #[serde(default)]
    pub pages: BTreeMap<String, PageImagesPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageImagesPage {
    pub title: Option<String>,
    pub original: Option<ImageRef>,
    pub thumbnail: Option<ImageRef>,
}

impl PageImagesPage {
    pub fn image_url(&self) -> Option<String> {
        [&self.original, &self.thumbnail]
            .into_iter()
            .flatten()
            .find_map(ImageRef::url)
    }
}

impl PageImagesResponse {
    /// First page carrying either an original or a thumbnail.
    pub fn image_url(&self) -> Option<String> {
        self.query
            .as_ref()?
            .pages
            .values()
            .find_map(PageImagesPage::image_url)
    }
}

/// Media-list sources are protocol-relative (`//upload.wikimedia.org/...`).
fn non_empty_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        Some(format!("https://{rest}"))
    } else {
        Some(trimmed.to_string())
    }
}
