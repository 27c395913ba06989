use std::fmt;

use serde::{Deserialize, Serialize};

/// One `(title, language)` attempt against the primary provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub title: String,
    pub lang: String,
}

impl TitleCandidate {
    pub fn new(title: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lang: lang.into(),
        }
    }
}

impl fmt::Display for TitleCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lang, self.title)
    }
}

/// Which provider produced an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Primary,
    Secondary,
}

impl ImageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSource::Primary => "primary",
            ImageSource::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved remote image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub url: String,
    pub source: ImageSource,
    /// `lang:title` for primary hits, the query text for secondary hits.
    pub meta: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Already mapped and the file is on disk.
    Exists,
    Downloaded,
    NotFound,
    DownloadFailed,
}

impl OutcomeStatus {
    pub const ALL: [OutcomeStatus; 4] = [
        OutcomeStatus::Exists,
        OutcomeStatus::Downloaded,
        OutcomeStatus::NotFound,
        OutcomeStatus::DownloadFailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Exists => "exists",
            OutcomeStatus::Downloaded => "downloaded",
            OutcomeStatus::NotFound => "not_found",
            OutcomeStatus::DownloadFailed => "download_failed",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, OutcomeStatus::Exists | OutcomeStatus::Downloaded)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub name: String,
    pub status: OutcomeStatus,
    /// `cache`, `primary`, `secondary` or `none`.
    pub source: String,
    pub meta: String,
    pub asset_path: String,
    pub error: String,
}

impl OutcomeRecord {
    pub fn exists(name: &str, asset_path: &str) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::Exists,
            source: "cache".to_string(),
            meta: String::new(),
            asset_path: asset_path.to_string(),
            error: String::new(),
        }
    }

    pub fn downloaded(name: &str, image: &ImageResult, asset_path: &str) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::Downloaded,
            source: image.source.to_string(),
            meta: image.meta.clone(),
            asset_path: asset_path.to_string(),
            error: String::new(),
        }
    }

    pub fn not_found(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::NotFound,
            source: "none".to_string(),
            meta: String::new(),
            asset_path: String::new(),
            error: String::new(),
        }
    }

    pub fn download_failed(name: &str, image: &ImageResult, error: &str) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::DownloadFailed,
            source: image.source.to_string(),
            meta: image.meta.clone(),
            asset_path: String::new(),
            error: error.to_string(),
        }
    }
}
