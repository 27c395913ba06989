//! Streaming image download plus local file naming.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use platepic_common::PlatepicError;
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::traits::ImageDownloader;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)(?:\?|$)").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\p{Han}\-_.]").expect("valid regex"));

/// Image extension (with the dot) from the URL, `.jpg` when unknown.
pub fn extension_from_url(url: &str) -> String {
    EXTENSION_RE
        .captures(url)
        .map(|caps| format!(".{}", caps[1].to_lowercase()))
        .unwrap_or_else(|| ".jpg".to_string())
}

/// Filesystem-safe file stem for a dish name.
pub fn slugify(name: &str) -> String {
    let underscored = WHITESPACE_RE.replace_all(name.trim(), "_");
    let slug = UNSAFE_CHARS_RE.replace_all(&underscored, "");
    if slug.is_empty() {
        "img".to_string()
    } else {
        slug.into_owned()
    }
}

/// Local file name for a dish image, e.g. `麻婆豆腐.png`.
pub fn local_file_name(name: &str, url: &str) -> String {
    format!("{}{}", slugify(name), extension_from_url(url))
}

pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new(user_agent: &str) -> Result<Self, PlatepicError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PlatepicError::Download(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, PlatepicError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlatepicError::Download(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PlatepicError::Download(format!("HTTP {status} for {url}")));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Stream into a sibling file so `dest` only ever holds a complete body.
        let partial = dest.with_extension("part");
        let written = match write_body(resp, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, dest).await?;

        debug!(url, dest = %dest.display(), bytes = written, "Image downloaded");
        Ok(written)
    }
}

async fn write_body(resp: reqwest::Response, path: &Path) -> Result<u64, PlatepicError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| PlatepicError::Download(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
