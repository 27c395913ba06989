//! Per-dish resolution loop.
//!
//! For each name: cache check → Wikipedia chain → Bing fallback → download
//! → outcome record. Names are processed one at a time; the mapping and
//! report are only written once the loop finishes.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use platepic_common::{ImageResult, OutcomeRecord, PlatepicError};
use tracing::{info, warn};

use crate::aliases::AliasResolver;
use crate::cache::CacheStore;
use crate::downloader::local_file_name;
use crate::providers::{PrimaryChain, SecondaryChain};
use crate::report::{ReportGenerator, ReportPaths, RunSummary};
use crate::traits::ImageDownloader;

/// Where the run reads and writes, all relative to `root` unless absolute.
#[derive(Debug, Clone)]
pub struct FetchPaths {
    pub root: PathBuf,
    pub mapping: PathBuf,
    pub image_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl FetchPaths {
    pub fn under(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            mapping: PathBuf::from("assets/recipes/images.json"),
            image_dir: PathBuf::from("assets/images"),
            report_dir: PathBuf::from("assets/recipes/reports"),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

pub struct FetchOutcome {
    pub summary: RunSummary,
    pub report: ReportPaths,
    pub mapping_size: usize,
}

pub struct ImageFetcher {
    aliases: AliasResolver,
    primary: PrimaryChain,
    secondary: SecondaryChain,
    downloader: Arc<dyn ImageDownloader>,
    paths: FetchPaths,
    /// Pause after each successful download.
    download_delay: Duration,
}

impl ImageFetcher {
    pub fn new(
        aliases: AliasResolver,
        primary: PrimaryChain,
        secondary: SecondaryChain,
        downloader: Arc<dyn ImageDownloader>,
        paths: FetchPaths,
    ) -> Self {
        Self {
            aliases,
            primary,
            secondary,
            downloader,
            paths,
            download_delay: Duration::from_millis(400),
        }
    }

    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }

    /// Process every name, then flush the mapping and the report.
    pub async fn run(&self, names: &[String]) -> Result<FetchOutcome, PlatepicError> {
        let mut cache = CacheStore::load(&self.paths.root, &self.paths.resolve(&self.paths.mapping));
        let mut report = ReportGenerator::new();

        info!(
            names = names.len(),
            secondary = self.secondary.is_enabled(),
            "Starting image fetch"
        );

        for name in names {
            let record = self.process(name, &mut cache).await;
            report.record(record);
        }

        cache.flush()?;
        let paths = report.write(&self.paths.resolve(&self.paths.report_dir))?;
        let summary = report.summary();
        info!(mapping_size = cache.len(), %summary, "Image fetch complete");

        Ok(FetchOutcome {
            summary,
            report: paths,
            mapping_size: cache.len(),
        })
    }

    async fn process(&self, name: &str, cache: &mut CacheStore) -> OutcomeRecord {
        if cache.is_resolved(name) {
            let existing = cache.get(name).unwrap_or_default();
            info!(name, path = existing, "Already cached, skipping");
            return OutcomeRecord::exists(name, existing);
        }

        let Some(image) = self.resolve(name).await else {
            warn!(name, "No image found");
            return OutcomeRecord::not_found(name);
        };

        let file_name = local_file_name(name, &image.url);
        let rel_path = self.paths.image_dir.join(&file_name);
        let rel_display = rel_path_string(&rel_path);

        info!(name, url = image.url.as_str(), path = rel_display.as_str(), "Downloading");
        match self
            .downloader
            .download(&image.url, &self.paths.resolve(&rel_path))
            .await
        {
            Ok(_) => {
                cache.put(name, &rel_display);
                tokio::time::sleep(self.download_delay).await;
                OutcomeRecord::downloaded(name, &image, &rel_display)
            }
            Err(e) => {
                warn!(name, url = image.url.as_str(), error = %e, "Download failed");
                OutcomeRecord::download_failed(name, &image, &e.to_string())
            }
        }
    }

    async fn resolve(&self, name: &str) -> Option<ImageResult> {
        let candidates = self.aliases.candidates(name);
        if let Some(image) = self.primary.resolve(&candidates).await {
            return Some(image);
        }
        self.secondary.resolve(name).await
    }
}

/// Mapping values always use `/`, whatever the host separator.
fn rel_path_string(path: &Path) -> String {
    let joined = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if path.has_root() {
        format!("/{joined}")
    } else {
        joined
    }
}
