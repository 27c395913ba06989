//! Test harness for pipeline tests.
//!
//! Builds an `ImageFetcher` over a temp project root with mock providers and a
//! mock downloader. No network, no real images.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use platepic_fetcher::aliases::{AliasConfig, AliasResolver};
use platepic_fetcher::fetcher::{FetchPaths, ImageFetcher};
use platepic_fetcher::providers::{PrimaryChain, SecondaryChain};
use platepic_fetcher::testing::{MockDownloader, MockLookup, MockSearch};
use platepic_fetcher::traits::ImageSearch;
use tempfile::TempDir;

/// Owns the temp project root and the mocks for the lifetime of a test.
pub struct TestProject {
    pub dir: TempDir,
    pub lookup: Arc<MockLookup>,
    pub search: Option<Arc<MockSearch>>,
    pub downloader: Arc<MockDownloader>,
}

impl TestProject {
    pub fn new(lookup: MockLookup, search: Option<MockSearch>, downloader: MockDownloader) -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            lookup: Arc::new(lookup),
            search: search.map(Arc::new),
            downloader: Arc::new(downloader),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Fresh fetcher over the same root and mocks, as a new process run would be.
    pub fn fetcher(&self) -> ImageFetcher {
        let search = self
            .search
            .clone()
            .map(|s| s as Arc<dyn ImageSearch>);
        ImageFetcher::new(
            AliasResolver::new(AliasConfig::default()),
            PrimaryChain::new(self.lookup.clone()),
            SecondaryChain::new(search),
            self.downloader.clone(),
            FetchPaths::under(self.root()),
        )
        .with_download_delay(Duration::ZERO)
    }

    pub fn mapping(&self) -> BTreeMap<String, String> {
        let text = std::fs::read_to_string(self.root().join("assets/recipes/images.json"))
            .expect("mapping written");
        serde_json::from_str(&text).expect("mapping is a JSON object")
    }

    pub fn report_csv(&self) -> String {
        std::fs::read_to_string(self.root().join("assets/recipes/reports/report.csv"))
            .expect("report written")
    }

    /// Total lookups + searches + downloads issued so far.
    pub fn network_calls(&self) -> usize {
        self.lookup.calls().len()
            + self.search.as_ref().map_or(0, |s| s.queries().len())
            + self.downloader.urls().len()
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
