pub mod aliases;
pub mod cache;
pub mod downloader;
pub mod fetcher;
pub mod names;
pub mod providers;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
