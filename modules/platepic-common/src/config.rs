use std::env;

use bing_image_client::SearchOptions;
use tracing::info;

use crate::error::PlatepicError;

const SAFE_SEARCH_LEVELS: [&str; 3] = ["Off", "Moderate", "Strict"];

/// Provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bing subscription key. `None` disables the secondary provider.
    pub bing_api_key: Option<String>,
    pub bing_market: String,
    pub bing_safe_search: String,
    pub bing_license: String,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = SearchOptions::default();
        Self {
            bing_api_key: None,
            bing_market: defaults.market,
            bing_safe_search: defaults.safe_search,
            bing_license: defaults.license,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, PlatepicError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlatepicError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            bing_api_key: var("BING_IMAGE_KEY"),
            bing_market: var("BING_MARKET").unwrap_or(defaults.bing_market),
            bing_safe_search: var("BING_SAFE_SEARCH").unwrap_or(defaults.bing_safe_search),
            bing_license: var("BING_LICENSE").unwrap_or(defaults.bing_license),
        };

        if !SAFE_SEARCH_LEVELS.contains(&config.bing_safe_search.as_str()) {
            return Err(PlatepicError::Config(format!(
                "BING_SAFE_SEARCH must be one of {SAFE_SEARCH_LEVELS:?}, got {:?}",
                config.bing_safe_search
            )));
        }

        Ok(config)
    }

    pub fn bing_enabled(&self) -> bool {
        self.bing_api_key.is_some()
    }

    pub fn bing_search_options(&self) -> SearchOptions {
        SearchOptions {
            market: self.bing_market.clone(),
            safe_search: self.bing_safe_search.clone(),
            license: self.bing_license.clone(),
            ..SearchOptions::default()
        }
    }

    /// Log the effective configuration without the credential.
    pub fn log_redacted(&self) {
        info!(
            bing_enabled = self.bing_enabled(),
            market = self.bing_market.as_str(),
            safe_search = self.bing_safe_search.as_str(),
            license = self.bing_license.as_str(),
            "Loaded provider config"
        );
    }
}
