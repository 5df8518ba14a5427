//! Process configuration.
//!
//! All settings come from the environment with the `MASTHEAD_` prefix
//! (e.g. `MASTHEAD_SERVICE_DOMAIN`, `MASTHEAD_API_KEY`). The service domain
//! and API key are required; everything else has a default.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Runtime settings for the site server.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Content source service identifier: `https://<domain>.microcms.io`.
    pub service_domain: String,

    /// API key sent with every content request.
    pub api_key: String,

    /// Socket address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Revalidation window for the listing page, in seconds.
    #[serde(default = "default_revalidate_secs")]
    pub home_revalidate_secs: u64,

    /// Revalidation window for article detail pages, in seconds.
    #[serde(default = "default_revalidate_secs")]
    pub article_revalidate_secs: u64,

    /// Number of articles shown on the listing page.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,

    /// How many of the most recent articles are pre-rendered at startup.
    #[serde(default = "default_prerender_cap")]
    pub prerender_cap: usize,

    /// Timeout for a single content-source request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_revalidate_secs() -> u64 {
    60
}

fn default_listing_limit() -> usize {
    9
}

fn default_prerender_cap() -> usize {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Settings {
    /// Load settings from `MASTHEAD_`-prefixed environment variables.
    ///
    /// Fails with a configuration error when the service domain or API key is
    /// missing, before any network call is attempted.
    pub fn from_env() -> Result<Self> {
        let loaded = config::Config::builder()
            .add_source(config::Environment::with_prefix("MASTHEAD"))
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        let settings: Settings = loaded
            .try_deserialize()
            .map_err(|e| Error::config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the loaded settings.
    pub fn validate(&self) -> Result<()> {
        if self.service_domain.is_empty() {
            return Err(Error::config("service_domain must not be empty"));
        }
        if self.api_key.is_empty() {
            return Err(Error::config("api_key must not be empty"));
        }
        if self.listing_limit == 0 {
            return Err(Error::config("listing_limit must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
