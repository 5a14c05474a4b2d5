//! Injected configuration: service location and the town catalogue.

use crate::error::{CampaignError, Result};

/// Default location of the campaign service.
pub const DEFAULT_BASE_URL: &str = "https://crud-app-backend-nine.vercel.app";

/// Towns a campaign may target unless configured otherwise.
pub const DEFAULT_TOWNS: [&str; 5] = ["Krakow", "Warszawa", "Gdansk", "Wroclaw", "Katowice"];

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "CAMPAIGNS_API_URL";

/// Environment variable overriding the town list (comma-separated).
pub const TOWNS_ENV: &str = "CAMPAIGNS_TOWNS";

/// Runtime configuration shared by the client and the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the campaign service, without a trailing slash.
    base_url: String,
    /// Closed set of towns a campaign may target.
    towns: Vec<String>,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            towns: DEFAULT_TOWNS.iter().map(|&town| town.to_owned()).collect(),
        }
    }
}

impl Config {
    /// Builds a configuration from `CAMPAIGNS_API_URL` and
    /// `CAMPAIGNS_TOWNS`, falling back to the defaults for unset or empty
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::Config`] if the base URL is not an
    /// absolute `http`/`https` URL or the town list has no entries.
    #[inline]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = read_var(BASE_URL_ENV) {
            config = config.with_base_url(url)?;
        }
        if let Some(raw) = read_var(TOWNS_ENV) {
            config = config.with_towns(raw.split(','))?;
        }
        tracing::debug!(base_url = %config.base_url, towns = config.towns.len(), "configuration loaded");
        Ok(config)
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::Config`] if the URL does not parse or is
    /// not `http`/`https`.
    #[inline]
    pub fn with_base_url<T: Into<String>>(mut self, url: T) -> Result<Self> {
        let raw = url.into();
        let parsed = url::Url::parse(raw.trim())
            .map_err(|err| CampaignError::Config(format!("base URL {raw:?}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CampaignError::Config(format!(
                "base URL {raw:?} must use http or https"
            )));
        }
        self.base_url = raw.trim().trim_end_matches('/').to_owned();
        Ok(self)
    }

    /// Replaces the town catalogue. Entries are trimmed and blanks are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::Config`] if no town remains.
    #[inline]
    pub fn with_towns<I, T>(mut self, towns: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let towns: Vec<String> = towns
            .into_iter()
            .map(|town| town.as_ref().trim().to_owned())
            .filter(|town| !town.is_empty())
            .collect();
        if towns.is_empty() {
            return Err(CampaignError::Config("town list is empty".to_owned()));
        }
        self.towns = towns;
        Ok(self)
    }

    /// Returns the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured towns in display order.
    #[inline]
    #[must_use]
    pub fn towns(&self) -> &[String] {
        &self.towns
    }
}

/// Reads a non-empty environment variable.
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
