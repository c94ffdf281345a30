//! Client configuration.

use tracing::warn;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_REST_BASE_URL: &str = "https://graph.facebook.com/v2.7";

const ENV_REST_BASE_URL: &str = "FBGRAPH_REST_BASE_URL";
const ENV_JSON_STORE_ENABLED: &str = "FBGRAPH_JSON_STORE_ENABLED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    rest_base_url: Url,
    json_store_enabled: bool,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Read `FBGRAPH_REST_BASE_URL` and `FBGRAPH_JSON_STORE_ENABLED`, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigurationBuilder::new();
        if let Some(url) = lookup(ENV_REST_BASE_URL) {
            builder = builder.rest_base_url(&url);
        }
        if let Some(raw) = lookup(ENV_JSON_STORE_ENABLED) {
            let enabled = raw.trim().parse().unwrap_or_else(|_| {
                warn!("ignoring {ENV_JSON_STORE_ENABLED}={raw:?}: expected true or false");
                false
            });
            builder = builder.json_store_enabled(enabled);
        }
        builder.build()
    }

    /// Base URL every request path is appended to, without a trailing `/`.
    pub fn rest_base_url(&self) -> &str {
        self.rest_base_url.as_str().trim_end_matches('/')
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.rest_base_url
    }

    pub fn json_store_enabled(&self) -> bool {
        self.json_store_enabled
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    rest_base_url: String,
    json_store_enabled: bool,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self {
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            json_store_enabled: false,
        }
    }

    pub fn rest_base_url(mut self, url: &str) -> Self {
        self.rest_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn json_store_enabled(mut self, enabled: bool) -> Self {
        self.json_store_enabled = enabled;
        self
    }

    /// Fails when the base URL does not parse or cannot carry a path.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        let rest_base_url = Url::parse(&self.rest_base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.rest_base_url.clone(),
            source,
        })?;
        if rest_base_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(self.rest_base_url));
        }
        Ok(Configuration {
            rest_base_url,
            json_store_enabled: self.json_store_enabled,
        })
    }
}
