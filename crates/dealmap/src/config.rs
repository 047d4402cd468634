use crate::error::{Error, Result};

/// Default Dealmap API base URL
pub const DEFAULT_BASE_URL: &str = "http://api.thedealmap.com";

pub const API_KEY_VAR: &str = "DEALMAP_API_KEY";
pub const BASE_URL_VAR: &str = "DEALMAP_BASE_URL";

/// Settings needed to build a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Transport to use instead of a default `reqwest::Client`, e.g. one with
    /// timeouts or a proxy configured.
    pub http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: None,
        }
    }

    /// Load configuration from environment variables
    /// Uses DEALMAP_API_KEY (required)
    /// Uses DEALMAP_BASE_URL with default fallback
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| Error::MissingApiKey)?;

        Ok(Self {
            base_url: std::env::var(BASE_URL_VAR)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ..Self::new(api_key)
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(key) = api_key {
            self.api_key = key;
        }
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("http_client", &self.http_client)
            .finish()
    }
}
