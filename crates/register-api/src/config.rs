//! # API Configuration
//!
//! Where the purchase endpoint lives and how long to wait for it.
//!
//! The base URL is injected at run time (config file or
//! `REGISTER_API_ENDPOINT`, see the app's `RegisterConfig`). The purchase
//! URL is `<base>/purchase`; a trailing slash on the base is tolerated.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Path appended to the API base for purchase submissions.
pub const PURCHASE_PATH: &str = "purchase";

/// Purchase endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL, e.g. `https://api.example.com/v1`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `endpoint` with the default timeout.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        ApiConfig {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves `<base>/purchase`.
    ///
    /// ## Example
    /// ```rust
    /// use register_api::ApiConfig;
    ///
    /// let config = ApiConfig::with_endpoint("https://api.example.com/v1/");
    /// assert_eq!(
    ///     config.purchase_url().unwrap().as_str(),
    ///     "https://api.example.com/v1/purchase"
    /// );
    /// ```
    pub fn purchase_url(&self) -> ApiResult<Url> {
        let base = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::MissingEndpoint)?;

        let url = Url::parse(&format!(
            "{}/{}",
            base.trim_end_matches('/'),
            PURCHASE_PATH
        ))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::InvalidEndpoint(format!(
                "scheme must be http or https, got: {}",
                other
            ))),
        }
    }

    /// Validates the settings without building a client.
    pub fn validate(&self) -> ApiResult<()> {
        if self.endpoint.is_some() {
            self.purchase_url()?;
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidEndpoint(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
