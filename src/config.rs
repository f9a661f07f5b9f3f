//! Provider configuration.
//!
//! The host passes the provider block as JSON. When the block leaves
//! `base_url` unset, [`BeverageProvider`](crate::BeverageProvider) supplies
//! the `BEVERAGE_BASE_URL` value it captured at construction through
//! [`ProviderConfig::with_base_url_fallback`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::BeverageClient;
use crate::error::ProviderError;
use crate::schema::Diagnostic;

/// Environment variable used when `base_url` is not configured.
pub const BASE_URL_ENV: &str = "BEVERAGE_BASE_URL";

/// Settings from the provider configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// Root address of the Beverage API.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout for the HTTP transport. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Parse the provider configuration. `null` yields an empty config.
    pub fn from_value(config: Value) -> Result<Self, ProviderError> {
        if config.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(config)?)
    }

    /// Use `fallback` as the base URL when none is configured.
    pub fn with_base_url_fallback(mut self, fallback: Option<String>) -> Self {
        if self.base_url.is_none() {
            self.base_url = fallback;
        }
        self
    }

    /// Check the settings and report problems as diagnostics.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        match self.base_url.as_deref().map(str::trim) {
            None | Some("") => diagnostics.push(
                Diagnostic::error("Missing Configuration")
                    .with_detail(format!(
                        "The 'base_url' must be provided, either in the provider block or via {}.",
                        BASE_URL_ENV
                    ))
                    .with_attribute("base_url"),
            ),
            Some(url) => {
                if let Err(err) = BeverageClient::new(url) {
                    diagnostics.push(
                        Diagnostic::error("Invalid base URL")
                            .with_detail(err.to_string())
                            .with_attribute("base_url"),
                    );
                }
            }
        }

        if self.timeout_secs == Some(0) {
            diagnostics.push(
                Diagnostic::error("Invalid timeout")
                    .with_detail("'timeout_secs' must be greater than zero.")
                    .with_attribute("timeout_secs"),
            );
        }

        diagnostics
    }

    /// Build a client from these settings.
    pub fn build_client(&self) -> Result<BeverageClient, ProviderError> {
        let base_url = self.base_url.as_deref().ok_or_else(|| {
            ProviderError::Configuration("The 'base_url' must be provided.".into())
        })?;
        let client = match self.timeout_secs {
            Some(secs) => BeverageClient::with_timeout(base_url, Duration::from_secs(secs))?,
            None => BeverageClient::new(base_url)?,
        };
        Ok(client)
    }
}
