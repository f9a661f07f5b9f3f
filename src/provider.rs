//! The beverage provider.
//!
//! [`BeverageProvider`] owns the configured [`BeverageClient`] and hands it to
//! the resource and data source handlers through their constructors. Handlers
//! can only be obtained after [`configure`](ProviderService::configure) has
//! succeeded; before that the accessors return
//! [`ProviderError::Configuration`].

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::client::BeverageClient;
use crate::config::{ProviderConfig, BASE_URL_ENV};
use crate::data_source::{
    BeverageDataSource, BeveragesDataSource, BEVERAGES_DATA_SOURCE, BEVERAGE_DATA_SOURCE,
};
use crate::error::ProviderError;
use crate::resource::{BeverageResource, BEVERAGE_RESOURCE};
use crate::schema::{Attribute, Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{BeverageState, ImportedResource};

/// Type name of the provider.
pub const PROVIDER_TYPE_NAME: &str = "beverage";

/// Provider for beverages backed by the Beverage API.
#[derive(Debug)]
pub struct BeverageProvider {
    client: RwLock<Option<Arc<BeverageClient>>>,
    base_url_fallback: Option<String>,
}

impl BeverageProvider {
    /// Create an unconfigured provider. `BEVERAGE_BASE_URL` is read here and
    /// used when the configuration omits `base_url`.
    pub fn new() -> Self {
        Self {
            client: RwLock::new(None),
            base_url_fallback: std::env::var(BASE_URL_ENV).ok(),
        }
    }

    /// Create a provider that is already configured with `client`.
    pub fn with_client(client: BeverageClient) -> Self {
        Self {
            client: RwLock::new(Some(Arc::new(client))),
            base_url_fallback: None,
        }
    }

    /// Replace the fallback base URL.
    pub fn with_base_url_fallback(mut self, fallback: Option<String>) -> Self {
        self.base_url_fallback = fallback;
        self
    }

    /// The configured client.
    pub async fn client(&self) -> Result<Arc<BeverageClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "Provider has not been configured; call configure before using resources"
                    .to_string(),
            )
        })
    }

    /// Handler for the `beverage` resource.
    pub async fn resource(&self) -> Result<BeverageResource, ProviderError> {
        Ok(BeverageResource::new(self.client().await?))
    }

    /// Handler for the `beverage` data source.
    pub async fn beverage_data_source(&self) -> Result<BeverageDataSource, ProviderError> {
        Ok(BeverageDataSource::new(self.client().await?))
    }

    /// Handler for the `beverages` data source.
    pub async fn beverages_data_source(&self) -> Result<BeveragesDataSource, ProviderError> {
        Ok(BeveragesDataSource::new(self.client().await?))
    }

    fn resolve_config(&self, config: Value) -> Result<ProviderConfig, ProviderError> {
        Ok(ProviderConfig::from_value(config)?
            .with_base_url_fallback(self.base_url_fallback.clone()))
    }

    async fn resource_for(&self, resource_type: &str) -> Result<BeverageResource, ProviderError> {
        if resource_type != BEVERAGE_RESOURCE {
            return Err(ProviderError::UnknownResource(resource_type.to_string()));
        }
        self.resource().await
    }
}

impl Default for BeverageProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn provider_config_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "base_url",
            Attribute::optional_string().with_description(format!(
                "Base URL for the Beverage API. Defaults to the {} environment variable.",
                BASE_URL_ENV
            )),
        )
        .with_attribute(
            "timeout_secs",
            Attribute::optional_int64()
                .with_description("Request timeout in seconds. No timeout when unset."),
        )
}

fn parse_state(state: Value) -> Result<BeverageState, ProviderError> {
    Ok(serde_json::from_value(state)?)
}

fn to_value(state: BeverageState) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(state)?)
}

#[async_trait::async_trait]
impl ProviderService for BeverageProvider {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new()
            .with_provider_config(provider_config_schema())
            .with_resource(BEVERAGE_RESOURCE, BeverageResource::schema())
            .with_data_source(BEVERAGE_DATA_SOURCE, BeverageDataSource::schema())
            .with_data_source(BEVERAGES_DATA_SOURCE, BeveragesDataSource::schema())
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.resolve_config(config)?.validate())
    }

    #[instrument(skip(self, config), name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = self.resolve_config(config)?;
        let diagnostics = config.validate();
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(
                diagnostics = diagnostics.len(),
                "Configure completed with errors"
            );
            return Ok(diagnostics);
        }

        let client = config.build_client()?;
        info!(base_url = %client.base_url(), "Configure completed successfully");
        *self.client.write().await = Some(Arc::new(client));
        Ok(diagnostics)
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource_for(resource_type).await?;
        let state = resource.create(parse_state(planned_state)?).await?;
        to_value(state)
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        let resource = self.resource_for(resource_type).await?;
        resource
            .read(parse_state(current_state)?)
            .await?
            .map(to_value)
            .transpose()
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource_for(resource_type).await?;
        let state = resource
            .update(parse_state(prior_state)?, parse_state(planned_state)?)
            .await?;
        to_value(state)
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.resource_for(resource_type).await?;
        resource.delete(parse_state(current_state)?).await
    }

    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource_for(resource_type).await?;
        let state = resource.import(id).await?;
        Ok(vec![ImportedResource::new(resource_type, to_value(state)?)])
    }

    #[instrument(skip(self, config), name = "provider.read_data_source")]
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        match data_source_type {
            BEVERAGE_DATA_SOURCE => {
                to_value(self.beverage_data_source().await?.read(config).await?)
            }
            BEVERAGES_DATA_SOURCE => Ok(serde_json::to_value(
                self.beverages_data_source().await?.read().await?,
            )?),
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }
}
