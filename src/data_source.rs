//! Read-only data sources: a single `beverage` by id, and all `beverages`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::BeverageClient;
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};
use crate::types::{BeverageListState, BeverageState};

/// Type name of the single-beverage data source.
pub const BEVERAGE_DATA_SOURCE: &str = "beverage";

/// Type name of the beverage list data source.
pub const BEVERAGES_DATA_SOURCE: &str = "beverages";

#[derive(Debug, Deserialize)]
struct BeverageLookup {
    #[serde(default)]
    id: Option<i64>,
}

/// Looks up one beverage by id.
#[derive(Debug, Clone)]
pub struct BeverageDataSource {
    client: Arc<BeverageClient>,
}

impl BeverageDataSource {
    /// Create a data source backed by `client`.
    pub fn new(client: Arc<BeverageClient>) -> Self {
        Self { client }
    }

    /// Schema of the data source.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "id",
                Attribute::required_int64().with_description("ID of the beverage to fetch."),
            )
            .with_attribute(
                "name",
                Attribute::computed_string().with_description("Name of the beverage."),
            )
            .with_attribute(
                "type",
                Attribute::computed_string().with_description("Type of the beverage."),
            )
    }

    /// Fetch the beverage named by `config.id`.
    #[instrument(skip(self, config))]
    pub async fn read(&self, config: serde_json::Value) -> Result<BeverageState, ProviderError> {
        let lookup: BeverageLookup = serde_json::from_value(config)?;
        let id = lookup
            .id
            .ok_or_else(|| ProviderError::Validation("'id' is required".to_string()))?;
        match self.client.get(id).await {
            Ok(beverage) => Ok(beverage.into()),
            Err(err) if err.is_not_found() => {
                Err(ProviderError::NotFound(format!("beverage {}", id)))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Lists every beverage the API knows about.
#[derive(Debug, Clone)]
pub struct BeveragesDataSource {
    client: Arc<BeverageClient>,
}

impl BeveragesDataSource {
    /// Create a data source backed by `client`.
    pub fn new(client: Arc<BeverageClient>) -> Self {
        Self { client }
    }

    /// Schema of the data source.
    pub fn schema() -> Schema {
        let beverage = AttributeType::object([
            ("id", AttributeType::Int64),
            ("name", AttributeType::String),
            ("type", AttributeType::String),
        ]);
        Schema::v0().with_attribute(
            "beverages",
            Attribute::new(AttributeType::list(beverage), AttributeFlags::computed())
                .with_description("All beverages, in the order the API returns them."),
        )
    }

    /// Fetch all beverages.
    #[instrument(skip(self))]
    pub async fn read(&self) -> Result<BeverageListState, ProviderError> {
        let beverages = self.client.list().await?;
        debug!(count = beverages.len(), "Beverages data source read");
        Ok(BeverageListState { beverages })
    }
}
