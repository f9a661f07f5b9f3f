//! The `beverage` resource.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::client::BeverageClient;
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::types::BeverageState;

/// Type name of the beverage resource.
pub const BEVERAGE_RESOURCE: &str = "beverage";

/// CRUD handler for the `beverage` resource.
///
/// Receives its client at construction; see
/// [`BeverageProvider::resource`](crate::provider::BeverageProvider::resource).
#[derive(Debug, Clone)]
pub struct BeverageResource {
    client: Arc<BeverageClient>,
}

impl BeverageResource {
    /// Create a handler backed by `client`.
    pub fn new(client: Arc<BeverageClient>) -> Self {
        Self { client }
    }

    /// Schema of the resource.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("A beverage managed through the Beverage API.")
            .with_attribute(
                "id",
                Attribute::computed_int64().with_description("ID of the beverage."),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Name of the beverage."),
            )
            .with_attribute(
                "type",
                Attribute::required_string().with_description("Type of the beverage."),
            )
    }

    /// Create the beverage and record the id the API assigned.
    #[instrument(skip(self, planned), fields(name = %planned.name))]
    pub async fn create(&self, planned: BeverageState) -> Result<BeverageState, ProviderError> {
        require_fields(&planned)?;
        let beverage = self
            .client
            .create(&planned.name, &planned.beverage_type)
            .await?;
        info!(id = beverage.id, "Beverage resource created");
        Ok(beverage.into())
    }

    /// Refresh state from the API. `None` means the beverage is gone.
    #[instrument(skip(self, current), fields(id = ?current.id))]
    pub async fn read(
        &self,
        current: BeverageState,
    ) -> Result<Option<BeverageState>, ProviderError> {
        let id = require_id(&current)?;
        match self.client.get(id).await {
            Ok(beverage) => Ok(Some(beverage.into())),
            Err(err) if err.is_not_found() => {
                warn!(id, "Beverage no longer exists, removing from state");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply the planned name and type to the existing beverage.
    #[instrument(skip(self, prior, planned), fields(id = ?prior.id))]
    pub async fn update(
        &self,
        prior: BeverageState,
        planned: BeverageState,
    ) -> Result<BeverageState, ProviderError> {
        let id = require_id(&prior)?;
        require_fields(&planned)?;
        let beverage = self
            .client
            .update(id, &planned.name, &planned.beverage_type)
            .await?;
        info!(id = beverage.id, "Beverage resource updated");
        Ok(beverage.into())
    }

    /// Delete the beverage. A beverage that is already gone counts as deleted.
    #[instrument(skip(self, current), fields(id = ?current.id))]
    pub async fn delete(&self, current: BeverageState) -> Result<(), ProviderError> {
        let id = require_id(&current)?;
        match self.client.delete(id).await {
            Ok(()) => {
                info!(id, "Beverage resource deleted");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Beverage already deleted");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Import an existing beverage by its id, given as text.
    #[instrument(skip(self))]
    pub async fn import(&self, id: &str) -> Result<BeverageState, ProviderError> {
        let id: i64 = id.trim().parse().map_err(|_| {
            ProviderError::Validation(format!("Import id must be an integer, got '{}'", id))
        })?;
        match self.client.get(id).await {
            Ok(beverage) => Ok(beverage.into()),
            Err(err) if err.is_not_found() => {
                Err(ProviderError::NotFound(format!("beverage {}", id)))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn require_id(state: &BeverageState) -> Result<i64, ProviderError> {
    state
        .id
        .ok_or_else(|| ProviderError::Validation("Beverage state has no 'id'".to_string()))
}

fn require_fields(state: &BeverageState) -> Result<(), ProviderError> {
    if state.name.trim().is_empty() {
        return Err(ProviderError::Validation(
            "'name' must not be empty".to_string(),
        ));
    }
    if state.beverage_type.trim().is_empty() {
        return Err(ProviderError::Validation(
            "'type' must not be empty".to_string(),
        ));
    }
    Ok(())
}
