//! Wire and state types for beverages.
//!
//! [`Beverage`] and [`BeverageRequest`] mirror the JSON exchanged with the
//! Beverage API. [`BeverageState`] is the shape of a `beverage` resource in
//! provider state, where `id` is unknown until the API assigns one.

use serde::{Deserialize, Serialize};

/// A beverage record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beverage {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name, e.g. "Latte".
    pub name: String,
    /// Classification, e.g. "coffee" or "tea".
    #[serde(rename = "type")]
    pub beverage_type: String,
}

/// Request body for create and update calls. Never carries an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeverageRequest {
    /// Display name.
    pub name: String,
    /// Classification.
    #[serde(rename = "type")]
    pub beverage_type: String,
}

impl BeverageRequest {
    /// Create a new request body.
    pub fn new(name: impl Into<String>, beverage_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            beverage_type: beverage_type.into(),
        }
    }
}

/// Provider state for a `beverage` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeverageState {
    /// Unknown (null) until the resource is created.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Classification.
    #[serde(rename = "type", default)]
    pub beverage_type: String,
}

impl From<Beverage> for BeverageState {
    fn from(beverage: Beverage) -> Self {
        Self {
            id: Some(beverage.id),
            name: beverage.name,
            beverage_type: beverage.beverage_type,
        }
    }
}

/// State of the `beverages` data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BeverageListState {
    /// All beverages, in the order the API returned them.
    pub beverages: Vec<Beverage>,
}

/// An imported resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// The resource type.
    pub resource_type: String,
    /// The imported state.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata: the resource and data source type names it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}
