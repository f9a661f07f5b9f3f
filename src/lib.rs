//! Beverage Provider
//!
//! Provider core for managing beverage records through the Beverage REST API.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **BeverageClient**: a stateless JSON-over-HTTP client for
//!   `{base_url}/beverages[/{id}]` with typed errors per failure kind
//! - **ProviderService trait**: the surface a host calls for schema,
//!   configuration, resource CRUD, import, and data source reads
//! - **BeverageProvider**: the `beverage` resource and the `beverage` /
//!   `beverages` data sources, wired to a configured client
//! - **Schema types**: declarations of provider, resource, and data source attributes
//! - **Logging**: `tracing` setup writing to stderr
//!
//! # Quick Start
//!
//! ```no_run
//! use beverage_provider::{BeverageProvider, ProviderService};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), beverage_provider::ProviderError> {
//! let provider = BeverageProvider::new();
//! provider.configure(json!({"base_url": "http://api.local"})).await?;
//!
//! let state = provider
//!     .create("beverage", json!({"name": "Latte", "type": "coffee"}))
//!     .await?;
//! assert_eq!(state["name"], "Latte");
//! # Ok(())
//! # }
//! ```
//!
//! # HTTP Surface
//!
//! | Operation | Method | Path | Success |
//! |---|---|---|---|
//! | create | POST | `/beverages` | 201 |
//! | get | GET | `/beverages/{id}` | 200 |
//! | list | GET | `/beverages` | 200 |
//! | update | PUT | `/beverages/{id}` | 200 |
//! | delete | DELETE | `/beverages/{id}` | 200 |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod data_source;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;

// Re-export main types at crate root
pub use client::BeverageClient;
pub use config::{ProviderConfig, BASE_URL_ENV};
pub use error::{ClientError, Operation, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{BeverageProvider, PROVIDER_TYPE_NAME};
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{Beverage, BeverageRequest, BeverageState, ImportedResource, ProviderMetadata};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
