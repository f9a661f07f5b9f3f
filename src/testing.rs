//! Testing utilities for provider implementations.
//!
//! [`ProviderTester`] drives a [`ProviderService`] directly, without a host,
//! and turns error diagnostics into a [`TestError`].
//!
//! # Example
//!
//! ```ignore
//! use beverage_provider::testing::ProviderTester;
//! use beverage_provider::BeverageProvider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_beverage() {
//!     let tester = ProviderTester::new(BeverageProvider::new());
//!     tester.configure(json!({"base_url": server.url()})).await.unwrap();
//!
//!     let state = tester.create("beverage", json!({
//!         "name": "Latte",
//!         "type": "coffee"
//!     })).await.unwrap();
//!
//!     assert_eq!(state["name"], "Latte");
//! }
//! ```

use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::{Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::ImportedResource;

/// A test harness for provider implementations.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Provider Lifecycle
    // =========================================================================

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Validate provider configuration.
    ///
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    ///
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Create a new resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Read data from a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .read_data_source(data_source_type, config)
            .await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Create, then read back. Returns the state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let created = self.create(resource_type, config).await?;
        self.read_existing(resource_type, created).await
    }

    /// Update, then read back. Returns the state after read.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let updated = self
            .update(resource_type, prior_state, planned_state)
            .await?;
        self.read_existing(resource_type, updated).await
    }

    /// Delete, then confirm a read no longer finds the resource.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.delete(resource_type, current_state.clone()).await?;
        match self.read(resource_type, current_state).await? {
            None => Ok(()),
            Some(state) => Err(ProviderError::Validation(format!(
                "{} still exists after delete: {}",
                resource_type, state
            ))),
        }
    }

    async fn read_existing(
        &self,
        resource_type: &str,
        state: Value,
    ) -> Result<Value, ProviderError> {
        self.read(resource_type, state.clone())
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("{} {}", resource_type, state)))
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    writeln!(f, "  {}", diag)?;
                }
                Ok(())
            }
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| d.is_error() && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::BeverageProvider;
    use crate::schema::DiagnosticSeverity;
    use mockito::{Matcher, Server};
    use serde_json::json;

    async fn configured_tester(server: &Server) -> ProviderTester<BeverageProvider> {
        let tester = ProviderTester::new(BeverageProvider::new().with_base_url_fallback(None));
        tester
            .configure(json!({"base_url": server.url()}))
            .await
            .unwrap();
        tester
    }

    #[tokio::test]
    async fn test_configure_reports_diagnostics() {
        let tester = ProviderTester::new(BeverageProvider::new().with_base_url_fallback(None));
        match tester.configure(json!({})).await {
            Err(TestError::Diagnostics(diags)) => {
                assert_error_contains(&diags, "Missing Configuration");
            }
            other => panic!("expected diagnostics, got {other:?}"),
        }

        let err = tester
            .validate_provider_config(json!({"base_url": "gopher://api"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[tokio::test]
    async fn test_lifecycle_create() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/beverages")
            .match_body(Matcher::Json(json!({"name": "Latte", "type": "coffee"})))
            .with_status(201)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let tester = configured_tester(&server).await;
        let state = tester
            .lifecycle_create("beverage", json!({"name": "Latte", "type": "coffee"}))
            .await
            .unwrap();
        assert_eq!(state, json!({"id": 7, "name": "Latte", "type": "coffee"}));
    }

    #[tokio::test]
    async fn test_lifecycle_update() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/beverages/7")
            .match_body(Matcher::Json(json!({"name": "Cortado", "type": "espresso"})))
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Cortado","type":"espresso"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Cortado","type":"espresso"}"#)
            .create_async()
            .await;

        let tester = configured_tester(&server).await;
        let state = tester
            .lifecycle_update(
                "beverage",
                json!({"id": 7, "name": "Latte", "type": "coffee"}),
                json!({"id": 7, "name": "Cortado", "type": "espresso"}),
            )
            .await
            .unwrap();
        assert_eq!(state["name"], "Cortado");
        assert_eq!(state["type"], "espresso");
    }

    #[tokio::test]
    async fn test_lifecycle_delete() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/beverages/7")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/7")
            .with_status(404)
            .with_body("no such beverage")
            .create_async()
            .await;

        let tester = configured_tester(&server).await;
        tester
            .lifecycle_delete("beverage", json!({"id": 7, "name": "Latte", "type": "coffee"}))
            .await
            .unwrap();
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_get_update_delete_sequence() {
        let mut server = Server::new_async().await;
        let tester = configured_tester(&server).await;

        server
            .mock("POST", "/beverages")
            .with_status(201)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;
        let get_v1 = server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let created = tester
            .lifecycle_create("beverage", json!({"name": "Latte", "type": "coffee"}))
            .await
            .unwrap();
        assert_eq!(created["name"], "Latte");
        assert_eq!(created["type"], "coffee");
        get_v1.remove_async().await;

        server
            .mock("PUT", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Sencha","type":"tea"}"#)
            .create_async()
            .await;
        let get_v2 = server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Sencha","type":"tea"}"#)
            .create_async()
            .await;

        let updated = tester
            .lifecycle_update(
                "beverage",
                created,
                json!({"id": 7, "name": "Sencha", "type": "tea"}),
            )
            .await
            .unwrap();
        assert_eq!(updated["name"], "Sencha");
        assert_eq!(updated["type"], "tea");
        get_v2.remove_async().await;

        server
            .mock("DELETE", "/beverages/7")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/7")
            .with_status(404)
            .create_async()
            .await;

        tester
            .lifecycle_delete("beverage", updated.clone())
            .await
            .unwrap();

        // The raw client still surfaces the 404 as a failure.
        let client = tester.provider().client().await.unwrap();
        let err = client.get(7).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_lifecycle_delete_detects_survivor() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/beverages/7")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/7")
            .with_status(200)
            .with_body(r#"{"id":7,"name":"Latte","type":"coffee"}"#)
            .create_async()
            .await;

        let tester = configured_tester(&server).await;
        let err = tester
            .lifecycle_delete("beverage", json!({"id": 7, "name": "Latte", "type": "coffee"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_data_sources_through_tester() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/beverages")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/beverages/4")
            .with_status(200)
            .with_body(r#"{"id":4,"name":"Mate","type":"infusion"}"#)
            .create_async()
            .await;

        let tester = configured_tester(&server).await;
        let all = tester
            .read_data_source("beverages", Value::Null)
            .await
            .unwrap();
        assert_eq!(all, json!({"beverages": []}));

        let one = tester
            .read_data_source("beverage", json!({"id": 4}))
            .await
            .unwrap();
        assert_eq!(one, json!({"id": 4, "name": "Mate", "type": "infusion"}));

        let imported = tester.import_resource("beverage", "4").await.unwrap();
        assert_eq!(imported[0].state, one);
    }

    #[test]
    fn test_error_display() {
        let err = TestError::Diagnostics(vec![Diagnostic::error("Missing Configuration")
            .with_detail("The 'base_url' must be provided.")
            .with_attribute("base_url")]);
        let rendered = err.to_string();
        assert!(rendered.contains("1 diagnostic(s)"));
        assert!(rendered.contains("[Error] Missing Configuration"));
        assert!(rendered.contains("(at base_url)"));
    }

    #[test]
    fn test_check_diagnostics_ignores_warnings() {
        let warnings = vec![Diagnostic::warning("deprecated attribute")];
        assert!(check_diagnostics(warnings.clone()).is_ok());
        assert_no_errors(&warnings);
        assert_eq!(warnings[0].severity, DiagnosticSeverity::Warning);
    }
}
