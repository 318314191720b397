//! Testing utilities for provider implementations.
//!
//! [`ProviderTester`] drives a [`ProviderService`] directly, with no host in
//! between, and turns error diagnostics into `Err` so tests can use `?`.
//! Inputs accept anything convertible into a [`Value`], including
//! `serde_json::Value`.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_simple::testing::{assert_known_string, ProviderTester};
//! use hemmer_provider_simple::SimpleProvider;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let tester = ProviderTester::new(SimpleProvider::new());
//! let state = tester
//!     .lifecycle_create("simple_resource", json!({"value": "hello"}))
//!     .await
//!     .unwrap();
//! assert_known_string(&state, "value", "hello");
//! # });
//! ```

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ProviderError;
use crate::schema::ProviderSchema;
use crate::service::ProviderService;
use crate::types::*;
use crate::value::Value;

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
    // Schema & Metadata
    // =========================================================================

    /// Get the provider's schema.
    pub fn schema(&self) -> &ProviderSchema {
        self.provider.get_provider_schema()
    }

    /// Get the provider's metadata.
    pub fn metadata(&self) -> ProviderMetadata {
        self.provider.metadata()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Get the list of data source type names.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate provider configuration.
    pub async fn validate_provider_config(&self, config: impl Into<Value>) -> Result<(), TestError> {
        let resp = self
            .provider
            .validate_provider_config(ValidateProviderConfigRequest {
                config: config.into(),
            })
            .await;
        check_diagnostics(resp.diagnostics)
    }

    /// Configure the provider.
    pub async fn configure(&self, config: impl Into<Value>) -> Result<(), TestError> {
        let resp = self
            .provider
            .configure_provider(ConfigureProviderRequest {
                host_version: env!("CARGO_PKG_VERSION").to_string(),
                config: config.into(),
            })
            .await;
        check_diagnostics(resp.diagnostics)
    }

    /// Stop the provider.
    pub async fn stop(&self) -> Result<(), ProviderError> {
        self.provider.stop().await
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration.
    pub async fn validate_resource_config(
        &self,
        type_name: &str,
        config: impl Into<Value>,
    ) -> Result<(), TestError> {
        let resp = self
            .provider
            .validate_resource_config(ValidateResourceConfigRequest {
                type_name: type_name.to_string(),
                config: config.into(),
            })
            .await;
        check_diagnostics(resp.diagnostics)
    }

    /// Upgrade stored state, given as JSON.
    pub async fn upgrade_resource_state(
        &self,
        type_name: &str,
        version: i64,
        state: serde_json::Value,
    ) -> Result<Value, TestError> {
        let resp = self
            .provider
            .upgrade_resource_state(UpgradeResourceStateRequest {
                type_name: type_name.to_string(),
                version,
                raw_state_json: serde_json::to_vec(&state).map_err(ProviderError::from)?,
            })
            .await;
        check_diagnostics(resp.diagnostics)?;
        Ok(resp.upgraded_state)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        type_name: &str,
        proposed_state: impl Into<Value>,
    ) -> Result<PlanResourceChangeResponse, TestError> {
        let proposed_state = proposed_state.into();
        self.plan(PlanResourceChangeRequest {
            type_name: type_name.to_string(),
            config: proposed_state.clone(),
            proposed_new_state: proposed_state,
            ..Default::default()
        })
        .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        type_name: &str,
        prior_state: impl Into<Value>,
        proposed_state: impl Into<Value>,
    ) -> Result<PlanResourceChangeResponse, TestError> {
        let proposed_state = proposed_state.into();
        self.plan(PlanResourceChangeRequest {
            type_name: type_name.to_string(),
            prior_state: prior_state.into(),
            config: proposed_state.clone(),
            proposed_new_state: proposed_state,
            ..Default::default()
        })
        .await
    }

    /// Plan a resource destroy.
    pub async fn plan_destroy(
        &self,
        type_name: &str,
        prior_state: impl Into<Value>,
        prior_private: Vec<u8>,
    ) -> Result<PlanResourceChangeResponse, TestError> {
        self.plan(PlanResourceChangeRequest {
            type_name: type_name.to_string(),
            prior_state: prior_state.into(),
            prior_private,
            ..Default::default()
        })
        .await
    }

    /// Full plan operation with an explicit request.
    pub async fn plan(
        &self,
        req: PlanResourceChangeRequest,
    ) -> Result<PlanResourceChangeResponse, TestError> {
        let resp = self.provider.plan_resource_change(req).await;
        check_diagnostics(resp.diagnostics.clone())?;
        Ok(resp)
    }

    /// Apply a planned state.
    pub async fn apply(
        &self,
        type_name: &str,
        prior_state: impl Into<Value>,
        planned_state: impl Into<Value>,
        planned_identity: impl Into<Value>,
    ) -> Result<ApplyResourceChangeResponse, TestError> {
        let planned_state = planned_state.into();
        let resp = self
            .provider
            .apply_resource_change(ApplyResourceChangeRequest {
                type_name: type_name.to_string(),
                prior_state: prior_state.into(),
                config: planned_state.clone(),
                planned_state,
                planned_identity: planned_identity.into(),
                ..Default::default()
            })
            .await;
        check_diagnostics(resp.diagnostics.clone())?;
        Ok(resp)
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        type_name: &str,
        current_state: impl Into<Value>,
        current_identity: impl Into<Value>,
    ) -> Result<ReadResourceResponse, TestError> {
        let resp = self
            .provider
            .read_resource(ReadResourceRequest {
                type_name: type_name.to_string(),
                prior_state: current_state.into(),
                current_identity: current_identity.into(),
                ..Default::default()
            })
            .await;
        check_diagnostics(resp.diagnostics.clone())?;
        Ok(resp)
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        type_name: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, TestError> {
        let resp = self
            .provider
            .import_resource_state(ImportResourceStateRequest {
                type_name: type_name.to_string(),
                id: id.to_string(),
                ..Default::default()
            })
            .await;
        check_diagnostics(resp.diagnostics)?;
        Ok(resp.imported_resources)
    }

    // =========================================================================
    // Data Source & List Operations
    // =========================================================================

    /// Validate a data source configuration.
    pub async fn validate_data_source_config(
        &self,
        type_name: &str,
        config: impl Into<Value>,
    ) -> Result<(), TestError> {
        let resp = self
            .provider
            .validate_data_resource_config(ValidateDataResourceConfigRequest {
                type_name: type_name.to_string(),
                config: config.into(),
            })
            .await;
        check_diagnostics(resp.diagnostics)
    }

    /// Read data from a data source.
    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: impl Into<Value>,
    ) -> Result<Value, TestError> {
        let resp = self
            .provider
            .read_data_source(ReadDataSourceRequest {
                type_name: type_name.to_string(),
                config: config.into(),
                ..Default::default()
            })
            .await;
        check_diagnostics(resp.diagnostics)?;
        Ok(resp.state)
    }

    /// List resource instances, returning the rows of the `data` element.
    pub async fn list(
        &self,
        type_name: &str,
        config: impl Into<Value>,
        include_resource_object: bool,
    ) -> Result<Vec<Value>, TestError> {
        let resp = self
            .provider
            .list_resource(ListResourceRequest {
                type_name: type_name.to_string(),
                config: config.into(),
                include_resource_object,
                limit: 100,
            })
            .await;
        check_diagnostics(resp.diagnostics)?;
        match resp.result.get("data") {
            Some(Value::Tuple(rows)) | Some(Value::List(rows)) => Ok(rows.clone()),
            other => Err(ProviderError::UnexpectedValue(format!(
                "list result data should be a sequence, got {}",
                other.map_or("nothing", Value::type_name)
            ))
            .into()),
        }
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run a full create lifecycle: plan → apply → read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_create(
        &self,
        type_name: &str,
        config: impl Into<Value>,
    ) -> Result<Value, TestError> {
        let plan = self.plan_create(type_name, config).await?;
        let applied = self
            .apply(type_name, Value::Null, plan.planned_state, plan.planned_identity)
            .await?;
        let read = self
            .read(type_name, applied.new_state, applied.new_identity)
            .await?;
        Ok(read.new_state)
    }

    /// Run a full destroy lifecycle: plan → apply.
    pub async fn lifecycle_destroy(
        &self,
        type_name: &str,
        current_state: impl Into<Value>,
    ) -> Result<(), TestError> {
        let current_state = current_state.into();
        let plan = self
            .plan_destroy(type_name, current_state.clone(), Vec::new())
            .await?;
        let applied = self
            .apply(type_name, current_state, plan.planned_state, Value::Null)
            .await?;
        if applied.new_state.is_null() {
            Ok(())
        } else {
            Err(ProviderError::UnexpectedValue(format!(
                "destroy left state behind: {}",
                applied.new_state.type_name()
            ))
            .into())
        }
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Diagnostics),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
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

/// Keep only the error diagnostics; fail if there are any.
fn check_diagnostics(diagnostics: Diagnostics) -> Result<(), TestError> {
    let errors: Diagnostics = diagnostics
        .into_vec()
        .into_iter()
        .filter(Diagnostic::is_error)
        .collect::<Vec<_>>()
        .into();

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
pub fn assert_no_errors(diagnostics: &Diagnostics) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain at least one error.
///
/// # Panics
///
/// Panics if there are no error diagnostics.
pub fn assert_has_errors(diagnostics: &Diagnostics) {
    assert!(
        diagnostics.has_errors(),
        "Expected at least one error, but got none"
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &Diagnostics, substring: &str) {
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

/// Assert that an attribute of an object value is unknown.
///
/// # Panics
///
/// Panics if the attribute is missing or known.
pub fn assert_unknown(state: &Value, attribute: &str) {
    match state.get(attribute) {
        Some(value) if !value.is_known() => {},
        other => panic!(
            "Expected attribute '{}' to be unknown, got {:?}",
            attribute, other
        ),
    }
}

/// Assert that an attribute of an object value is a known string equal to
/// `expected`.
///
/// # Panics
///
/// Panics if the attribute is missing, unknown, or a different value.
pub fn assert_known_string(state: &Value, attribute: &str, expected: &str) {
    let actual = state.get(attribute).and_then(Value::as_str);
    assert_eq!(
        actual,
        Some(expected),
        "Expected attribute '{}' to be {:?}, got {:?}",
        attribute,
        expected,
        state.get(attribute)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdStrategy, ProviderOptions};
    use crate::simple::SimpleProvider;
    use serde_json::json;

    fn tester() -> ProviderTester<SimpleProvider> {
        ProviderTester::new(SimpleProvider::with_options(
            ProviderOptions::new().with_id_strategy(IdStrategy::Sequential),
        ))
    }

    #[tokio::test]
    async fn test_tester_configure() {
        let tester = tester();
        tester.validate_provider_config(json!({})).await.unwrap();
        tester.configure(json!({})).await.unwrap();
        tester.stop().await.unwrap();
    }

    #[test]
    fn test_tester_schema() {
        let tester = tester();
        assert!(tester.schema().resource_types.contains_key("simple_resource"));
        assert_eq!(tester.resource_types(), vec!["simple_resource".to_string()]);
        assert_eq!(tester.data_source_types(), vec!["simple_resource".to_string()]);
        assert!(tester.metadata().capabilities.plan_destroy);
    }

    #[tokio::test]
    async fn test_tester_plan_create() {
        let tester = tester();
        let plan = tester
            .plan_create("simple_resource", json!({"value": "hello"}))
            .await
            .unwrap();

        assert_no_errors(&plan.diagnostics);
        assert_unknown(&plan.planned_state, "id");
        assert_known_string(&plan.planned_state, "value", "hello");
    }

    #[tokio::test]
    async fn test_tester_plan_update_keeps_id() {
        let tester = tester();
        let plan = tester
            .plan_update(
                "simple_resource",
                json!({"id": "123", "value": "old"}),
                json!({"id": "123", "value": "new"}),
            )
            .await
            .unwrap();

        assert_known_string(&plan.planned_state, "id", "123");
        assert_known_string(&plan.planned_state, "value", "new");
    }

    #[tokio::test]
    async fn test_tester_lifecycle_create() {
        let tester = tester();
        let state = tester
            .lifecycle_create("simple_resource", json!({"value": "hello"}))
            .await
            .unwrap();

        assert_known_string(&state, "id", "simple-1");
        assert_known_string(&state, "value", "hello");
        assert!(state.is_wholly_known());
    }

    #[tokio::test]
    async fn test_tester_lifecycle_destroy() {
        let tester = tester();
        let state = tester
            .lifecycle_create("simple_resource", json!({"value": "hello"}))
            .await
            .unwrap();
        tester
            .lifecycle_destroy("simple_resource", state)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tester_upgrade_state() {
        let tester = tester();
        let state = tester
            .upgrade_resource_state("simple_resource", 0, json!({"id": "a", "value": "b"}))
            .await
            .unwrap();
        assert_known_string(&state, "id", "a");

        let err = tester
            .upgrade_resource_state("simple_resource", 0, json!({"id": {"nested": 1}}))
            .await
            .unwrap_err();
        let TestError::Diagnostics(diags) = err else {
            panic!("expected diagnostics");
        };
        assert_error_contains(&diags, "Decode error");
    }

    #[tokio::test]
    async fn test_tester_import_fails() {
        let tester = tester();
        let err = tester
            .import_resource("simple_resource", "abc")
            .await
            .unwrap_err();
        let TestError::Diagnostics(diags) = err else {
            panic!("expected diagnostics");
        };
        assert_has_errors(&diags);
        assert_error_contains(&diags, "does not support import");
    }

    #[tokio::test]
    async fn test_tester_data_source_and_list() {
        let tester = tester();
        tester
            .validate_data_source_config("simple_resource", json!({}))
            .await
            .unwrap();
        let state = tester
            .read_data_source("simple_resource", json!({"value": "v"}))
            .await
            .unwrap();
        assert_known_string(&state, "id", "static_id");

        let rows = tester
            .list("simple_resource", json!({"value": "v"}), true)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_known_string(&rows[0], "display_name", "static_display_name");
        let row_state = rows[0].get("state").unwrap();
        assert_known_string(row_state, "value", "v");
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = Diagnostics::from(vec![Diagnostic::warning("Just a warning")]);
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = Diagnostics::from(vec![Diagnostic::error("An error")]);
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "to be unknown")]
    fn test_assert_unknown_fails_on_known() {
        assert_unknown(&Value::from(json!({"id": "x"})), "id");
    }

    #[test]
    fn test_check_diagnostics_ignores_warnings() {
        let diagnostics = Diagnostics::from(vec![
            Diagnostic::warning("careful"),
            Diagnostic::error("broken"),
        ]);
        let Err(TestError::Diagnostics(errors)) = check_diagnostics(diagnostics) else {
            panic!("expected diagnostics");
        };
        assert_eq!(errors.len(), 1);
        assert_error_contains(&errors, "broken");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(Diagnostics::from(vec![
            Diagnostic::error("First error").with_attribute("field1"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]));

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("field1"));
        assert!(display.contains("More info"));
    }
}
