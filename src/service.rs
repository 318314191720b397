//! The provider contract.
//!
//! [`ProviderService`] is the full set of operations a host may invoke on a
//! provider. Every method is required: a provider that does not support an
//! operation still has to answer it, either with a refusal diagnostic or,
//! where the advertised schema makes the call impossible, by panicking.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_simple::{ProviderService, SimpleProvider};
//!
//! let provider = SimpleProvider::new();
//! let schema = provider.get_provider_schema();
//! assert!(schema.resource_types.contains_key("simple_resource"));
//! assert!(schema.server_capabilities.plan_destroy);
//! ```

use crate::error::ProviderError;
use crate::schema::{IdentitySchemas, ProviderSchema};
use crate::types::*;

/// Trait that provider implementations must implement.
///
/// Implementations are shared between concurrent callers, so all methods
/// take `&self`.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema catalog. Always the same object.
    fn get_provider_schema(&self) -> &ProviderSchema;

    /// Return identity schemas keyed by resource type. Always the same object.
    fn get_resource_identity_schemas(&self) -> &IdentitySchemas;

    /// Return provider metadata. By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.get_provider_schema();
        let sorted = |names: Vec<&String>| {
            let mut names: Vec<String> = names.into_iter().cloned().collect();
            names.sort();
            names
        };
        ProviderMetadata {
            resources: sorted(schema.resource_types.keys().collect()),
            data_sources: sorted(schema.data_sources.keys().collect()),
            list_resources: sorted(schema.list_resource_types.keys().collect()),
            ephemeral_resources: sorted(schema.ephemeral_resource_types.keys().collect()),
            capabilities: schema.server_capabilities,
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(
        &self,
        req: ValidateProviderConfigRequest,
    ) -> DiagnosticsResponse;

    /// Configure the provider.
    async fn configure_provider(&self, req: ConfigureProviderRequest) -> DiagnosticsResponse;

    /// Interrupt in-flight work.
    async fn stop(&self) -> Result<(), ProviderError>;

    /// Release everything the provider holds.
    async fn close(&self) -> Result<(), ProviderError>;

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        req: ValidateResourceConfigRequest,
    ) -> DiagnosticsResponse;

    /// Coerce stored state onto the current resource schema.
    async fn upgrade_resource_state(
        &self,
        req: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse;

    /// Coerce a stored identity onto the current identity schema.
    async fn upgrade_resource_identity(
        &self,
        req: UpgradeResourceIdentityRequest,
    ) -> UpgradeResourceIdentityResponse;

    /// Refresh a resource from its source of truth.
    async fn read_resource(&self, req: ReadResourceRequest) -> ReadResourceResponse;

    /// Plan a create, update, or destroy.
    async fn plan_resource_change(
        &self,
        req: PlanResourceChangeRequest,
    ) -> PlanResourceChangeResponse;

    /// Carry out a planned change.
    async fn apply_resource_change(
        &self,
        req: ApplyResourceChangeRequest,
    ) -> ApplyResourceChangeResponse;

    /// Import existing infrastructure into management.
    async fn import_resource_state(
        &self,
        req: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse;

    /// Move state from another resource type into one of ours.
    async fn move_resource_state(&self, req: MoveResourceStateRequest)
        -> MoveResourceStateResponse;

    // =========================================================================
    // Data Source & List Operations
    // =========================================================================

    /// Validate a data source's configuration.
    async fn validate_data_resource_config(
        &self,
        req: ValidateDataResourceConfigRequest,
    ) -> DiagnosticsResponse;

    /// Read a data source.
    async fn read_data_source(&self, req: ReadDataSourceRequest) -> ReadDataSourceResponse;

    /// Validate a list resource's configuration.
    async fn validate_list_resource_config(
        &self,
        req: ValidateListResourceConfigRequest,
    ) -> DiagnosticsResponse;

    /// List resource instances.
    async fn list_resource(&self, req: ListResourceRequest) -> ListResourceResponse;

    // =========================================================================
    // Ephemeral Resources
    // =========================================================================

    /// Validate an ephemeral resource's configuration.
    async fn validate_ephemeral_resource_config(
        &self,
        req: ValidateEphemeralResourceConfigRequest,
    ) -> DiagnosticsResponse;

    /// Open an ephemeral resource.
    async fn open_ephemeral_resource(
        &self,
        req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse;

    /// Renew an open ephemeral resource.
    async fn renew_ephemeral_resource(
        &self,
        req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse;

    /// Close an open ephemeral resource.
    async fn close_ephemeral_resource(
        &self,
        req: CloseEphemeralResourceRequest,
    ) -> DiagnosticsResponse;

    // =========================================================================
    // Functions & Actions
    // =========================================================================

    /// Call a provider-defined function.
    async fn call_function(&self, req: CallFunctionRequest) -> CallFunctionResponse;

    /// Validate an action's configuration.
    async fn validate_action_config(&self, req: ValidateActionConfigRequest)
        -> DiagnosticsResponse;

    /// Plan an action invocation.
    async fn plan_action(&self, req: PlanActionRequest) -> PlanActionResponse;

    /// Invoke an action.
    async fn invoke_action(&self, req: InvokeActionRequest) -> InvokeActionResponse;

    // =========================================================================
    // State Stores
    // =========================================================================

    /// Validate a state store's configuration.
    async fn validate_state_store_config(
        &self,
        req: ValidateStateStoreConfigRequest,
    ) -> DiagnosticsResponse;

    /// Configure a state store.
    async fn configure_state_store(&self, req: ConfigureStateStoreRequest)
        -> DiagnosticsResponse;

    /// List the states held by a state store.
    async fn get_states(&self, req: GetStatesRequest) -> GetStatesResponse;

    /// Delete a state from a state store.
    async fn delete_state(&self, req: DeleteStateRequest) -> DiagnosticsResponse;
}
