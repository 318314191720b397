//! Request and response types for every provider operation.
//!
//! Requests are built by the host for a single call; responses carry the
//! result together with any [`Diagnostics`]. Nothing here outlives the call.

use crate::diagnostics::Diagnostics;
use crate::schema::ServerCapabilities;
use crate::value::Value;

/// The protocol version this provider negotiates.
pub const PROTOCOL_VERSION: u32 = 5;

/// Provider metadata derived from the schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderMetadata {
    /// Managed resource type names, sorted.
    pub resources: Vec<String>,
    /// Data source type names, sorted.
    pub data_sources: Vec<String>,
    /// List resource type names, sorted.
    pub list_resources: Vec<String>,
    /// Ephemeral resource type names, sorted.
    pub ephemeral_resources: Vec<String>,
    /// Server capabilities.
    pub capabilities: ServerCapabilities,
}

/// Response carrying nothing but diagnostics.
///
/// Used by validation, configuration, and state-store operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsResponse {
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

// =========================================================================
// Validation & configuration
// =========================================================================

/// ValidateProviderConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateProviderConfigRequest {
    /// Provider configuration.
    pub config: Value,
}

/// ValidateResourceConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateResourceConfigRequest {
    /// Managed resource type.
    pub type_name: String,
    /// Resource configuration.
    pub config: Value,
}

/// ValidateDataResourceConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateDataResourceConfigRequest {
    /// Data source type.
    pub type_name: String,
    /// Data source configuration.
    pub config: Value,
}

/// ValidateListResourceConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateListResourceConfigRequest {
    /// List resource type.
    pub type_name: String,
    /// List configuration.
    pub config: Value,
    /// Whether listing will ask for full resource objects.
    pub include_resource_object: bool,
    /// Maximum number of results the host will request.
    pub limit: i64,
}

/// ConfigureProvider request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureProviderRequest {
    /// Version of the calling host.
    pub host_version: String,
    /// Provider configuration.
    pub config: Value,
}

// =========================================================================
// State & identity upgrade
// =========================================================================

/// UpgradeResourceState request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeResourceStateRequest {
    /// Managed resource type.
    pub type_name: String,
    /// Schema version the raw state was written with.
    pub version: i64,
    /// Stored state, JSON-encoded.
    pub raw_state_json: Vec<u8>,
}

/// UpgradeResourceState response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeResourceStateResponse {
    /// State conforming to the current schema.
    pub upgraded_state: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// UpgradeResourceIdentity request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeResourceIdentityRequest {
    /// Managed resource type.
    pub type_name: String,
    /// Identity schema version the raw identity was written with.
    pub version: i64,
    /// Stored identity, JSON-encoded.
    pub raw_identity_json: Vec<u8>,
}

/// UpgradeResourceIdentity response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeResourceIdentityResponse {
    /// Identity conforming to the current identity schema.
    pub upgraded_identity: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

// =========================================================================
// Managed resources
// =========================================================================

/// ReadResource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadResourceRequest {
    /// Managed resource type.
    pub type_name: String,
    /// State recorded after the last apply.
    pub prior_state: Value,
    /// Private data recorded after the last apply.
    pub private: Vec<u8>,
    /// Provider meta block from the module, if any.
    pub provider_meta: Value,
    /// Identity recorded after the last apply.
    pub current_identity: Value,
}

/// ReadResource response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadResourceResponse {
    /// Refreshed state.
    pub new_state: Value,
    /// Refreshed private data.
    pub private: Vec<u8>,
    /// Refreshed identity.
    pub identity: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// PlanResourceChange request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanResourceChangeRequest {
    /// Managed resource type.
    pub type_name: String,
    /// Current state, null when creating.
    pub prior_state: Value,
    /// Desired state, null when destroying.
    pub proposed_new_state: Value,
    /// Resource configuration.
    pub config: Value,
    /// Private data recorded after the last apply.
    pub prior_private: Vec<u8>,
    /// Provider meta block from the module, if any.
    pub provider_meta: Value,
    /// Identity recorded after the last apply.
    pub prior_identity: Value,
}

/// PlanResourceChange response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanResourceChangeResponse {
    /// Planned state, possibly containing unknowns.
    pub planned_state: Value,
    /// Attribute paths whose change forces replacement.
    pub requires_replace: Vec<String>,
    /// Private data to hand back at apply.
    pub planned_private: Vec<u8>,
    /// Planned identity.
    pub planned_identity: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// ApplyResourceChange request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyResourceChangeRequest {
    /// Managed resource type.
    pub type_name: String,
    /// State before the change.
    pub prior_state: Value,
    /// State produced by plan, null when destroying.
    pub planned_state: Value,
    /// Resource configuration.
    pub config: Value,
    /// Private data produced by plan.
    pub planned_private: Vec<u8>,
    /// Provider meta block from the module, if any.
    pub provider_meta: Value,
    /// Identity produced by plan.
    pub planned_identity: Value,
}

/// ApplyResourceChange response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyResourceChangeResponse {
    /// Final state, wholly known.
    pub new_state: Value,
    /// Private data to store with the state.
    pub private: Vec<u8>,
    /// Final identity, null when destroyed.
    pub new_identity: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// ImportResourceState request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResourceStateRequest {
    /// Managed resource type.
    pub type_name: String,
    /// User-supplied import identifier.
    pub id: String,
    /// User-supplied import identity, when importing by identity.
    pub identity: Value,
}

/// A resource produced by an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedResource {
    /// The resource type.
    pub type_name: String,
    /// The imported state.
    pub state: Value,
    /// Private data to store with the state.
    pub private: Vec<u8>,
    /// The imported identity.
    pub identity: Value,
}

/// ImportResourceState response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResourceStateResponse {
    /// Imported resources.
    pub imported_resources: Vec<ImportedResource>,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// MoveResourceState request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveResourceStateRequest {
    /// Address of the provider that owns the source resource.
    pub source_provider_address: String,
    /// Source resource type.
    pub source_type_name: String,
    /// Schema version of the source state.
    pub source_schema_version: i64,
    /// Source state, JSON-encoded.
    pub source_state_json: Vec<u8>,
    /// Source private data.
    pub source_private: Vec<u8>,
    /// Source identity, JSON-encoded.
    pub source_identity_json: Vec<u8>,
    /// Target resource type.
    pub target_type_name: String,
}

/// MoveResourceState response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveResourceStateResponse {
    /// State in the target type's schema.
    pub target_state: Value,
    /// Private data for the target.
    pub target_private: Vec<u8>,
    /// Identity for the target.
    pub target_identity: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

// =========================================================================
// Data sources & list resources
// =========================================================================

/// ReadDataSource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadDataSourceRequest {
    /// Data source type.
    pub type_name: String,
    /// Data source configuration.
    pub config: Value,
    /// Provider meta block from the module, if any.
    pub provider_meta: Value,
}

/// ReadDataSource response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadDataSourceResponse {
    /// The read result.
    pub state: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// ListResource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResourceRequest {
    /// List resource type.
    pub type_name: String,
    /// List configuration.
    pub config: Value,
    /// Whether each row should carry the full resource object.
    pub include_resource_object: bool,
    /// Maximum number of rows the host wants.
    pub limit: i64,
}

/// ListResource response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResourceResponse {
    /// `{ data: tuple of rows, config: <echoed config> }`.
    pub result: Value,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

// =========================================================================
// Ephemeral resources
// =========================================================================

/// ValidateEphemeralResourceConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateEphemeralResourceConfigRequest {
    /// Ephemeral resource type.
    pub type_name: String,
    /// Ephemeral resource configuration.
    pub config: Value,
}

/// OpenEphemeralResource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenEphemeralResourceRequest {
    /// Ephemeral resource type.
    pub type_name: String,
    /// Ephemeral resource configuration.
    pub config: Value,
}

/// OpenEphemeralResource response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenEphemeralResourceResponse {
    /// The opened value.
    pub result: Value,
    /// Private data to hand back on renew and close.
    pub private: Vec<u8>,
    /// When the host should renew, if at all.
    pub renew_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// RenewEphemeralResource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenewEphemeralResourceRequest {
    /// Ephemeral resource type.
    pub type_name: String,
    /// Private data from open or the previous renew.
    pub private: Vec<u8>,
}

/// RenewEphemeralResource response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenewEphemeralResourceResponse {
    /// When the host should renew again, if at all.
    pub renew_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Updated private data.
    pub private: Vec<u8>,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// CloseEphemeralResource request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseEphemeralResourceRequest {
    /// Ephemeral resource type.
    pub type_name: String,
    /// Private data from open or the last renew.
    pub private: Vec<u8>,
}

// =========================================================================
// Functions & actions
// =========================================================================

/// CallFunction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFunctionRequest {
    /// Function name.
    pub function_name: String,
    /// Positional arguments.
    pub arguments: Vec<Value>,
}

/// CallFunction response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFunctionResponse {
    /// Return value.
    pub result: Value,
    /// Function error, if the call failed.
    pub error: Option<String>,
}

/// ValidateActionConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateActionConfigRequest {
    /// Action type.
    pub type_name: String,
    /// Action configuration.
    pub config: Value,
}

/// PlanAction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanActionRequest {
    /// Action type.
    pub action_type: String,
    /// Proposed action configuration.
    pub proposed_action_data: Value,
}

/// PlanAction response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanActionResponse {
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// InvokeAction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeActionRequest {
    /// Action type.
    pub action_type: String,
    /// Planned action configuration.
    pub planned_action_data: Value,
}

/// InvokeAction response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeActionResponse {
    /// Progress messages emitted while the action ran.
    pub progress: Vec<String>,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

// =========================================================================
// State stores
// =========================================================================

/// ValidateStateStoreConfig request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateStateStoreConfigRequest {
    /// State store type.
    pub type_name: String,
    /// State store configuration.
    pub config: Value,
}

/// ConfigureStateStore request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureStateStoreRequest {
    /// State store type.
    pub type_name: String,
    /// State store configuration.
    pub config: Value,
}

/// GetStates request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetStatesRequest {
    /// State store type.
    pub type_name: String,
}

/// GetStates response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetStatesResponse {
    /// Names of the stored states.
    pub states: Vec<String>,
    /// Diagnostics raised by the call.
    pub diagnostics: Diagnostics,
}

/// DeleteState request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteStateRequest {
    /// State store type.
    pub type_name: String,
    /// Name of the state to delete.
    pub state_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, 5);
    }

    #[test]
    fn test_request_defaults_are_null() {
        let req = PlanResourceChangeRequest::default();
        assert!(req.proposed_new_state.is_null());
        assert!(req.prior_private.is_empty());

        let resp = ApplyResourceChangeResponse::default();
        assert!(resp.new_state.is_null());
        assert!(resp.diagnostics.is_empty());
    }
}
