//! The simple provider.
//!
//! An in-memory provider with a single resource type, `simple_resource`, that
//! never talks to a backend. Plans mark a missing `id` as unknown, applies
//! fill it in, reads report no drift, and the data source and list resource
//! return fixed rows. It exists so a host can drive its whole resource
//! lifecycle against deterministic data.
//!
//! Operations for features the catalog does not declare (ephemeral
//! resources, functions, actions, state stores) panic: the host only calls
//! them if it has ignored the advertised schema or negotiated the wrong
//! protocol version.

use std::collections::BTreeMap;

use tracing::{debug, error, info, instrument, warn};

use crate::config::ProviderOptions;
use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::id::IdGenerator;
use crate::schema::{
    Attribute, AttributeType, IdentitySchema, IdentitySchemas, ProviderSchema, Schema,
    ServerCapabilities,
};
use crate::service::ProviderService;
use crate::types::*;
use crate::value::{JsonCodec, Value, ValueCodec};

/// The only resource, data source and list resource type this provider has.
pub const SIMPLE_RESOURCE: &str = "simple_resource";

const ID: &str = "id";
const VALUE: &str = "value";
const STATIC_ID: &str = "static_id";
const STATIC_VALUE: &str = "static_value";
const STATIC_DISPLAY_NAME: &str = "static_display_name";

fn simple_identity_schema() -> IdentitySchema {
    IdentitySchema::new(0).with_attribute(ID, Attribute::required_string())
}

fn simple_resource_schema() -> Schema {
    Schema::v0()
        .with_attribute(ID, Attribute::computed_string())
        .with_attribute(VALUE, Attribute::optional_string())
        .with_identity(simple_identity_schema())
}

fn catalog() -> ProviderSchema {
    ProviderSchema::new()
        .with_provider_config(Schema::v0())
        .with_resource(SIMPLE_RESOURCE, simple_resource_schema())
        .with_data_source(SIMPLE_RESOURCE, simple_resource_schema())
        .with_list_resource(
            SIMPLE_RESOURCE,
            Schema::v0().with_attribute(VALUE, Attribute::optional_string()),
        )
        .with_capabilities(ServerCapabilities {
            plan_destroy: true,
            ..Default::default()
        })
}

fn static_identity() -> Value {
    Value::object(BTreeMap::from([(ID.to_string(), Value::string(STATIC_ID))]))
}

/// Abort on an operation the catalog makes unreachable.
fn undeclared(operation: &str, missing: &str) -> ! {
    error!(operation, missing, "host invoked an undeclared operation");
    panic!(
        "{} called, but this provider declares no {}",
        operation, missing
    )
}

/// A provider backed by nothing but its own schema catalog.
///
/// The catalog and identity catalog are built once in the constructor and
/// only ever handed out by reference.
#[derive(Debug)]
pub struct SimpleProvider<C: ValueCodec = JsonCodec> {
    schema: ProviderSchema,
    identities: IdentitySchemas,
    options: ProviderOptions,
    ids: IdGenerator,
    codec: C,
}

impl SimpleProvider {
    /// Create a provider with default options and the JSON codec.
    pub fn new() -> Self {
        Self::with_options(ProviderOptions::default())
    }

    /// Create a provider with custom options and the JSON codec.
    pub fn with_options(options: ProviderOptions) -> Self {
        Self::with_codec(options, JsonCodec)
    }
}

impl Default for SimpleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ValueCodec> SimpleProvider<C> {
    /// Create a provider that decodes stored values with `codec`.
    pub fn with_codec(options: ProviderOptions, codec: C) -> Self {
        let schema = catalog();
        let identities = schema.identity_schemas();
        Self {
            schema,
            identities,
            ids: IdGenerator::new(options.id_strategy),
            options,
            codec,
        }
    }

    /// The options this provider was built with.
    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn decode_stored(
        &self,
        type_name: &str,
        raw: &[u8],
        ty: Result<AttributeType, ProviderError>,
    ) -> (Value, Diagnostics) {
        match ty.and_then(|ty| self.codec.unmarshal(raw, &ty)) {
            Ok(value) => (value, Diagnostics::new()),
            Err(e) => {
                warn!(type_name, error = %e, "Stored value does not match schema");
                (Value::Null, e.into())
            },
        }
    }

    fn state_store_unavailable(&self, operation: &str) -> ! {
        let version = self.options.protocol_version;
        error!(operation, protocol_version = version, "host invoked a state store operation");
        panic!(
            "{} called, but protocol version {} has no state store operations",
            operation, version
        )
    }
}

/// Whether an attribute still needs a value from the provider.
fn unresolved(attrs: &BTreeMap<String, Value>, name: &str) -> bool {
    attrs
        .get(name)
        .map_or(true, |value| value.is_null() || !value.is_known())
}

#[async_trait::async_trait]
impl<C: ValueCodec> ProviderService for SimpleProvider<C> {
    fn get_provider_schema(&self) -> &ProviderSchema {
        &self.schema
    }

    fn get_resource_identity_schemas(&self) -> &IdentitySchemas {
        &self.identities
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    #[instrument(skip_all, name = "provider.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        _req: ValidateProviderConfigRequest,
    ) -> DiagnosticsResponse {
        debug!("ValidateProviderConfig accepted");
        DiagnosticsResponse::default()
    }

    #[instrument(skip_all, name = "provider.configure_provider", fields(host_version = %req.host_version))]
    async fn configure_provider(&self, req: ConfigureProviderRequest) -> DiagnosticsResponse {
        info!("Provider configured");
        DiagnosticsResponse::default()
    }

    #[instrument(skip_all, name = "provider.stop")]
    async fn stop(&self) -> Result<(), ProviderError> {
        info!("Stop called");
        Ok(())
    }

    #[instrument(skip_all, name = "provider.close")]
    async fn close(&self) -> Result<(), ProviderError> {
        info!("Close called");
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    #[instrument(skip_all, name = "provider.validate_resource_config", fields(type_name = %req.type_name))]
    async fn validate_resource_config(
        &self,
        req: ValidateResourceConfigRequest,
    ) -> DiagnosticsResponse {
        debug!("ValidateResourceConfig accepted");
        DiagnosticsResponse::default()
    }

    #[instrument(skip_all, name = "provider.upgrade_resource_state", fields(type_name = %req.type_name, version = req.version))]
    async fn upgrade_resource_state(
        &self,
        req: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        let ty = self
            .schema
            .resource(&req.type_name)
            .map(Schema::implied_type);
        let (upgraded_state, diagnostics) =
            self.decode_stored(&req.type_name, &req.raw_state_json, ty);
        debug!(errors = diagnostics.len(), "UpgradeResourceState completed");
        UpgradeResourceStateResponse {
            upgraded_state,
            diagnostics,
        }
    }

    #[instrument(skip_all, name = "provider.upgrade_resource_identity", fields(type_name = %req.type_name, version = req.version))]
    async fn upgrade_resource_identity(
        &self,
        req: UpgradeResourceIdentityRequest,
    ) -> UpgradeResourceIdentityResponse {
        let ty = self
            .identities
            .get(&req.type_name)
            .map(IdentitySchema::implied_type)
            .ok_or_else(|| ProviderError::UnknownResource(req.type_name.clone()));
        let (upgraded_identity, diagnostics) =
            self.decode_stored(&req.type_name, &req.raw_identity_json, ty);
        debug!(errors = diagnostics.len(), "UpgradeResourceIdentity completed");
        UpgradeResourceIdentityResponse {
            upgraded_identity,
            diagnostics,
        }
    }

    #[instrument(skip_all, name = "provider.read_resource", fields(type_name = %req.type_name))]
    async fn read_resource(&self, req: ReadResourceRequest) -> ReadResourceResponse {
        // nothing to refresh from, so there is never any drift
        debug!("ReadResource returning prior state");
        ReadResourceResponse {
            new_state: req.prior_state,
            private: req.private,
            identity: req.current_identity,
            diagnostics: Diagnostics::new(),
        }
    }

    #[instrument(skip_all, name = "provider.plan_resource_change", fields(type_name = %req.type_name))]
    async fn plan_resource_change(
        &self,
        req: PlanResourceChangeRequest,
    ) -> PlanResourceChangeResponse {
        let mut resp = PlanResourceChangeResponse::default();

        if req.proposed_new_state.is_null() {
            debug!("Planning destroy");
            resp.planned_state = req.proposed_new_state;
            resp.planned_private = req.prior_private;
            return resp;
        }

        let mut attrs = match req.proposed_new_state.as_value_map() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(error = %e, "Proposed state is not an object");
                resp.diagnostics.push_error(e);
                return resp;
            },
        };
        if unresolved(&attrs, ID) {
            attrs.insert(ID.to_string(), Value::unknown(AttributeType::String));
        }

        resp.planned_state = Value::object(attrs);
        debug!("PlanResourceChange completed");
        resp
    }

    #[instrument(skip_all, name = "provider.apply_resource_change", fields(type_name = %req.type_name))]
    async fn apply_resource_change(
        &self,
        req: ApplyResourceChangeRequest,
    ) -> ApplyResourceChangeResponse {
        let mut resp = ApplyResourceChangeResponse::default();

        if req.planned_state.is_null() {
            info!("Resource destroyed");
            resp.new_state = req.planned_state;
            return resp;
        }

        let mut attrs = match req.planned_state.as_value_map() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(error = %e, "Planned state is not an object");
                resp.diagnostics.push_error(e);
                return resp;
            },
        };
        if unresolved(&attrs, ID) {
            let id = self.ids.next_id();
            debug!(id = %id, "Synthesized resource id");
            attrs.insert(ID.to_string(), Value::string(id));
        }

        resp.new_state = Value::object(attrs);
        resp.new_identity = req.planned_identity;
        info!("ApplyResourceChange completed");
        resp
    }

    #[instrument(skip_all, name = "provider.import_resource_state", fields(type_name = %req.type_name, id = %req.id))]
    async fn import_resource_state(
        &self,
        req: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        warn!("ImportResourceState refused");
        ImportResourceStateResponse {
            imported_resources: Vec::new(),
            diagnostics: ProviderError::Unsupported(format!(
                "{} does not support import",
                req.type_name
            ))
            .into(),
        }
    }

    #[instrument(skip_all, name = "provider.move_resource_state", fields(source = %req.source_type_name, target = %req.target_type_name))]
    async fn move_resource_state(
        &self,
        req: MoveResourceStateRequest,
    ) -> MoveResourceStateResponse {
        warn!("MoveResourceState refused, capability not advertised");
        MoveResourceStateResponse {
            diagnostics: ProviderError::Unsupported(
                "this provider does not support moving resource state".to_string(),
            )
            .into(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Data Source & List Operations
    // =========================================================================

    #[instrument(skip_all, name = "provider.validate_data_resource_config", fields(type_name = %req.type_name))]
    async fn validate_data_resource_config(
        &self,
        req: ValidateDataResourceConfigRequest,
    ) -> DiagnosticsResponse {
        debug!("ValidateDataResourceConfig accepted");
        DiagnosticsResponse::default()
    }

    #[instrument(skip_all, name = "provider.read_data_source", fields(type_name = %req.type_name))]
    async fn read_data_source(&self, req: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut resp = ReadDataSourceResponse::default();
        let mut attrs = match req.config.as_value_map() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(error = %e, "Data source config is not an object");
                resp.diagnostics.push_error(e);
                return resp;
            },
        };
        attrs.insert(ID.to_string(), Value::string(STATIC_ID));
        resp.state = Value::object(attrs);
        debug!("ReadDataSource completed");
        resp
    }

    #[instrument(skip_all, name = "provider.validate_list_resource_config", fields(type_name = %req.type_name))]
    async fn validate_list_resource_config(
        &self,
        req: ValidateListResourceConfigRequest,
    ) -> DiagnosticsResponse {
        debug!("ValidateListResourceConfig accepted");
        DiagnosticsResponse::default()
    }

    #[instrument(skip_all, name = "provider.list_resource", fields(type_name = %req.type_name, include_resource_object = req.include_resource_object))]
    async fn list_resource(&self, req: ListResourceRequest) -> ListResourceResponse {
        let mut resp = ListResourceResponse::default();
        let attrs = match req.config.as_value_map() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(error = %e, "List config is not an object");
                resp.diagnostics.push_error(e);
                return resp;
            },
        };
        let value = attrs
            .get(VALUE)
            .cloned()
            .unwrap_or_else(|| Value::string(STATIC_VALUE));

        let mut row = BTreeMap::from([
            (
                "display_name".to_string(),
                Value::string(STATIC_DISPLAY_NAME),
            ),
            ("identity".to_string(), static_identity()),
        ]);
        if req.include_resource_object {
            row.insert(
                "state".to_string(),
                Value::object(BTreeMap::from([
                    (ID.to_string(), Value::string(STATIC_ID)),
                    (VALUE.to_string(), value),
                ])),
            );
        }

        resp.result = Value::object(BTreeMap::from([
            ("data".to_string(), Value::tuple(vec![Value::object(row)])),
            ("config".to_string(), req.config),
        ]));
        debug!(rows = 1, "ListResource completed");
        resp
    }

    // =========================================================================
    // Ephemeral Resources
    // =========================================================================

    #[instrument(skip_all, name = "provider.validate_ephemeral_resource_config")]
    async fn validate_ephemeral_resource_config(
        &self,
        _req: ValidateEphemeralResourceConfigRequest,
    ) -> DiagnosticsResponse {
        undeclared("ValidateEphemeralResourceConfig", "ephemeral resource types")
    }

    #[instrument(skip_all, name = "provider.open_ephemeral_resource")]
    async fn open_ephemeral_resource(
        &self,
        _req: OpenEphemeralResourceRequest,
    ) -> OpenEphemeralResourceResponse {
        undeclared("OpenEphemeralResource", "ephemeral resource types")
    }

    #[instrument(skip_all, name = "provider.renew_ephemeral_resource")]
    async fn renew_ephemeral_resource(
        &self,
        _req: RenewEphemeralResourceRequest,
    ) -> RenewEphemeralResourceResponse {
        undeclared("RenewEphemeralResource", "ephemeral resource types")
    }

    #[instrument(skip_all, name = "provider.close_ephemeral_resource")]
    async fn close_ephemeral_resource(
        &self,
        _req: CloseEphemeralResourceRequest,
    ) -> DiagnosticsResponse {
        undeclared("CloseEphemeralResource", "ephemeral resource types")
    }

    // =========================================================================
    // Functions & Actions
    // =========================================================================

    #[instrument(skip_all, name = "provider.call_function")]
    async fn call_function(&self, _req: CallFunctionRequest) -> CallFunctionResponse {
        undeclared("CallFunction", "functions")
    }

    #[instrument(skip_all, name = "provider.validate_action_config")]
    async fn validate_action_config(
        &self,
        _req: ValidateActionConfigRequest,
    ) -> DiagnosticsResponse {
        undeclared("ValidateActionConfig", "actions")
    }

    #[instrument(skip_all, name = "provider.plan_action")]
    async fn plan_action(&self, _req: PlanActionRequest) -> PlanActionResponse {
        undeclared("PlanAction", "actions")
    }

    #[instrument(skip_all, name = "provider.invoke_action")]
    async fn invoke_action(&self, _req: InvokeActionRequest) -> InvokeActionResponse {
        undeclared("InvokeAction", "actions")
    }

    // =========================================================================
    // State Stores
    // =========================================================================

    #[instrument(skip_all, name = "provider.validate_state_store_config")]
    async fn validate_state_store_config(
        &self,
        _req: ValidateStateStoreConfigRequest,
    ) -> DiagnosticsResponse {
        self.state_store_unavailable("ValidateStateStoreConfig")
    }

    #[instrument(skip_all, name = "provider.configure_state_store")]
    async fn configure_state_store(
        &self,
        _req: ConfigureStateStoreRequest,
    ) -> DiagnosticsResponse {
        self.state_store_unavailable("ConfigureStateStore")
    }

    #[instrument(skip_all, name = "provider.get_states")]
    async fn get_states(&self, _req: GetStatesRequest) -> GetStatesResponse {
        self.state_store_unavailable("GetStates")
    }

    #[instrument(skip_all, name = "provider.delete_state")]
    async fn delete_state(&self, _req: DeleteStateRequest) -> DiagnosticsResponse {
        self.state_store_unavailable("DeleteState")
    }
}
