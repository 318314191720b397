//! Hemmer Simple Provider
//!
//! A minimal, in-memory provider for exercising a Hemmer host's resource
//! lifecycle. It declares one resource type, `simple_resource`, which is also
//! served as a data source and a list resource, and it never touches a real
//! backend.
//!
//! # Overview
//!
//! - **Schema catalog**: built once, returned by reference ([`ProviderSchema`])
//! - **ProviderService trait**: the full operation contract a host drives
//! - **Values**: a typed [`Value`] with explicit unknowns, decoded from stored
//!   JSON by a [`ValueCodec`]
//! - **Diagnostics**: errors and warnings returned alongside results
//! - **Logging**: `tracing` spans per operation, written to stderr
//! - **Testing**: [`testing::ProviderTester`] for driving a provider directly
//!
//! # Quick Start
//!
//! ```
//! use hemmer_provider_simple::{ProviderService, SimpleProvider, Value};
//! use hemmer_provider_simple::types::PlanResourceChangeRequest;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let provider = SimpleProvider::new();
//! let plan = provider
//!     .plan_resource_change(PlanResourceChangeRequest {
//!         type_name: "simple_resource".into(),
//!         proposed_new_state: Value::from(json!({"value": "hello"})),
//!         ..Default::default()
//!     })
//!     .await;
//!
//! assert!(plan.diagnostics.is_empty());
//! assert!(!plan.planned_state.get("id").unwrap().is_known());
//! # });
//! ```
//!
//! # Resource Lifecycle
//!
//! - **Plan**: a missing `id` becomes unknown; a null proposal plans a destroy
//! - **Apply**: an unresolved `id` is replaced with a freshly generated one
//! - **Read**: returns the prior state unchanged
//! - **Import / Move**: refused with an error diagnostic
//!
//! Ephemeral resources, functions, actions and state stores are not declared.
//! Calling any of their operations panics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod id;
pub mod logging;
pub mod schema;
pub mod service;
pub mod simple;
pub mod testing;
pub mod types;
pub mod value;

// Re-export main types at crate root
pub use config::{IdStrategy, ProviderOptions};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use schema::{ProviderSchema, ServerCapabilities};
pub use service::ProviderService;
pub use simple::{SimpleProvider, SIMPLE_RESOURCE};
pub use types::{ProviderMetadata, PROTOCOL_VERSION};
pub use value::{JsonCodec, Value, ValueCodec};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
