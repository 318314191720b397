//! Schema types for describing provider and resource structure.
//!
//! Schemas describe the shape of provider configuration, resources, data
//! sources, list resources and resource identities. Every block also yields an
//! *implied type*, the [`AttributeType::Object`] that conforming values take,
//! which the value codec decodes against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ProviderError;

/// The type of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A string value.
    String,
    /// A 64-bit integer.
    Int64,
    /// A 64-bit floating point number.
    Float64,
    /// A boolean value.
    Bool,
    /// A list of values of a single type.
    List(Box<AttributeType>),
    /// A set of unique values of a single type.
    Set(Box<AttributeType>),
    /// A map from string keys to values of a single type.
    Map(Box<AttributeType>),
    /// An object with a fixed set of attributes.
    Object(HashMap<String, AttributeType>),
    /// A dynamic type that can hold any value.
    Dynamic,
}

impl AttributeType {
    /// Create a list type.
    pub fn list(element_type: AttributeType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create a set type.
    pub fn set(element_type: AttributeType) -> Self {
        Self::Set(Box::new(element_type))
    }

    /// Create a map type.
    pub fn map(element_type: AttributeType) -> Self {
        Self::Map(Box::new(element_type))
    }

    /// Create an object type.
    pub fn object(attributes: HashMap<String, AttributeType>) -> Self {
        Self::Object(attributes)
    }

    /// Short human-readable name, used in decode diagnostics.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Describes how an attribute can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    /// The attribute is required in configuration.
    pub required: bool,
    /// The attribute is optional in configuration.
    pub optional: bool,
    /// The attribute is computed by the provider (read-only).
    pub computed: bool,
    /// The attribute is sensitive and should be hidden in logs/UI.
    pub sensitive: bool,
}

impl AttributeFlags {
    /// Create flags for a required attribute.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    /// Create flags for an optional attribute.
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Default::default()
        }
    }

    /// Create flags for a computed attribute (read-only, set by provider).
    pub fn computed() -> Self {
        Self {
            computed: true,
            ..Default::default()
        }
    }
}

/// Describes a single attribute in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// The type of the attribute.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Flags describing how the attribute can be used.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Human-readable description of the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    /// Create a new attribute with the given type and flags.
    pub fn new(attr_type: AttributeType, flags: AttributeFlags) -> Self {
        Self {
            attr_type,
            flags,
            description: None,
        }
    }

    /// Create a required string attribute.
    pub fn required_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::required())
    }

    /// Create an optional string attribute.
    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional())
    }

    /// Create a computed string attribute.
    pub fn computed_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::computed())
    }

    /// Set the description for this attribute.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this attribute as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.flags.sensitive = true;
        self
    }
}

/// The nesting mode for a block or identity object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockNestingMode {
    /// A single nested block (at most one).
    #[default]
    Single,
    /// A list of nested blocks (zero or more, ordered).
    List,
    /// A set of nested blocks (zero or more, unordered, unique).
    Set,
    /// A map of nested blocks keyed by string.
    Map,
}

impl BlockNestingMode {
    /// Wrap an object type according to this nesting mode.
    fn wrap(self, object: AttributeType) -> AttributeType {
        match self {
            Self::Single => object,
            Self::List => AttributeType::list(object),
            Self::Set => AttributeType::set(object),
            Self::Map => AttributeType::map(object),
        }
    }
}

/// A block of attributes and nested blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The attributes within this block.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Attribute>,
    /// Nested blocks within this block.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub blocks: HashMap<String, NestedBlock>,
    /// Human-readable description of the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Block {
    /// Create a new empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute to this block.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Add a nested block to this block.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    /// The object type that values conforming to this block take.
    pub fn implied_type(&self) -> AttributeType {
        let mut attrs: HashMap<String, AttributeType> = self
            .attributes
            .iter()
            .map(|(name, attr)| (name.clone(), attr.attr_type.clone()))
            .collect();
        for (name, nested) in &self.blocks {
            attrs.insert(
                name.clone(),
                nested.nesting_mode.wrap(nested.block.implied_type()),
            );
        }
        AttributeType::Object(attrs)
    }
}

/// A nested block with its nesting mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBlock {
    /// The block definition.
    #[serde(flatten)]
    pub block: Block,
    /// How the block is nested (single, list, set, map).
    #[serde(default)]
    pub nesting_mode: BlockNestingMode,
}

impl NestedBlock {
    /// Create a single nested block (0 or 1 allowed).
    pub fn single(block: Block) -> Self {
        Self {
            block,
            nesting_mode: BlockNestingMode::Single,
        }
    }

    /// Create a list of nested blocks.
    pub fn list(block: Block) -> Self {
        Self {
            block,
            nesting_mode: BlockNestingMode::List,
        }
    }
}

/// Schema describing the attributes that identify a resource instance
/// independently of its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySchema {
    /// The version of this identity schema (for identity upgrades).
    #[serde(default)]
    pub version: u64,
    /// Identity attributes.
    pub attributes: HashMap<String, Attribute>,
    /// How the identity object is nested.
    #[serde(default)]
    pub nesting: BlockNestingMode,
}

impl IdentitySchema {
    /// Create an empty identity schema at the given version.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            attributes: HashMap::new(),
            nesting: BlockNestingMode::Single,
        }
    }

    /// Add an identity attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// The type that identity values conforming to this schema take.
    pub fn implied_type(&self) -> AttributeType {
        let object = AttributeType::Object(
            self.attributes
                .iter()
                .map(|(name, attr)| (name.clone(), attr.attr_type.clone()))
                .collect(),
        );
        self.nesting.wrap(object)
    }
}

/// Identity schemas keyed by resource type name.
pub type IdentitySchemas = HashMap<String, IdentitySchema>;

/// Schema for a resource, data source, list resource or ephemeral resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The version of this schema (for state upgrades).
    #[serde(default)]
    pub version: u64,
    /// The root block containing all attributes and nested blocks.
    #[serde(flatten)]
    pub block: Block,
    /// Identity of resource instances, when the type has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentitySchema>,
}

impl Schema {
    /// Create a new schema with the given version.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            block: Block::new(),
            identity: None,
        }
    }

    /// Create a schema at version 0.
    pub fn v0() -> Self {
        Self::new(0)
    }

    /// Add an attribute to the schema.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.block.attributes.insert(name.into(), attr);
        self
    }

    /// Add a nested block to the schema.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.block.blocks.insert(name.into(), block);
        self
    }

    /// Attach an identity schema.
    pub fn with_identity(mut self, identity: IdentitySchema) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Implied type of the body block.
    pub fn implied_type(&self) -> AttributeType {
        self.block.implied_type()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::v0()
    }
}

/// Schema for a provider-defined action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSchema {
    /// Configuration accepted by the action.
    pub schema: Schema,
}

/// A single positional function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// Parameter name, used in diagnostics.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub param_type: AttributeType,
    /// Whether null is an acceptable argument.
    #[serde(default)]
    pub allow_null: bool,
}

/// Schema for a provider-defined function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Positional parameters.
    pub parameters: Vec<FunctionParameter>,
    /// The type of the returned value.
    pub return_type: AttributeType,
    /// Human-readable description of the function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server capability flags the host reads before invoking optional operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// Whether the provider wants to plan destroy operations.
    pub plan_destroy: bool,
    /// Whether the host may skip fetching the schema before other calls.
    pub get_provider_schema_optional: bool,
    /// Whether the provider supports moving state between resource types.
    pub move_resource_state: bool,
}

/// The full schema catalog a provider advertises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderSchema {
    /// Schema for provider configuration.
    #[serde(default)]
    pub provider: Schema,
    /// Schemas for each managed resource type.
    #[serde(default)]
    pub resource_types: HashMap<String, Schema>,
    /// Schemas for each data source type.
    #[serde(default)]
    pub data_sources: HashMap<String, Schema>,
    /// Schemas for each ephemeral resource type.
    #[serde(default)]
    pub ephemeral_resource_types: HashMap<String, Schema>,
    /// Schemas for each list resource type.
    #[serde(default)]
    pub list_resource_types: HashMap<String, Schema>,
    /// Provider-defined actions.
    #[serde(default)]
    pub actions: HashMap<String, ActionSchema>,
    /// Provider-defined functions.
    #[serde(default)]
    pub functions: HashMap<String, FunctionSchema>,
    /// Optional protocol features this provider supports.
    #[serde(default)]
    pub server_capabilities: ServerCapabilities,
}

impl ProviderSchema {
    /// Create a new empty provider schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider configuration schema.
    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    /// Add a managed resource schema.
    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resource_types.insert(name.into(), schema);
        self
    }

    /// Add a data source schema.
    pub fn with_data_source(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.data_sources.insert(name.into(), schema);
        self
    }

    /// Add a list resource schema.
    pub fn with_list_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.list_resource_types.insert(name.into(), schema);
        self
    }

    /// Set the server capabilities.
    pub fn with_capabilities(mut self, capabilities: ServerCapabilities) -> Self {
        self.server_capabilities = capabilities;
        self
    }

    /// Look up a managed resource schema.
    pub fn resource(&self, type_name: &str) -> Result<&Schema, ProviderError> {
        self.resource_types
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Look up a data source schema.
    pub fn data_source(&self, type_name: &str) -> Result<&Schema, ProviderError> {
        self.data_sources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Look up a list resource schema.
    pub fn list_resource(&self, type_name: &str) -> Result<&Schema, ProviderError> {
        self.list_resource_types
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Identity schemas of every managed resource type that declares one.
    pub fn identity_schemas(&self) -> IdentitySchemas {
        self.resource_types
            .iter()
            .filter_map(|(name, schema)| {
                schema
                    .identity
                    .as_ref()
                    .map(|identity| (name.clone(), identity.clone()))
            })
            .collect()
    }
}
