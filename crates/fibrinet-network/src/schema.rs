//! Attribute schemas and component variants
//!
//! A [`ComponentVariant`] names a node or edge shape and the attributes it
//! accepts. A [`NetworkVariant`] names a network shape: the metadata keys it
//! requires and the node/edge attributes every input row must carry.
//!
//! The built-in variants mirror the planar spring networks the rest of the
//! workspace operates on (see [`builtin`]).

use crate::value::ScalarType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node identity attribute
pub const NODE_ID: &str = "n_id";
/// Node x coordinate
pub const NODE_X: &str = "n_x";
/// Node y coordinate
pub const NODE_Y: &str = "n_y";
/// Node anchor flag
pub const NODE_FIXED: &str = "is_fixed";
/// Edge identity attribute
pub const EDGE_ID: &str = "e_id";
/// Edge source endpoint
pub const EDGE_FROM: &str = "n_from";
/// Edge target endpoint
pub const EDGE_TO: &str = "n_to";
/// Edge spring rest length
pub const EDGE_REST_LENGTH: &str = "rest_length";
/// Metadata key holding the spring stiffness `k`
pub const META_STIFFNESS: &str = "spring_stiffness_constant";

/// Declared attribute: type and whether it must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Declared type
    pub ty: ScalarType,
    /// Must be present on construction / for matching
    pub required: bool,
}

/// Ordered name → spec mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSchema {
    fields: IndexMap<String, AttributeSpec>,
}

impl AttributeSchema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required attribute
    #[must_use]
    pub fn required(mut self, name: &str, ty: ScalarType) -> Self {
        self.fields
            .insert(name.to_string(), AttributeSpec { ty, required: true });
        self
    }

    /// Add an optional attribute
    #[must_use]
    pub fn optional(mut self, name: &str, ty: ScalarType) -> Self {
        self.fields
            .insert(name.to_string(), AttributeSpec { ty, required: false });
        self
    }

    /// Union with another schema (entries of `other` win on collision)
    #[must_use]
    pub fn extend(mut self, other: &AttributeSchema) -> Self {
        for (name, spec) in &other.fields {
            self.fields.insert(name.clone(), *spec);
        }
        self
    }

    /// Check if attribute is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up declared spec
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.fields.get(name)
    }

    /// Declared type for `name`
    #[inline]
    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<ScalarType> {
        self.fields.get(name).map(|spec| spec.ty)
    }

    /// All declared names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Required names in declaration order
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, spec)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of declared attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no attribute is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Named node or edge shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVariant {
    name: String,
    schema: AttributeSchema,
}

impl ComponentVariant {
    /// Create variant
    #[must_use]
    pub fn new(name: impl Into<String>, schema: AttributeSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Variant name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }
}

/// Schema a network variant imposes on its input and metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSchema {
    /// Metadata keys (required ones gate matching and export)
    pub meta_data: AttributeSchema,
    /// Attributes every node row must carry (required entries only are checked)
    pub node_attributes: AttributeSchema,
    /// Attributes every edge row must carry (required entries only are checked)
    pub edge_attributes: AttributeSchema,
}

impl NetworkSchema {
    /// Create schema
    #[must_use]
    pub fn new(
        meta_data: AttributeSchema,
        node_attributes: AttributeSchema,
        edge_attributes: AttributeSchema,
    ) -> Self {
        Self {
            meta_data,
            node_attributes,
            edge_attributes,
        }
    }

    /// Required metadata keys
    pub fn required_meta(&self) -> impl Iterator<Item = &str> {
        self.meta_data.required_names()
    }
}

/// Named network shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVariant {
    name: String,
    schema: NetworkSchema,
}

impl NetworkVariant {
    /// Create variant
    #[must_use]
    pub fn new(name: impl Into<String>, schema: NetworkSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Variant name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Network schema
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &NetworkSchema {
        &self.schema
    }
}

/// Built-in planar variants
pub mod builtin {
    use super::{
        AttributeSchema, ComponentVariant, NetworkSchema, NetworkVariant, EDGE_FROM, EDGE_ID,
        EDGE_REST_LENGTH, EDGE_TO, META_STIFFNESS, NODE_FIXED, NODE_ID, NODE_X, NODE_Y,
    };
    use crate::value::ScalarType;
    use once_cell::sync::Lazy;
    use std::sync::Arc;

    /// Name of the fallback network whose components every variant may use
    pub const BASE_NETWORK: &str = "base";
    /// Planar spring network
    pub const NETWORK_2D: &str = "network_2d";

    static NODE: Lazy<Arc<ComponentVariant>> = Lazy::new(|| {
        Arc::new(ComponentVariant::new(
            "node",
            AttributeSchema::new().required(NODE_ID, ScalarType::Int),
        ))
    });

    static NODE_2D: Lazy<Arc<ComponentVariant>> = Lazy::new(|| {
        let schema = NODE
            .schema()
            .clone()
            .required(NODE_X, ScalarType::Float)
            .required(NODE_Y, ScalarType::Float);
        Arc::new(ComponentVariant::new("node_2d", schema))
    });

    static FIXABLE_NODE_2D: Lazy<Arc<ComponentVariant>> = Lazy::new(|| {
        let schema = NODE_2D
            .schema()
            .clone()
            .required(NODE_FIXED, ScalarType::Bool);
        Arc::new(ComponentVariant::new("fixable_node_2d", schema))
    });

    static EDGE: Lazy<Arc<ComponentVariant>> = Lazy::new(|| {
        let schema = AttributeSchema::new()
            .required(EDGE_ID, ScalarType::Int)
            .required(EDGE_FROM, ScalarType::Int)
            .required(EDGE_TO, ScalarType::Int);
        Arc::new(ComponentVariant::new("edge", schema))
    });

    static EDGE_WITH_REST_LENGTH: Lazy<Arc<ComponentVariant>> = Lazy::new(|| {
        let schema = EDGE
            .schema()
            .clone()
            .required(EDGE_REST_LENGTH, ScalarType::Float);
        Arc::new(ComponentVariant::new("edge_with_rest_length", schema))
    });

    static PLANAR_NETWORK: Lazy<Arc<NetworkVariant>> = Lazy::new(|| {
        let meta = AttributeSchema::new()
            .required("network_size", ScalarType::Text)
            .required("total_tension", ScalarType::Float)
            .required("type", ScalarType::Text)
            .optional(META_STIFFNESS, ScalarType::Float);
        Arc::new(NetworkVariant::new(
            NETWORK_2D,
            NetworkSchema::new(meta, NODE_2D.schema().clone(), EDGE.schema().clone()),
        ))
    });

    /// Identity-only node
    #[must_use]
    pub fn node() -> Arc<ComponentVariant> {
        Arc::clone(&NODE)
    }

    /// Node with a planar position
    #[must_use]
    pub fn node_2d() -> Arc<ComponentVariant> {
        Arc::clone(&NODE_2D)
    }

    /// Planar node that may be anchored in place
    #[must_use]
    pub fn fixable_node_2d() -> Arc<ComponentVariant> {
        Arc::clone(&FIXABLE_NODE_2D)
    }

    /// Plain edge
    #[must_use]
    pub fn edge() -> Arc<ComponentVariant> {
        Arc::clone(&EDGE)
    }

    /// Edge carrying an explicit spring rest length
    #[must_use]
    pub fn edge_with_rest_length() -> Arc<ComponentVariant> {
        Arc::clone(&EDGE_WITH_REST_LENGTH)
    }

    /// Planar spring network
    #[must_use]
    pub fn network_2d() -> Arc<NetworkVariant> {
        Arc::clone(&PLANAR_NETWORK)
    }
}
