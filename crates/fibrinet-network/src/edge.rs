//! Network edges
//!
//! Edges connect two distinct nodes and may carry a spring rest length.

use crate::error::{NetworkError, NetworkResult};
use crate::node::{typed_float, typed_int, NodeId};
use crate::schema::{builtin, ComponentVariant, EDGE_FROM, EDGE_ID, EDGE_REST_LENGTH, EDGE_TO};
use crate::value::{Scalar, ScalarType};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

const COMPONENT: &str = "edge";

/// Edge identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EdgeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for EdgeId {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

/// Undirected connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    variant: Arc<ComponentVariant>,
    id: EdgeId,
    from: NodeId,
    to: NodeId,
    rest_length: Option<f64>,
    extra: IndexMap<String, Scalar>,
}

impl Edge {
    /// Build an edge from raw attributes.
    ///
    /// # Errors
    /// - [`NetworkError::SchemaViolation`] for undeclared or missing keys
    /// - [`NetworkError::TypeCoercion`] if a value cannot be cast
    /// - [`NetworkError::SelfLoop`] if both endpoints are the same node
    pub fn from_attributes(
        variant: Arc<ComponentVariant>,
        attrs: &IndexMap<String, Scalar>,
    ) -> NetworkResult<Self> {
        let schema = variant.schema();

        if let Some(unknown) = attrs.keys().find(|key| !schema.contains(key)) {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("unknown attribute '{unknown}' for variant '{}'", variant.name()),
            ));
        }
        if let Some(missing) = schema.required_names().find(|name| !attrs.contains_key(*name)) {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("missing attribute '{missing}' for variant '{}'", variant.name()),
            ));
        }

        let identity = |name: &str| {
            attrs.get(name).ok_or_else(|| {
                NetworkError::schema_violation(
                    COMPONENT,
                    format!("variant '{}' provides no '{name}'", variant.name()),
                )
            })
        };
        let id = EdgeId(typed_int(EDGE_ID, identity(EDGE_ID)?)?);
        let from = NodeId(typed_int(EDGE_FROM, identity(EDGE_FROM)?)?);
        let to = NodeId(typed_int(EDGE_TO, identity(EDGE_TO)?)?);

        if from == to {
            return Err(NetworkError::SelfLoop {
                edge: id.0,
                node: from.0,
            });
        }

        let mut edge = Self {
            variant,
            id,
            from,
            to,
            rest_length: None,
            extra: IndexMap::new(),
        };
        for (name, value) in attrs {
            if ![EDGE_ID, EDGE_FROM, EDGE_TO].contains(&name.as_str()) {
                edge.write(name, value)?;
            }
        }

        Ok(edge)
    }

    /// Plain edge (`edge` variant)
    #[must_use]
    pub fn new(id: impl Into<EdgeId>, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            variant: builtin::edge(),
            id: id.into(),
            from: from.into(),
            to: to.into(),
            rest_length: None,
            extra: IndexMap::new(),
        }
    }

    /// Edge with an explicit rest length (`edge_with_rest_length` variant)
    #[must_use]
    pub fn with_rest_length(
        id: impl Into<EdgeId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        rest_length: f64,
    ) -> Self {
        Self {
            variant: builtin::edge_with_rest_length(),
            rest_length: Some(rest_length),
            ..Self::new(id, from, to)
        }
    }

    /// Edge identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Source endpoint
    #[inline]
    #[must_use]
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Target endpoint
    #[inline]
    #[must_use]
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Whether `node` is one of the endpoints
    #[inline]
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Explicit rest length, if any
    #[inline]
    #[must_use]
    pub fn rest_length(&self) -> Option<f64> {
        self.rest_length
    }

    /// Variant this edge was built against
    #[inline]
    #[must_use]
    pub fn variant(&self) -> &ComponentVariant {
        &self.variant
    }

    /// Declared attributes
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &crate::schema::AttributeSchema {
        self.variant.schema()
    }

    /// Read an attribute by name
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<Scalar> {
        match name {
            EDGE_ID => Some(Scalar::Int(self.id.0)),
            EDGE_FROM => Some(Scalar::Int(self.from.0)),
            EDGE_TO => Some(Scalar::Int(self.to.0)),
            EDGE_REST_LENGTH => self.rest_length.map(Scalar::Float),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Overwrite an attribute after schema check and coercion.
    ///
    /// # Errors
    /// - [`NetworkError::SchemaViolation`] if `name` is not declared
    /// - [`NetworkError::TypeCoercion`] if `value` cannot be cast
    /// - [`NetworkError::SelfLoop`] if an endpoint write joins both ends
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Scalar>) -> NetworkResult<()> {
        let value = value.into();
        if !self.variant.schema().contains(name) {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("unknown attribute '{name}' for variant '{}'", self.variant.name()),
            ));
        }
        match name {
            EDGE_ID => self.id = EdgeId(typed_int(name, &value)?),
            EDGE_FROM | EDGE_TO => {
                let node = NodeId(typed_int(name, &value)?);
                let other = if name == EDGE_FROM { self.to } else { self.from };
                if node == other {
                    return Err(NetworkError::SelfLoop {
                        edge: self.id.0,
                        node: node.0,
                    });
                }
                if name == EDGE_FROM {
                    self.from = node;
                } else {
                    self.to = node;
                }
            }
            other => self.write(other, &value)?,
        }
        Ok(())
    }

    /// All present attributes in schema order
    #[must_use]
    pub fn attributes(&self) -> IndexMap<String, Scalar> {
        self.variant
            .schema()
            .names()
            .filter_map(|name| self.get_attribute(name).map(|v| (name.to_string(), v)))
            .collect()
    }

    fn write(&mut self, name: &str, value: &Scalar) -> NetworkResult<()> {
        let ty = self.variant.schema().type_of(name).unwrap_or(ScalarType::Text);
        let coerced = value.coerce(ty, name)?;
        if name == EDGE_REST_LENGTH {
            self.rest_length = Some(typed_float(name, &coerced)?);
        } else {
            self.extra.insert(name.to_string(), coerced);
        }
        Ok(())
    }
}

impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes = self.attributes();
        let mut map = serializer.serialize_map(Some(attributes.len() + 1))?;
        map.serialize_entry("variant", self.variant.name())?;
        for (name, value) in &attributes {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
