//! Network nodes
//!
//! A [`Node`] is built from a raw attribute mapping against a
//! [`ComponentVariant`]. Well-known attributes (`n_id`, `n_x`, `n_y`,
//! `is_fixed`) become typed fields; anything else the variant declares is
//! kept in a validated side table.

use crate::error::{NetworkError, NetworkResult};
use crate::schema::{builtin, ComponentVariant, NODE_FIXED, NODE_ID, NODE_X, NODE_Y};
use crate::value::{Scalar, ScalarType};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

const COMPONENT: &str = "node";

/// Node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

/// Planar position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create position
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Node in a network
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    variant: Arc<ComponentVariant>,
    id: NodeId,
    x: Option<f64>,
    y: Option<f64>,
    fixed: Option<bool>,
    extra: IndexMap<String, Scalar>,
}

impl Node {
    /// Build a node from raw attributes.
    ///
    /// # Errors
    /// - [`NetworkError::SchemaViolation`] if a key is not declared by the
    ///   variant, a required key is missing, or the variant has no identity
    /// - [`NetworkError::TypeCoercion`] if a value cannot be cast
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
        let Some(raw_id) = attrs.get(NODE_ID) else {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("variant '{}' provides no '{NODE_ID}'", variant.name()),
            ));
        };

        let id = NodeId(typed_int(NODE_ID, raw_id)?);
        let mut node = Self {
            variant,
            id,
            x: None,
            y: None,
            fixed: None,
            extra: IndexMap::new(),
        };

        for (name, value) in attrs {
            if name != NODE_ID {
                node.write(name, value)?;
            }
        }

        if node.x.is_some() != node.y.is_some() {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("node {id} has only one of '{NODE_X}' / '{NODE_Y}'"),
            ));
        }

        Ok(node)
    }

    /// Planar node (`node_2d` variant)
    #[must_use]
    pub fn planar(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            variant: builtin::node_2d(),
            id: id.into(),
            x: Some(x),
            y: Some(y),
            fixed: None,
            extra: IndexMap::new(),
        }
    }

    /// Planar node with an anchor flag (`fixable_node_2d` variant)
    #[must_use]
    pub fn fixable(id: impl Into<NodeId>, x: f64, y: f64, fixed: bool) -> Self {
        Self {
            variant: builtin::fixable_node_2d(),
            fixed: Some(fixed),
            ..Self::planar(id, x, y)
        }
    }

    /// Node identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Variant this node was built against
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

    /// Position, if the node carries both coordinates
    #[inline]
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        }
    }

    /// Anchored nodes are never moved by relaxation
    #[inline]
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.fixed.unwrap_or(false)
    }

    /// Move the node.
    ///
    /// # Errors
    /// - [`NetworkError::SchemaViolation`] if the variant has no coordinates
    /// - [`NetworkError::TypeCoercion`] if a coordinate is not finite
    pub fn set_position(&mut self, position: Position) -> NetworkResult<()> {
        let schema = self.variant.schema();
        if !schema.contains(NODE_X) || !schema.contains(NODE_Y) {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("variant '{}' has no position", self.variant.name()),
            ));
        }
        let x = typed_float(NODE_X, &Scalar::Float(position.x))?;
        let y = typed_float(NODE_Y, &Scalar::Float(position.y))?;
        self.x = Some(x);
        self.y = Some(y);
        Ok(())
    }

    /// Read an attribute by name
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<Scalar> {
        match name {
            NODE_ID => Some(Scalar::Int(self.id.0)),
            NODE_X => self.x.map(Scalar::Float),
            NODE_Y => self.y.map(Scalar::Float),
            NODE_FIXED => self.fixed.map(Scalar::Bool),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Overwrite an attribute after schema check and coercion.
    ///
    /// # Errors
    /// - [`NetworkError::SchemaViolation`] if `name` is not declared
    /// - [`NetworkError::TypeCoercion`] if `value` cannot be cast
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Scalar>) -> NetworkResult<()> {
        let value = value.into();
        if !self.variant.schema().contains(name) {
            return Err(NetworkError::schema_violation(
                COMPONENT,
                format!("unknown attribute '{name}' for variant '{}'", self.variant.name()),
            ));
        }
        if name == NODE_ID {
            self.id = NodeId(typed_int(NODE_ID, &value)?);
            return Ok(());
        }
        self.write(name, &value)
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

    /// Coerce and store a declared, non-identity attribute
    fn write(&mut self, name: &str, value: &Scalar) -> NetworkResult<()> {
        let ty = self.variant.schema().type_of(name).unwrap_or(ScalarType::Text);
        let coerced = value.coerce(ty, name)?;
        match name {
            NODE_X => self.x = Some(typed_float(name, &coerced)?),
            NODE_Y => self.y = Some(typed_float(name, &coerced)?),
            NODE_FIXED => self.fixed = Some(coerced.as_bool().unwrap_or(false)),
            other => {
                self.extra.insert(other.to_string(), coerced);
            }
        }
        Ok(())
    }
}

impl Serialize for Node {
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

/// Coerce to a non-null integer
pub(crate) fn typed_int(name: &str, value: &Scalar) -> NetworkResult<i64> {
    value
        .coerce(ScalarType::Int, name)?
        .as_i64()
        .ok_or_else(|| NetworkError::TypeCoercion {
            attribute: name.to_string(),
            expected: ScalarType::Int,
            value: value.clone(),
        })
}

/// Coerce to a finite, non-null float
pub(crate) fn typed_float(name: &str, value: &Scalar) -> NetworkResult<f64> {
    value
        .coerce(ScalarType::Float, name)?
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| NetworkError::TypeCoercion {
            attribute: name.to_string(),
            expected: ScalarType::Float,
            value: value.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeSchema;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, Scalar)]) -> IndexMap<String, Scalar> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn builds_planar_node_with_coercion() {
        let node = Node::from_attributes(
            builtin::node_2d(),
            &attrs(&[("n_id", "7".into()), ("n_x", 1.into()), ("n_y", "2.5".into())]),
        )
        .unwrap();

        assert_eq!(node.id(), NodeId(7));
        assert_eq!(node.position(), Some(Position::new(1.0, 2.5)));
        assert!(!node.is_fixed());
    }

    #[test]
    fn rejects_unknown_attribute() {
        let err = Node::from_attributes(
            builtin::node_2d(),
            &attrs(&[
                ("n_id", 1.into()),
                ("n_x", 0.0.into()),
                ("n_y", 0.0.into()),
                ("is_fixed", true.into()),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::SchemaViolation { .. }));
    }

    #[test]
    fn rejects_missing_required_attribute() {
        let err = Node::from_attributes(builtin::node_2d(), &attrs(&[("n_id", 1.into())]))
            .unwrap_err();
        assert!(matches!(err, NetworkError::SchemaViolation { .. }));
    }

    #[test]
    fn rejects_uncoercible_position() {
        let err = Node::from_attributes(
            builtin::node_2d(),
            &attrs(&[("n_id", 1.into()), ("n_x", "left".into()), ("n_y", 0.0.into())]),
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::TypeCoercion { .. }));
    }

    #[test]
    fn rejects_non_finite_position() {
        for bad in [Scalar::from("NaN"), Scalar::from("inf"), Scalar::Float(f64::NEG_INFINITY)] {
            let err = Node::from_attributes(
                builtin::node_2d(),
                &attrs(&[("n_id", 1.into()), ("n_x", bad.clone()), ("n_y", 0.0.into())]),
            )
            .unwrap_err();
            assert!(matches!(err, NetworkError::TypeCoercion { .. }), "{bad}");
        }

        let mut node = Node::planar(1, 0.0, 0.0);
        assert!(node.set_position(Position::new(0.0, f64::INFINITY)).is_err());
        assert_eq!(node.position(), Some(Position::new(0.0, 0.0)));
    }

    #[test]
    fn fixed_flag_uses_bool_coercion() {
        let node = Node::from_attributes(
            builtin::fixable_node_2d(),
            &attrs(&[
                ("n_id", 1.into()),
                ("n_x", 0.0.into()),
                ("n_y", 0.0.into()),
                ("is_fixed", "Yes".into()),
            ]),
        )
        .unwrap();
        assert!(node.is_fixed());
    }

    #[test]
    fn extras_live_in_side_table() {
        let variant = Arc::new(ComponentVariant::new(
            "thick_node",
            builtin::node_2d()
                .schema()
                .clone()
                .extend(&AttributeSchema::new().optional("thickness", ScalarType::Float)),
        ));
        let mut node = Node::from_attributes(
            variant,
            &attrs(&[
                ("n_id", 3.into()),
                ("n_x", 0.0.into()),
                ("n_y", 0.0.into()),
                ("thickness", "0.25".into()),
            ]),
        )
        .unwrap();

        assert_eq!(node.get_attribute("thickness"), Some(Scalar::Float(0.25)));
        node.set_attribute("thickness", 2).unwrap();
        assert_eq!(node.get_attribute("thickness"), Some(Scalar::Float(2.0)));
        assert!(node.set_attribute("color", "red").is_err());
    }

    #[test]
    fn set_attribute_validates_and_coerces() {
        let mut node = Node::fixable(1, 0.0, 0.0, false);
        node.set_attribute("is_fixed", "true").unwrap();
        assert!(node.is_fixed());

        node.set_attribute("n_x", "4").unwrap();
        assert_eq!(node.position(), Some(Position::new(4.0, 0.0)));

        let err = node.set_attribute("n_y", "up").unwrap_err();
        assert!(matches!(err, NetworkError::TypeCoercion { .. }));
    }

    #[test]
    fn attributes_follow_schema_order() {
        let node = Node::fixable(2, 1.0, 2.0, true);
        let keys: Vec<_> = node.attributes().keys().cloned().collect();
        assert_eq!(keys, vec!["n_id", "n_x", "n_y", "is_fixed"]);
    }

    #[test]
    fn serializes_flat() {
        let json = serde_json::to_value(Node::planar(1, 0.5, 1.5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"variant": "node_2d", "n_id": 1, "n_x": 0.5, "n_y": 1.5})
        );
    }
}
