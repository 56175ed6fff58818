//! Raw columnar input
//!
//! Node and edge data arrive column-major (`{"n_id": [1, 2], "n_x": [..]}`)
//! and are pivoted to one attribute mapping per row before construction.

use crate::error::{NetworkError, NetworkResult};
use crate::value::Scalar;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute name → column of values
pub type ColumnTable = IndexMap<String, Vec<Scalar>>;

/// One attribute mapping per row
pub type Row = IndexMap<String, Scalar>;

/// Pre-validated network input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNetworkData {
    /// Network-level metadata
    #[serde(default)]
    pub meta_data: IndexMap<String, Scalar>,
    /// Node columns
    #[serde(default)]
    pub nodes: ColumnTable,
    /// Edge columns
    #[serde(default)]
    pub edges: ColumnTable,
}

impl RawNetworkData {
    /// Create empty input
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metadata entry
    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<Scalar>) -> Self {
        self.meta_data.insert(key.to_string(), value.into());
        self
    }

    /// Add a node column
    #[must_use]
    pub fn with_node_column<V: Into<Scalar>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.nodes
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Add an edge column
    #[must_use]
    pub fn with_edge_column<V: Into<Scalar>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.edges
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Pivot node columns to rows.
    ///
    /// # Errors
    /// [`NetworkError::MalformedInput`] if columns differ in length
    pub fn node_rows(&self) -> NetworkResult<Vec<Row>> {
        pivot("nodes", &self.nodes)
    }

    /// Pivot edge columns to rows.
    ///
    /// # Errors
    /// [`NetworkError::MalformedInput`] if columns differ in length
    pub fn edge_rows(&self) -> NetworkResult<Vec<Row>> {
        pivot("edges", &self.edges)
    }
}

fn pivot(table: &str, columns: &ColumnTable) -> NetworkResult<Vec<Row>> {
    let Some(len) = columns.values().next().map(Vec::len) else {
        return Ok(Vec::new());
    };
    if let Some((name, column)) = columns.iter().find(|(_, column)| column.len() != len) {
        return Err(NetworkError::MalformedInput(format!(
            "{table} column '{name}' has {} values, expected {len}",
            column.len()
        )));
    }

    Ok((0..len)
        .map(|i| {
            columns
                .iter()
                .map(|(name, column)| (name.clone(), column[i].clone()))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pivots_columns_to_rows() {
        let raw = RawNetworkData::new()
            .with_node_column("n_id", [1, 2])
            .with_node_column("n_x", [0.0, 1.0]);

        let rows = raw.node_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["n_id"], Scalar::Int(2));
        assert_eq!(rows[1]["n_x"], Scalar::Float(1.0));
        assert!(raw.edge_rows().unwrap().is_empty());
    }

    #[test]
    fn ragged_table_is_malformed() {
        let raw = RawNetworkData::new()
            .with_edge_column("e_id", [1, 2])
            .with_edge_column("n_from", [1]);
        assert!(matches!(
            raw.edge_rows().unwrap_err(),
            NetworkError::MalformedInput(_)
        ));
    }

    #[test]
    fn deserializes_json_input() {
        let raw: RawNetworkData = serde_json::from_str(
            r#"{
                "meta_data": {"type": "fibrin"},
                "nodes": {"n_id": [1], "n_x": [0.5], "n_y": ["2"]}
            }"#,
        )
        .unwrap();
        assert_eq!(raw.meta_data["type"], Scalar::from("fibrin"));
        assert!(raw.edges.is_empty());
        assert_eq!(raw.node_rows().unwrap()[0]["n_y"], Scalar::from("2"));
    }
}
