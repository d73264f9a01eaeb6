//! Gremlin wire types and per-vertex bookkeeping
//!
//! The structs here decode straight from query results (`inE`/`outE`/
//! `properties` keys follow the wire naming) and also carry the local
//! bookkeeping fields the explorer needs: root/fixed-position flags,
//! pagination state, the ancestor chain and the already-materialized edge-id
//! lists. Bookkeeping fields are never present in wire data and default to
//! empty on decode.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Pagination window over a vertex's neighbor edges.
///
/// `current_page.end` is the exclusive upper bound of the page range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Total number of neighbor edges, once both directions are fully loaded
    pub total: Option<usize>,
    #[serde(rename = "currentPage")]
    pub current_page: PageRange,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

/// Stub of an incoming edge as stored on a vertex: the edge id and the
/// id of the vertex at the source end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GremlinShortInEdge {
    pub id: String,
    #[serde(rename = "outV")]
    pub out_v: String,
}

/// Stub of an outgoing edge as stored on a vertex: the edge id and the
/// id of the vertex at the target end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GremlinShortOutEdge {
    pub id: String,
    #[serde(rename = "inV")]
    pub in_v: String,
}

/// A full directed edge: `out_v` is the source, `in_v` the target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GremlinEdge {
    pub id: String,
    #[serde(rename = "inV")]
    pub in_v: String,
    #[serde(rename = "outV")]
    pub out_v: String,
    pub label: String,
}

/// One value of a multi-valued vertex property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GremlinProperty {
    pub id: String,
    pub value: PropertyValue,
}

/// Property values are scalar on the wire; anything else is carried opaquely
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
    Other(serde_json::Value),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// A vertex as fetched from the backend, plus explorer-side bookkeeping.
///
/// `in_e`/`out_e` hold only the edges known so far for this vertex, grouped
/// by label. The bookkeeping fields track what has been loaded and where the
/// vertex sits relative to the current root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GremlinVertex {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "inE", skip_serializing_if = "HashMap::is_empty")]
    pub in_e: HashMap<String, Vec<GremlinShortInEdge>>,
    #[serde(default, rename = "outE", skip_serializing_if = "HashMap::is_empty")]
    pub out_e: HashMap<String, Vec<GremlinShortOutEdge>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Vec<GremlinProperty>>,

    // Local bookkeeping. Not part of the wire format.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed_position: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    /// Ordered id chain from the current root down to this vertex
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors_id: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub in_e_all_loaded: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub out_e_all_loaded: bool,
    /// Ids of outgoing edges already materialized into the graph,
    /// `None` until the first neighbor load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_edge_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_edge_ids: Option<Vec<String>>,
}

fn is_false(b: &bool) -> bool {
    !b
}

impl GremlinVertex {
    pub fn new(id: impl Into<String>) -> Self {
        GremlinVertex {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add an incoming edge stub under `label`, deduplicated by edge id
    pub fn add_in_e(&mut self, label: &str, edge: GremlinShortInEdge) {
        let edges = self.in_e.entry(label.to_string()).or_default();
        if !edges.iter().any(|e| e.id == edge.id) {
            edges.push(edge);
        }
    }

    /// Add an outgoing edge stub under `label`, deduplicated by edge id
    pub fn add_out_e(&mut self, label: &str, edge: GremlinShortOutEdge) {
        let edges = self.out_e.entry(label.to_string()).or_default();
        if !edges.iter().any(|e| e.id == edge.id) {
            edges.push(edge);
        }
    }

    /// Merge all edge stubs from `source` into this vertex
    pub fn add_edge_info_from(&mut self, source: &GremlinVertex) {
        for (label, edges) in &source.out_e {
            for e in edges {
                self.add_out_e(label, e.clone());
            }
        }
        for (label, edges) in &source.in_e {
            for e in edges {
                self.add_in_e(label, e.clone());
            }
        }
    }

    /// Ids of all edge stubs known to this vertex
    pub fn edge_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for edges in self.in_e.values() {
            ids.extend(edges.iter().map(|e| e.id.clone()));
        }
        for edges in self.out_e.values() {
            ids.extend(edges.iter().map(|e| e.id.clone()));
        }
        ids
    }

    /// Union of neighbor ids on both ends of the known stubs
    pub fn children_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for edges in self.out_e.values() {
            for e in edges {
                if seen.insert(e.in_v.clone()) {
                    ids.push(e.in_v.clone());
                }
            }
        }
        for edges in self.in_e.values() {
            for e in edges {
                if seen.insert(e.out_v.clone()) {
                    ids.push(e.out_v.clone());
                }
            }
        }
        ids
    }

    /// Retrieve a displayable value for `prop`: own fields first (`id`,
    /// `label`), then the first value of the named multi-valued property.
    pub fn prop_value(&self, prop: &str) -> Option<PropertyValue> {
        match prop {
            "id" => return Some(PropertyValue::String(self.id.clone())),
            "label" => {
                if let Some(label) = &self.label {
                    return Some(PropertyValue::String(label.clone()));
                }
            }
            _ => {}
        }
        self.properties
            .get(prop)
            .and_then(|values| values.first())
            .map(|p| p.value.clone())
    }

    /// Number of edge stubs currently known to this vertex
    pub fn known_edge_count(&self) -> usize {
        self.out_edge_ids.as_ref().map_or(0, |v| v.len())
            + self.in_edge_ids.as_ref().map_or(0, |v| v.len())
    }
}

/// One element of an edge/vertex pair query result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeVertexPair {
    pub e: GremlinEdge,
    pub v: GremlinVertex,
}
