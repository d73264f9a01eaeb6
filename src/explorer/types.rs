//! State-machine and editing types for the explorer

use std::collections::HashMap;

use crate::graph::PropertyValue;

/// Lifecycle of one top-level query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterQueryStatus {
    #[default]
    NoResult,
    GraphEmptyResult,
    GraphResult,
    Loading,
    NonGraphResult,
    ErrorResult,
}

/// Display mode layered on top of the query status; a UI concern, not a
/// separate data state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultDisplay {
    #[default]
    None,
    Graph,
    Json,
    Stats,
}

/// Derived state of the currently highlighted node
#[derive(Clone, Debug, PartialEq)]
pub struct GraphHighlightedNodeData {
    pub id: String,
    pub label: Option<String>,
    pub properties: HashMap<String, Vec<PropertyValue>>,
    /// True until this node's neighbor pages were fetched at least once
    pub are_neighbors_unknown: bool,
    pub sources: Vec<NeighborVertexBasicInfo>,
    pub targets: Vec<NeighborVertexBasicInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborVertexBasicInfo {
    pub name: String,
    pub id: String,
    pub edge_id: String,
    pub edge_label: String,
}

impl NeighborVertexBasicInfo {
    pub fn title(&self) -> String {
        format!("edge id: {}, vertex id: {}", self.edge_id, self.id)
    }
}

/// One root candidate for the left-pane list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionId {
    pub caption: String,
    pub id: String,
}

/// Vertex candidate for the edge-editor dropdown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PossibleVertex {
    pub value: String,
    pub caption: String,
}

/// A property as edited in the properties pane
#[derive(Clone, Debug, PartialEq)]
pub struct InputProperty {
    pub key: String,
    pub values: Vec<PropertyValue>,
}

/// Property-editor output: what to keep, add and drop
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditedProperties {
    /// Identity fragment: `'id'` or `[pk, 'id']` on partitioned collections
    pub pk_id: String,
    pub read_only_properties: Vec<InputProperty>,
    pub existing_properties: Vec<InputProperty>,
    pub added_properties: Vec<InputProperty>,
    pub dropped_keys: Vec<String>,
}

impl EditedProperties {
    pub fn new(pk_id: impl Into<String>) -> Self {
        EditedProperties {
            pk_id: pk_id.into(),
            ..Default::default()
        }
    }
}

/// Edge-editor output: neighbors to unlink and edges to create
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditedEdges {
    pub vertex_id: String,
    pub current_neighbors: Vec<NeighborVertexBasicInfo>,
    pub dropped_ids: Vec<String>,
    pub added_edges: Vec<GraphNewEdgeData>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNewEdgeData {
    pub label: String,
    pub input_in_v: String,
    pub input_out_v: String,
}

/// Input for creating a new vertex
#[derive(Clone, Debug, PartialEq)]
pub struct NewVertexData {
    pub label: String,
    pub properties: Vec<InputProperty>,
}

/// Outcome of one top-level user query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQueryResult {
    pub request_charge: String,
}
