//! Canonical in-memory graph: vertex/edge collections and adjacency indexes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::types::{GremlinEdge, GremlinShortInEdge, GremlinShortOutEdge, GremlinVertex};

/// Mapping vertex id -> neighbor id list
pub type MapArray = HashMap<String, Vec<String>>;

/// The authoritative graph the explorer mutates as pages load.
///
/// Adjacency maps may reference ids of vertices not (yet) present in the
/// vertex collection: edges can be known before both endpoints are loaded.
/// Working sets are page-sized, so lookups scan the vertex list directly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(rename = "_vertices")]
    vertices: Vec<GremlinVertex>,
    #[serde(rename = "_edges")]
    edges: Vec<GremlinEdge>,
    /// vertex id -> ids of vertices it points to
    #[serde(rename = "_targetsMap")]
    targets_map: MapArray,
    /// vertex id -> ids of vertices pointing to it
    #[serde(rename = "_sourcesMap")]
    sources_map: MapArray,
}

impl GraphData {
    pub fn new() -> Self {
        GraphData::default()
    }

    pub fn vertices(&self) -> &[GremlinVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[GremlinEdge] {
        &self.edges
    }

    pub fn ids(&self) -> Vec<String> {
        self.vertices.iter().map(|v| v.id.clone()).collect()
    }

    pub fn has_vertex_id(&self, id: &str) -> bool {
        self.vertices.iter().any(|v| v.id == id)
    }

    pub fn get_vertex_by_id(&self, id: &str) -> Option<&GremlinVertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    pub fn get_vertex_mut(&mut self, id: &str) -> Option<&mut GremlinVertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    pub fn get_sources_for_id(&self, id: &str) -> Option<&[String]> {
        self.sources_map.get(id).map(|v| v.as_slice())
    }

    pub fn get_targets_for_id(&self, id: &str) -> Option<&[String]> {
        self.targets_map.get(id).map(|v| v.as_slice())
    }

    /// Add a vertex. No-op if the id is already present. Stub edges pointing
    /// at vertices already in the graph are mirrored onto those neighbors.
    pub fn add_vertex(&mut self, vertex: GremlinVertex) {
        if self.has_vertex_id(&vertex.id) {
            return;
        }
        let stubs = vertex.clone();
        self.vertices.push(vertex);
        self.add_neighbor_info(&stubs);
    }

    /// Look at this vertex's `in_e`/`out_e` and update nodes already in the
    /// graph with the matching counterpart stubs.
    pub fn add_neighbor_info(&mut self, vertex: &GremlinVertex) {
        for (label, edges) in &vertex.in_e {
            for e in edges {
                if let Some(other) = self.get_vertex_mut(&e.out_v) {
                    other.add_out_e(
                        label,
                        GremlinShortOutEdge {
                            id: e.id.clone(),
                            in_v: vertex.id.clone(),
                        },
                    );
                }
            }
        }
        for (label, edges) in &vertex.out_e {
            for e in edges {
                if let Some(other) = self.get_vertex_mut(&e.in_v) {
                    other.add_in_e(
                        label,
                        GremlinShortInEdge {
                            id: e.id.clone(),
                            out_v: vertex.id.clone(),
                        },
                    );
                }
            }
        }
    }

    /// Add an edge. Deduplicated by `(in_v, out_v)` — label is not part of
    /// the key. Adjacency maps are updated unconditionally; the edge object
    /// itself is materialized only when both endpoints are present.
    pub fn add_edge(&mut self, edge: GremlinEdge) {
        if self
            .edges
            .iter()
            .any(|e| e.in_v == edge.in_v && e.out_v == edge.out_v)
        {
            return;
        }

        let has_in = self.has_vertex_id(&edge.in_v);
        let has_out = self.has_vertex_id(&edge.out_v);
        if has_in && has_out {
            self.edges.push(edge.clone());
        }
        Self::add_to_map(&mut self.targets_map, &edge.out_v, &edge.in_v);
        Self::add_to_map(&mut self.sources_map, &edge.in_v, &edge.out_v);

        if has_in {
            if let Some(v) = self.get_vertex_mut(&edge.in_v) {
                v.add_in_e(
                    &edge.label,
                    GremlinShortInEdge {
                        id: edge.id.clone(),
                        out_v: edge.out_v.clone(),
                    },
                );
            }
        }
        if has_out {
            if let Some(v) = self.get_vertex_mut(&edge.out_v) {
                v.add_out_e(
                    &edge.label,
                    GremlinShortOutEdge {
                        id: edge.id.clone(),
                        in_v: edge.in_v.clone(),
                    },
                );
            }
        }
    }

    /// Unload every vertex except the excluded ids (cache eviction, not a
    /// semantic delete: stub references in surviving vertices stay).
    pub fn unload_all_vertices(&mut self, excluded_ids: &[String]) {
        for id in self.ids() {
            if excluded_ids.iter().any(|e| e == &id) {
                continue;
            }
            self.remove_vertex(&id, true);
        }
    }

    /// Erase all references to a vertex: touching edges first, then
    /// adjacency-map entries, then the vertex itself.
    ///
    /// `unload_only` true evicts from the working set without scrubbing the
    /// edge stubs held by other vertices.
    pub fn remove_vertex(&mut self, id: &str, unload_only: bool) {
        if !self.has_vertex_id(id) {
            error!(id, "No vertex to delete found with id");
            return;
        }

        let edge_ids: Vec<String> = self
            .edges
            .iter()
            .filter(|e| e.in_v == id || e.out_v == id)
            .map(|e| e.id.clone())
            .collect();
        for edge_id in edge_ids {
            self.remove_edge(&edge_id, unload_only);
        }

        Self::remove_from_map(&mut self.sources_map, id);
        Self::remove_from_map(&mut self.targets_map, id);

        self.vertices.retain(|v| v.id != id);
    }

    /// Remove an edge from the edge list and adjacency maps. Unless
    /// `unload_only`, also scrub the matching stub from every vertex.
    pub fn remove_edge(&mut self, edge_id: &str, unload_only: bool) {
        if let Some(pos) = self.edges.iter().position(|e| e.id == edge_id) {
            let edge = self.edges.remove(pos);
            Self::remove_elt_from_map(&mut self.sources_map, &edge.in_v, &edge.out_v);
            Self::remove_elt_from_map(&mut self.targets_map, &edge.out_v, &edge.in_v);
        }

        if !unload_only {
            for vertex in &mut self.vertices {
                for edges in vertex.in_e.values_mut() {
                    if let Some(pos) = edges.iter().position(|e| e.id == edge_id) {
                        edges.remove(pos);
                    }
                }
                for edges in vertex.out_e.values_mut() {
                    if let Some(pos) = edges.iter().position(|e| e.id == edge_id) {
                        edges.remove(pos);
                    }
                }
            }
        }
    }

    /// Set this node as root, clearing root and fixed-position flags from
    /// every other node first.
    pub fn set_as_root(&mut self, id: &str) {
        for v in &mut self.vertices {
            v.is_root = false;
            v.fixed_position = false;
        }
        if let Some(v) = self.get_vertex_mut(id) {
            v.is_root = true;
            v.fixed_position = true;
        }
    }

    /// Id of the (at most one) root vertex
    pub fn find_root_node_id(&self) -> Option<String> {
        self.vertices
            .iter()
            .find(|v| v.is_root)
            .map(|v| v.id.clone())
    }

    fn add_to_map(map: &mut MapArray, key: &str, value: &str) {
        let values = map.entry(key.to_string()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    /// Drop the entry for this id, then remove the id from every value list.
    /// Value lists may end up empty.
    fn remove_from_map(map: &mut MapArray, id_to_remove: &str) {
        map.remove(id_to_remove);
        for values in map.values_mut() {
            if let Some(pos) = values.iter().position(|v| v == id_to_remove) {
                values.remove(pos);
            }
        }
    }

    fn remove_elt_from_map(map: &mut MapArray, entry_id: &str, id_to_remove: &str) {
        if let Some(values) = map.get_mut(entry_id) {
            if let Some(pos) = values.iter().position(|v| v == id_to_remove) {
                values.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::GremlinShortOutEdge;

    fn edge(id: &str, out_v: &str, in_v: &str) -> GremlinEdge {
        GremlinEdge {
            id: id.into(),
            in_v: in_v.into(),
            out_v: out_v.into(),
            label: "knows".into(),
        }
    }

    #[test]
    fn test_add_vertex_noop_on_duplicate_id() {
        let mut g = GraphData::new();
        let mut v1 = GremlinVertex::new("a");
        v1.label = Some("first".into());
        let mut v2 = GremlinVertex::new("a");
        v2.label = Some("second".into());
        g.add_vertex(v1);
        g.add_vertex(v2);
        assert_eq!(g.vertices().len(), 1);
        assert_eq!(g.get_vertex_by_id("a").unwrap().label.as_deref(), Some("first"));
    }

    #[test]
    fn test_edge_materialized_only_with_both_endpoints() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("a"));
        g.add_edge(edge("e1", "a", "b"));

        // Adjacency maps updated regardless
        assert!(g.edges().is_empty());
        assert_eq!(g.get_targets_for_id("a"), Some(&["b".to_string()][..]));
        assert_eq!(g.get_sources_for_id("b"), Some(&["a".to_string()][..]));

        let mut g2 = GraphData::new();
        g2.add_vertex(GremlinVertex::new("a"));
        g2.add_vertex(GremlinVertex::new("b"));
        g2.add_edge(edge("e1", "a", "b"));
        assert_eq!(g2.edges().len(), 1);
        // Stubs pushed into both endpoints
        assert_eq!(g2.get_vertex_by_id("a").unwrap().out_e["knows"][0].in_v, "b");
        assert_eq!(g2.get_vertex_by_id("b").unwrap().in_e["knows"][0].out_v, "a");
    }

    #[test]
    fn test_add_edge_dedup_ignores_label() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("a"));
        g.add_vertex(GremlinVertex::new("b"));
        g.add_edge(edge("e1", "a", "b"));
        let mut other = edge("e2", "a", "b");
        other.label = "likes".into();
        g.add_edge(other);
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.edges()[0].id, "e1");
    }

    #[test]
    fn test_single_root_invariant() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("x"));
        g.add_vertex(GremlinVertex::new("y"));
        g.set_as_root("x");
        g.set_as_root("y");
        let roots: Vec<_> = g.vertices().iter().filter(|v| v.is_root).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, "y");
        assert!(!g.get_vertex_by_id("x").unwrap().fixed_position);
        assert_eq!(g.find_root_node_id(), Some("y".to_string()));
    }

    #[test]
    fn test_remove_vertex_cascade() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("a"));
        g.add_vertex(GremlinVertex::new("b"));
        g.add_vertex(GremlinVertex::new("c"));
        g.add_edge(edge("e1", "a", "b"));
        g.add_edge(edge("e2", "b", "c"));

        g.remove_vertex("b", false);

        assert!(!g.has_vertex_id("b"));
        assert!(g.edges().is_empty());
        assert!(g
            .get_targets_for_id("a")
            .map_or(true, |t| !t.contains(&"b".to_string())));
        // Stubs scrubbed from the surviving endpoints
        assert!(g
            .get_vertex_by_id("a")
            .unwrap()
            .out_e
            .values()
            .all(|e| e.is_empty()));
    }

    #[test]
    fn test_remove_edge_unload_only_keeps_stubs() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("a"));
        g.add_vertex(GremlinVertex::new("b"));
        g.add_edge(edge("e1", "a", "b"));

        g.remove_edge("e1", true);
        assert!(g.edges().is_empty());
        assert_eq!(g.get_vertex_by_id("a").unwrap().out_e["knows"].len(), 1);

        // Full delete scrubs the stub too
        g.add_edge(edge("e1", "a", "b"));
        g.remove_edge("e1", false);
        assert!(g.get_vertex_by_id("a").unwrap().out_e["knows"].is_empty());
    }

    #[test]
    fn test_add_vertex_links_stub_edges_to_present_neighbors() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("b"));

        let mut a = GremlinVertex::new("a");
        a.add_out_e(
            "knows",
            GremlinShortOutEdge {
                id: "e1".into(),
                in_v: "b".into(),
            },
        );
        g.add_vertex(a);

        // The already-present neighbor received the counterpart stub
        assert_eq!(g.get_vertex_by_id("b").unwrap().in_e["knows"][0].out_v, "a");
    }

    #[test]
    fn test_remove_missing_vertex_is_noop() {
        let mut g = GraphData::new();
        g.add_vertex(GremlinVertex::new("a"));
        g.remove_vertex("nope", false);
        assert_eq!(g.vertices().len(), 1);
    }
}
