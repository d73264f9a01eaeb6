//! Helpers that reshape the graph around the current root

use std::collections::HashSet;

use super::data::GraphData;
use super::types::{GremlinEdge, GremlinVertex};

/// Build and add the full edges implied by this vertex's stub lists.
/// `new_nodes` collects the ids of neighbors seen on the way.
pub fn create_edges_from_node(
    vertex: &GremlinVertex,
    graph: &mut GraphData,
    mut new_nodes: Option<&mut HashSet<String>>,
) {
    for (label, edges) in &vertex.out_e {
        for edge in edges {
            // We create our own edge. No need to fetch.
            let e = GremlinEdge {
                id: edge.id.clone(),
                label: label.clone(),
                in_v: edge.in_v.clone(),
                out_v: vertex.id.clone(),
            };
            graph.add_edge(e);
            if let Some(nodes) = new_nodes.as_deref_mut() {
                nodes.insert(edge.in_v.clone());
            }
        }
    }
    for (label, edges) in &vertex.in_e {
        for edge in edges {
            let e = GremlinEdge {
                id: edge.id.clone(),
                label: label.clone(),
                in_v: vertex.id.clone(),
                out_v: edge.out_v.clone(),
            };
            graph.add_edge(e);
            if let Some(nodes) = new_nodes.as_deref_mut() {
                nodes.insert(edge.out_v.clone());
            }
        }
    }
}

/// Unload everything except the current root and its ancestor chain, then
/// mark the survivors' fixed-position flag by ancestor membership.
/// Runs before loading a new page of neighbors so stale subgraphs don't
/// accumulate.
pub fn trim_graph(current_root: &GremlinVertex, graph: &mut GraphData) {
    let mut important_nodes = vec![current_root.id.clone()];
    important_nodes.extend(current_root.ancestors_id.iter().cloned());
    graph.unload_all_vertices(&important_nodes);

    for id in graph.ids() {
        let fixed = important_nodes.iter().any(|n| n == &id);
        if let Some(v) = graph.get_vertex_mut(&id) {
            v.fixed_position = fixed;
        }
    }
}

/// Stamp the child's ancestor chain from the root, add it to the graph and
/// re-derive its edges from its own stub lists.
pub fn add_root_child_to_graph(root: &GremlinVertex, mut child: GremlinVertex, graph: &mut GraphData) {
    child.ancestors_id = root
        .ancestors_id
        .iter()
        .cloned()
        .chain(std::iter::once(root.id.clone()))
        .collect();
    let stubs = child.clone();
    graph.add_vertex(child);
    create_edges_from_node(&stubs, graph, None);
    graph.add_neighbor_info(&stubs);
}
