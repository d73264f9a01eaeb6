//! Per-vertex adjacency memory
//!
//! Remembers the best-known edge stubs and completeness flags for vertices
//! that already passed through the explorer, so re-fetched neighbors don't
//! trigger redundant adjacency queries.

use std::collections::{HashMap, VecDeque};

use crate::graph::GremlinVertex;

/// Capacity-bounded cache keyed by vertex id. Eviction is FIFO on first
/// insertion; merges do not refresh a vertex's slot in the queue.
pub struct EdgeInfoCache {
    cache: HashMap<String, GremlinVertex>,
    insertion_queue: VecDeque<String>,
    max_nb_vertices: usize,
}

impl EdgeInfoCache {
    pub fn new(max_nb_vertices: usize) -> Self {
        EdgeInfoCache {
            cache: HashMap::new(),
            insertion_queue: VecDeque::new(),
            max_nb_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.insertion_queue.clear();
    }

    /// Remember this vertex. If already cached, merge its stubs into the
    /// cached copy and take the incoming completeness state as authoritative,
    /// keeping the accumulated stub history.
    pub fn add_vertex(&mut self, vertex: GremlinVertex) {
        if let Some(cached) = self.cache.get_mut(&vertex.id) {
            cached.add_edge_info_from(&vertex);
            cached.in_e_all_loaded = vertex.in_e_all_loaded;
            cached.out_e_all_loaded = vertex.out_e_all_loaded;
            cached.in_edge_ids = vertex.in_edge_ids;
            cached.out_edge_ids = vertex.out_edge_ids;
            return;
        }

        if self.cache.len() >= self.max_nb_vertices {
            if let Some(oldest) = self.insertion_queue.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.insertion_queue.push_back(vertex.id.clone());
        self.cache.insert(vertex.id.clone(), vertex);
    }

    /// Enrich a freshly-fetched vertex with previously known adjacency:
    /// cached stubs are merged into `target` and the cached completeness
    /// state wins. Opposite authority direction of [`Self::add_vertex`].
    pub fn merge_edge_info(&self, target: &mut GremlinVertex) {
        if let Some(cached) = self.cache.get(&target.id) {
            target.add_edge_info_from(cached);
            target.in_e_all_loaded = cached.in_e_all_loaded;
            target.out_e_all_loaded = cached.out_e_all_loaded;
            target.in_edge_ids = cached.in_edge_ids.clone();
            target.out_edge_ids = cached.out_edge_ids.clone();
        }
    }
}
