//! Query orchestration and graph lifecycle
//!
//! [`GraphExplorer`] drives one top-level query at a time: submit the query
//! text to the executor, validate/decode the result, merge pages of
//! neighbors into the authoritative [`GraphData`], and hand structural
//! clones to the renderer. Mutations (vertex/edge create, update, delete)
//! are applied locally only after the backend confirms them.
//!
//! Neighbor pages always load outgoing edges before incoming ones: outgoing
//! edges live in the vertex's own partition while the incoming direction is
//! a fan-out query. The discard logic when re-entering a page range relies
//! on that order.

pub mod types;

#[cfg(test)]
mod tests;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{ArraysByKeyCache, EdgeInfoCache};
use crate::error::{ExplorerError, Result};
use crate::executor::{
    decode_graph_result, ConsoleKind, ConsoleSink, DecodedGraphResult, DocumentQueryPager,
    GremlinRequestResult, ProgressGuard, QueryExecutor,
};
use crate::graph::{
    util, EdgeVertexPair, GraphData, GremlinEdge, GremlinShortInEdge, GremlinShortOutEdge,
    GremlinVertex, PageRange, PaginationInfo, PropertyValue,
};
use crate::query;
use crate::render::{
    D3ForceGraph, GraphEvent, GraphStyleConfig, IconSpec, LoadMoreDataAction, PageAction,
};

pub use types::{
    CaptionId, EditedEdges, EditedProperties, FilterQueryStatus, GraphHighlightedNodeData,
    GraphNewEdgeData, InputProperty, NeighborVertexBasicInfo, NewVertexData, PossibleVertex,
    ResultDisplay, UserQueryResult,
};

/// Collection identity and behavior toggles for one explorer instance
#[derive(Clone, Debug, Default)]
pub struct ExplorerSettings {
    pub database_id: String,
    pub collection_id: String,
    /// Partition-key property of the collection, when partitioned
    pub partition_key_property: Option<String>,
    /// When set, graph results land on the raw-JSON view instead of the
    /// visualization
    pub is_graph_auto_viz_disabled: bool,
}

#[derive(Clone, Debug)]
struct DocDbQueryInfo {
    query: String,
    index: usize,
}

/// Orchestrates query submission, incremental neighbor loading, root
/// selection and vertex/edge mutations over injected backend capabilities.
pub struct GraphExplorer<E, P> {
    executor: E,
    pager: P,
    console: Arc<dyn ConsoleSink>,
    settings: ExplorerSettings,
    style: GraphStyleConfig,
    renderer: Option<D3ForceGraph>,

    /// Authoritative graph, untouched by the renderer's physics
    original_graph_data: GraphData,
    out_e_cache: ArraysByKeyCache<EdgeVertexPair>,
    in_e_cache: ArraysByKeyCache<EdgeVertexPair>,
    edge_info_cache: EdgeInfoCache,

    /// Root candidates of the current query, in insertion order
    root_map: Vec<GremlinVertex>,
    selected_root_id: Option<String>,
    has_more_roots: bool,
    highlighted_node: Option<GraphHighlightedNodeData>,
    possible_edge_labels: Vec<String>,
    node_properties: Vec<String>,
    latest_queries: Vec<String>,

    filter_query_status: FilterQueryStatus,
    result_display: ResultDisplay,
    filter_query_error: Option<String>,
    filter_query_warning: Option<String>,
    query_raw_data: Option<String>,
    query_total_request_charge: String,

    execute_counter: usize,
    /// Bumped on every top-level query; stale continuations drop their
    /// results instead of merging them into a superseded model
    generation: u64,
    current_doc_db_query_info: Option<DocDbQueryInfo>,
}

impl<E: QueryExecutor, P: DocumentQueryPager> GraphExplorer<E, P> {
    /// Number of neighbor nodes to load at a time
    pub const LOAD_PAGE_SIZE: usize = 10;
    pub const PAGE_ALL: usize = 1000;
    const VERTEX_CACHE_SIZE: usize = 500;
    const EDGE_VERTEX_CACHE_MAX_SIZE: usize = 500;
    /// Maximum char size of the exclusion-step parameter
    pub const WITHOUT_STEP_ARGS_MAX_CHARS: usize = 10000;
    pub const ROOT_LIST_PAGE_SIZE: usize = 100;
    const MAX_LATEST_QUERIES: usize = 10;
    /// Caption property applied by default when present
    const DISPLAY_DEFAULT_PROPERTY_KEY: &'static str = "name";
    const REQUEST_CHARGE_UNKNOWN_MSG: &'static str = "Request charge unknown";
    pub const NONE_CHOICE: &'static str = "None";
    pub const DEFAULT_QUERY: &'static str = "g.V()";

    pub fn new(executor: E, pager: P, console: Arc<dyn ConsoleSink>, settings: ExplorerSettings) -> Self {
        GraphExplorer {
            executor,
            pager,
            console,
            settings,
            style: GraphStyleConfig::default(),
            renderer: None,
            original_graph_data: GraphData::new(),
            out_e_cache: ArraysByKeyCache::new(Self::EDGE_VERTEX_CACHE_MAX_SIZE),
            in_e_cache: ArraysByKeyCache::new(Self::EDGE_VERTEX_CACHE_MAX_SIZE),
            edge_info_cache: EdgeInfoCache::new(Self::VERTEX_CACHE_SIZE),
            root_map: Vec::new(),
            selected_root_id: None,
            has_more_roots: false,
            highlighted_node: None,
            possible_edge_labels: Vec::new(),
            node_properties: Vec::new(),
            latest_queries: Vec::new(),
            filter_query_status: FilterQueryStatus::NoResult,
            result_display: ResultDisplay::None,
            filter_query_error: None,
            filter_query_warning: None,
            query_raw_data: None,
            query_total_request_charge: Self::REQUEST_CHARGE_UNKNOWN_MSG.to_string(),
            execute_counter: 0,
            generation: 0,
            current_doc_db_query_info: None,
        }
    }

    /* ------------------------------------------------------------------ */
    /* Renderer wiring                                                     */

    /// Create and attach the force-layout renderer
    pub fn attach_renderer(&mut self) {
        self.renderer = Some(D3ForceGraph::new(self.style.clone()));
    }

    pub fn renderer(&self) -> Option<&D3ForceGraph> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut D3ForceGraph> {
        self.renderer.as_mut()
    }

    /// Dispatch one renderer event back into the explorer
    pub async fn handle_graph_event(&mut self, event: GraphEvent) {
        match event {
            GraphEvent::HighlightedNode(id) => self.on_highlighted_node(id.as_deref()),
            GraphEvent::LoadMoreData(action) => self.on_load_more_data(&action).await,
            GraphEvent::GraphUpdated(_) => {}
        }
    }

    pub fn on_highlighted_node(&mut self, id: Option<&str>) {
        match id {
            None => self.highlighted_node = None,
            Some(id) => self.update_properties_pane(id),
        }
    }

    pub async fn on_load_more_data(&mut self, action: &LoadMoreDataAction) {
        let Some(vertex) = self
            .original_graph_data
            .get_vertex_by_id(&action.node_id)
            .cloned()
        else {
            warn!(node_id = %action.node_id, "Load-more request for unknown vertex");
            return;
        };
        self.original_graph_data.set_as_root(&vertex.id);

        let current_offset = vertex
            .pagination
            .as_ref()
            .map_or(0, |p| p.current_page.start);
        let new_offset = match action.page_action {
            PageAction::FirstPage => 0,
            PageAction::PreviousPage => current_offset.saturating_sub(Self::LOAD_PAGE_SIZE),
            PageAction::NextPage => current_offset + Self::LOAD_PAGE_SIZE,
        };

        if self.load_neighbors_page(&vertex.id, new_offset).await.is_ok() {
            self.update_properties_pane(&vertex.id);
        }
    }

    /// Programmatically highlight a node in the renderer
    pub fn select_node(&mut self, id: &str) {
        match &mut self.renderer {
            Some(renderer) => renderer.select_node(id),
            None => warn!("Attempting to select node, but renderer not initialized, yet."),
        }
    }

    /* ------------------------------------------------------------------ */
    /* Top-level query lifecycle                                           */

    /// User executes a query. Clears all caches and the root-candidate set,
    /// then routes `g.V()` through the document store fast path and
    /// everything else straight to the executor.
    pub async fn submit_query(&mut self, query: &str) {
        self.execute_counter = 0;
        self.root_map.clear();
        self.has_more_roots = false;
        self.selected_root_id = None;
        self.set_filter_query_status(FilterQueryStatus::Loading).await;

        self.out_e_cache.clear();
        self.in_e_cache.clear();
        self.edge_info_cache.clear();

        // Supersede continuations of any previous in-flight query
        self.generation += 1;

        self.push_to_latest_query_fragments(query);

        let outcome = if query.eq_ignore_ascii_case(Self::DEFAULT_QUERY) {
            self.execute_doc_db_gv_query().await
        } else {
            self.execute_gremlin_query(query).await
        };

        match outcome {
            Ok(result) => self.query_total_request_charge = result.request_charge,
            Err(error) => {
                let msg = format!("Failure in submitting query: {}: {}", query, error);
                self.report(ConsoleKind::Error, &msg);
                self.filter_query_error = Some(msg);
            }
        }
    }

    async fn execute_gremlin_query(&mut self, query: &str) -> Result<UserQueryResult> {
        let mut request_charge = Self::REQUEST_CHARGE_UNKNOWN_MSG.to_string();
        let result = match self.submit_to_backend(query).await {
            Ok(result) => {
                self.query_raw_data =
                    Some(serde_json::to_string_pretty(&result.data).unwrap_or_default());
                if let Some(charge) = result.total_request_charge {
                    request_charge = charge.to_string();
                }
                result
            }
            Err(error) => {
                let msg = format!("Failed to execute query: {}: {}", query, error);
                self.report(ConsoleKind::Error, &msg);
                self.filter_query_error = Some(msg);
                self.set_filter_query_status(FilterQueryStatus::ErrorResult).await;
                return Err(error);
            }
        };

        self.process_gremlin_query_results(&result).await;
        Ok(UserQueryResult { request_charge })
    }

    async fn process_gremlin_query_results(&mut self, result: &GremlinRequestResult) {
        self.set_filter_query_status(FilterQueryStatus::GraphEmptyResult).await;

        let Some(data) = &result.data else {
            self.report(ConsoleKind::Error, "Filter query result is null.");
            return;
        };

        match decode_graph_result(data) {
            DecodedGraphResult::Vertices(vertices) => {
                self.add_to_possible_root_nodes_list(&vertices);
                if vertices.is_empty() {
                    self.update_graph_data(GraphData::new());
                    self.highlighted_node = None;
                    self.report(ConsoleKind::Info, "Query result is empty");
                }
                self.set_filter_query_status(FilterQueryStatus::GraphResult).await;
            }
            _ => {
                self.report(ConsoleKind::Info, "Query result is not a graph");
                self.set_filter_query_status(FilterQueryStatus::NonGraphResult).await;
            }
        }
    }

    async fn set_filter_query_status(&mut self, status: FilterQueryStatus) {
        self.filter_query_status = status;
        match status {
            FilterQueryStatus::NoResult | FilterQueryStatus::Loading => {
                self.set_result_display(ResultDisplay::None).await;
                self.filter_query_error = None;
                self.filter_query_warning = None;
            }
            FilterQueryStatus::NonGraphResult | FilterQueryStatus::GraphEmptyResult => {
                self.set_result_display(ResultDisplay::Json).await;
            }
            FilterQueryStatus::GraphResult => {
                if !self.settings.is_graph_auto_viz_disabled {
                    self.set_result_display(ResultDisplay::Graph).await;
                } else {
                    self.set_result_display(ResultDisplay::Json).await;
                }
            }
            FilterQueryStatus::ErrorResult => {
                self.set_result_display(ResultDisplay::None).await;
            }
        }
    }

    /// Switch the result view. Selecting the graph view refreshes the style
    /// dropdown candidates and auto-selects a root.
    pub async fn set_result_display(&mut self, display: ResultDisplay) {
        self.result_display = display;
        if display == ResultDisplay::Graph {
            let candidates = self.root_map.clone();
            self.collect_node_properties(&candidates);
            if self
                .node_properties
                .iter()
                .any(|p| p == Self::DISPLAY_DEFAULT_PROPERTY_KEY)
            {
                self.style.node_caption = Self::DISPLAY_DEFAULT_PROPERTY_KEY.to_string();
            }
            self.auto_select_root_node().await;
        }
    }

    async fn auto_select_root_node(&mut self) {
        if let Some(id) = self.selected_root_id.clone() {
            let _ = self.select_root_node(&id).await;
        } else if let Some(first) = self.get_possible_root_nodes().first().map(|c| c.id.clone()) {
            let _ = self.select_root_node(&first).await;
        }
    }

    /* ------------------------------------------------------------------ */
    /* Backend submission                                                  */

    /// Submit one query to the graph backend, reporting progress and
    /// surfacing truncation warnings.
    pub async fn submit_to_backend(&mut self, cmd: &str) -> Result<GremlinRequestResult> {
        let progress = ProgressGuard::begin(self.console.clone(), &format!("Executing: {}", cmd));
        self.set_execute_counter(self.execute_counter + 1);

        match self.executor.submit(cmd).await {
            Ok(result) => {
                self.set_execute_counter(self.execute_counter.saturating_sub(1));
                drop(progress);
                if result.is_incomplete {
                    let msg = format!(
                        "The query results are too large and only partial results are displayed for: {}",
                        cmd
                    );
                    self.report(ConsoleKind::Error, &msg);
                    self.filter_query_warning = Some(msg);
                }
                self.report(
                    ConsoleKind::Info,
                    &format!(
                        "Executed: {} {}",
                        cmd,
                        Self::request_charge_string(result.total_request_charge)
                    ),
                );
                Ok(result)
            }
            Err(message) => {
                self.set_execute_counter(self.execute_counter.saturating_sub(1));
                drop(progress);
                self.report(
                    ConsoleKind::Error,
                    &format!("Gremlin query failed: {}: {}", cmd, message),
                );
                Err(ExplorerError::Executor {
                    query: cmd.to_string(),
                    message,
                })
            }
        }
    }

    fn request_charge_string(request_charge: Option<f64>) -> String {
        match request_charge {
            None => String::new(),
            Some(charge) => format!("({} RUs)", charge),
        }
    }

    /* ------------------------------------------------------------------ */
    /* Neighbor pagination                                                 */

    /// Query one page of edge+vertex pairs for a direction, cache first.
    ///
    /// On a miss the query excludes already-loaded edge ids, the result
    /// shape is validated and each pair lands in the page cache and gets
    /// enriched from the edge-info cache.
    pub async fn fetch_edge_vertex_pairs(
        &mut self,
        out_e: bool,
        vertex: &GremlinVertex,
        start_index: usize,
        page_size: usize,
    ) -> Result<Vec<EdgeVertexPair>> {
        let generation = self.generation;
        let direction = if out_e { "outE" } else { "inE" };

        // Сначала пробуем кэш
        let cache = if out_e { &self.out_e_cache } else { &self.in_e_cache };
        if let Some(pairs) = cache.retrieve(&vertex.id, start_index, page_size) {
            self.report(
                ConsoleKind::Info,
                &format!(
                    "Retrieved {} {} edges from cache for vertex id: {}",
                    pairs.len(),
                    direction,
                    vertex.id
                ),
            );
            return Ok(pairs);
        }

        let excluded_edge_ids = if out_e {
            vertex.out_edge_ids.clone()
        } else {
            vertex.in_edge_ids.clone()
        }
        .unwrap_or_default();
        let pkid = query::pk_id_from_vertex(vertex, self.settings.partition_key_property.as_deref());
        let gremlin_query = query::create_fetch_edge_pair_query(
            out_e,
            &pkid,
            &excluded_edge_ids,
            start_index,
            page_size,
            Self::WITHOUT_STEP_ARGS_MAX_CHARS,
        );

        let result = self.submit_to_backend(&gremlin_query).await?;
        let Some(data) = result.data else {
            let error = format!(
                "Failed to load incoming edge/pairs for {} (query result is null)",
                vertex.id
            );
            self.report(ConsoleKind::Error, &error);
            return Err(ExplorerError::MalformedResult(error));
        };

        let mut pairs = match decode_graph_result(&data) {
            DecodedGraphResult::EdgePairs(pairs) => pairs,
            DecodedGraphResult::Vertices(vertices) if vertices.is_empty() => Vec::new(),
            _ => {
                let error = format!(
                    "Failed to load incoming edge/pairs for {} (query result not a valid array of edge/vertex pairs)",
                    vertex.id
                );
                self.report(ConsoleKind::Error, &error);
                return Err(ExplorerError::MalformedResult(error));
            }
        };

        if self.is_stale(generation) {
            // A newer query already cleared these caches; hand the data back
            // without touching them.
            return Ok(pairs);
        }

        for (i, pair) in pairs.iter_mut().enumerate() {
            self.edge_info_cache.merge_edge_info(&mut pair.v);
            if out_e {
                self.out_e_cache.insert(&vertex.id, start_index + i, pair.clone());
            } else {
                self.in_e_cache.insert(&vertex.id, start_index + i, pair.clone());
            }
        }

        Ok(pairs)
    }

    /// Load one page of a vertex's neighbors starting at `offset_index`.
    ///
    /// Fetches up to page size + 1 outgoing pairs (the extra element probes
    /// whether more exist), then fills the remaining page budget with
    /// incoming pairs under the same probe. Every fetched neighbor joins the
    /// graph as a child of this vertex.
    pub async fn load_neighbors_page(&mut self, vertex_id: &str, offset_index: usize) -> Result<()> {
        let generation = self.generation;

        if !self.original_graph_data.has_vertex_id(vertex_id) {
            self.report(
                ConsoleKind::Error,
                &format!("Failed to load neighbors: no vertex with id: {}", vertex_id),
            );
            return Ok(());
        }

        {
            let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
            vertex.out_edge_ids.get_or_insert_with(Vec::new);
            vertex.in_edge_ids.get_or_insert_with(Vec::new);
        }

        let (out_len, in_len, out_all, in_all) = self.edge_bookkeeping(vertex_id);
        if offset_index >= out_len + in_len && out_all && in_all {
            info!("No more edges to load for vertex {}", vertex_id);
            self.finish_neighbors_update(vertex_id);
            return Ok(());
        }

        // Discard previously loaded edge ids at or beyond the offset. Pages
        // are fetched outE-first, so a cut inside the outE range resets both
        // directions while a cut inside the inE range only trims inE.
        {
            let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
            if offset_index <= out_len {
                vertex.out_edge_ids.as_mut().unwrap().truncate(offset_index);
                vertex.in_edge_ids = Some(Vec::new());
                vertex.out_e_all_loaded = false;
                vertex.in_e_all_loaded = false;
            } else if offset_index <= out_len + in_len {
                let relative_offset = offset_index - out_len;
                vertex.in_edge_ids.as_mut().unwrap().truncate(relative_offset);
            }
        }

        let root_snapshot = self
            .original_graph_data
            .get_vertex_by_id(vertex_id)
            .unwrap()
            .clone();
        util::trim_graph(&root_snapshot, &mut self.original_graph_data);

        let total_edges_to_fetch = Self::LOAD_PAGE_SIZE + 1;
        let mut added_edges_nb = 0usize;
        let mut fetched_nb = 0usize;

        // Phase 1: outgoing pairs
        if !root_snapshot.out_e_all_loaded {
            let fetch_source = self
                .original_graph_data
                .get_vertex_by_id(vertex_id)
                .unwrap()
                .clone();
            let pairs = self
                .fetch_edge_vertex_pairs(true, &fetch_source, offset_index, total_edges_to_fetch)
                .await?;
            if self.is_stale(generation) {
                return Ok(());
            }

            {
                let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                vertex.out_e_all_loaded = pairs.len() < total_edges_to_fetch;
            }
            let root_ref = self
                .original_graph_data
                .get_vertex_by_id(vertex_id)
                .unwrap()
                .clone();
            for pair in pairs.iter().take(Self::LOAD_PAGE_SIZE) {
                {
                    let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                    vertex.add_out_e(
                        &pair.e.label,
                        GremlinShortOutEdge {
                            id: pair.e.id.clone(),
                            in_v: pair.e.in_v.clone(),
                        },
                    );
                }
                util::add_root_child_to_graph(&root_ref, pair.v.clone(), &mut self.original_graph_data);
                self.original_graph_data.add_edge(pair.e.clone());
                {
                    let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                    vertex
                        .out_edge_ids
                        .get_or_insert_with(Vec::new)
                        .push(pair.e.id.clone());
                }
                // The graph copy of the child now carries merged stub info
                if let Some(child) = self.original_graph_data.get_vertex_by_id(&pair.v.id) {
                    let child = child.clone();
                    self.edge_info_cache.add_vertex(child);
                }
            }
            added_edges_nb += pairs.len().min(Self::LOAD_PAGE_SIZE);
            fetched_nb = pairs.len();
        }

        // Phase 2: incoming pairs fill whatever page budget remains
        let in_edges_to_fetch = total_edges_to_fetch.saturating_sub(fetched_nb);
        let (out_len_now, _, _, in_all_now) = self.edge_bookkeeping(vertex_id);
        if !in_all_now && in_edges_to_fetch > 0 {
            let start = if offset_index <= out_len_now {
                0
            } else {
                offset_index - out_len_now
            };
            let fetch_source = self
                .original_graph_data
                .get_vertex_by_id(vertex_id)
                .unwrap()
                .clone();
            let pairs = self
                .fetch_edge_vertex_pairs(false, &fetch_source, start, in_edges_to_fetch)
                .await?;
            if self.is_stale(generation) {
                return Ok(());
            }

            {
                let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                vertex.in_e_all_loaded = pairs.len() < in_edges_to_fetch;
            }
            let root_ref = self
                .original_graph_data
                .get_vertex_by_id(vertex_id)
                .unwrap()
                .clone();
            let take_n = Self::LOAD_PAGE_SIZE.saturating_sub(fetched_nb);
            for pair in pairs.iter().take(take_n) {
                {
                    let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                    vertex.add_in_e(
                        &pair.e.label,
                        GremlinShortInEdge {
                            id: pair.e.id.clone(),
                            out_v: pair.e.out_v.clone(),
                        },
                    );
                }
                util::add_root_child_to_graph(&root_ref, pair.v.clone(), &mut self.original_graph_data);
                self.original_graph_data.add_edge(pair.e.clone());
                {
                    let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
                    vertex
                        .in_edge_ids
                        .get_or_insert_with(Vec::new)
                        .push(pair.e.id.clone());
                }
                if let Some(child) = self.original_graph_data.get_vertex_by_id(&pair.v.id) {
                    let child = child.clone();
                    self.edge_info_cache.add_vertex(child);
                }
            }
            added_edges_nb += pairs.len().min(take_n);
        }

        // Pagination bookkeeping: the total becomes known only once both
        // directions report fully loaded; the current page always reflects
        // the actual fetched range.
        let (out_len, in_len, out_all, in_all) = self.edge_bookkeeping(vertex_id);
        if offset_index >= Self::LOAD_PAGE_SIZE || !out_all || !in_all {
            let vertex = self.original_graph_data.get_vertex_mut(vertex_id).unwrap();
            let prior_total = vertex.pagination.as_ref().and_then(|p| p.total);
            vertex.pagination = Some(PaginationInfo {
                total: prior_total.or(if out_all && in_all {
                    Some(out_len + in_len)
                } else {
                    None
                }),
                current_page: PageRange {
                    start: offset_index,
                    end: offset_index + added_edges_nb,
                },
            });
        }

        self.finish_neighbors_update(vertex_id);
        Ok(())
    }

    fn edge_bookkeeping(&self, vertex_id: &str) -> (usize, usize, bool, bool) {
        let vertex = self
            .original_graph_data
            .get_vertex_by_id(vertex_id)
            .expect("vertex present");
        (
            vertex.out_edge_ids.as_ref().map_or(0, |v| v.len()),
            vertex.in_edge_ids.as_ref().map_or(0, |v| v.len()),
            vertex.out_e_all_loaded,
            vertex.in_e_all_loaded,
        )
    }

    /// Common epilogue of a neighbor load: remember the vertex's adjacency,
    /// re-assert it as root, sync the root-candidate copy and refresh the
    /// renderer.
    fn finish_neighbors_update(&mut self, vertex_id: &str) {
        if let Some(vertex) = self.original_graph_data.get_vertex_by_id(vertex_id) {
            let vertex = vertex.clone();
            self.edge_info_cache.add_vertex(vertex);
        }
        self.original_graph_data.set_as_root(vertex_id);

        if let Some(updated) = self.original_graph_data.get_vertex_by_id(vertex_id).cloned() {
            if let Some(slot) = self.root_map.iter_mut().find(|v| v.id == vertex_id) {
                *slot = updated;
            }
        }
        self.push_graph_to_renderer();
    }

    /* ------------------------------------------------------------------ */
    /* Root selection                                                      */

    /// Rebuild the graph around one root candidate and load its first page
    /// of neighbors.
    pub async fn select_root_node(&mut self, id: &str) -> Result<()> {
        match &mut self.renderer {
            Some(renderer) => renderer.reset_zoom(),
            None => warn!("Attempting to reset zoom, but renderer not initialized, yet."),
        }

        let Some(mut root) = self.root_map.iter().find(|v| v.id == id).cloned() else {
            self.report(
                ConsoleKind::Error,
                &format!("Failed to select root node: no known vertex with id:{}", id),
            );
            return Err(ExplorerError::UnknownRootCandidate(id.to_string()));
        };

        self.selected_root_id = Some(id.to_string());

        // Reset paging when the known link count exceeds one page, forcing a
        // clean first page
        if root.out_e_all_loaded
            && root.in_e_all_loaded
            && root.known_edge_count() > Self::LOAD_PAGE_SIZE
        {
            root.out_edge_ids = None;
            root.in_edge_ids = None;
            root.out_e_all_loaded = false;
            root.in_e_all_loaded = false;
        }

        let mut graph_data = GraphData::new();
        graph_data.add_vertex(root);
        graph_data.set_as_root(id);
        self.original_graph_data = graph_data;

        match self.load_neighbors_page(id, 0).await {
            Ok(()) => {
                let vertices = self.original_graph_data.vertices().to_vec();
                self.collect_node_properties(&vertices);
                self.update_properties_pane(id);
                Ok(())
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to select root node. Reason:{}", error),
                );
                Err(error)
            }
        }
    }

    fn add_to_possible_root_nodes_list(&mut self, vertices: &[GremlinVertex]) {
        for vertex in vertices {
            match self.root_map.iter_mut().find(|v| v.id == vertex.id) {
                Some(slot) => *slot = vertex.clone(),
                None => self.root_map.push(vertex.clone()),
            }
        }
    }

    /// Root candidates with their display captions
    pub fn get_possible_root_nodes(&self) -> Vec<CaptionId> {
        self.root_map
            .iter()
            .map(|vertex| CaptionId {
                caption: vertex
                    .prop_value(&self.style.node_caption)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| vertex.id.clone()),
                id: vertex.id.clone(),
            })
            .collect()
    }

    /* ------------------------------------------------------------------ */
    /* Vertex/edge mutations (executor-confirmed)                          */

    /// Apply property edits: sequential drops first, then one update query.
    /// The local graph is only refreshed from the backend's response.
    pub async fn update_vertex_properties(
        &mut self,
        edited: &EditedProperties,
    ) -> Result<GremlinRequestResult> {
        let partition_key_property = self.settings.partition_key_property.clone();

        let mut update_query_fragment = String::new();
        for property in edited
            .existing_properties
            .iter()
            .chain(edited.added_properties.iter())
        {
            // The partition key cannot be updated
            if Some(&property.key) == partition_key_property.as_ref() {
                continue;
            }
            // Multi-valued properties cannot be updated either
            if property.values.len() != 1 {
                continue;
            }
            if let Some(value) = query::quoted_prop_value(&property.values[0]) {
                update_query_fragment.push_str(&format!(
                    ".Property(\"{}\", {})",
                    query::escape_double_quotes(&property.key),
                    value
                ));
            }
        }

        let dropped_keys: Vec<&String> = edited
            .dropped_keys
            .iter()
            .filter(|key| Some(*key) != partition_key_property.as_ref())
            .collect();

        if update_query_fragment.is_empty() && dropped_keys.is_empty() {
            self.report(ConsoleKind::Info, "Nothing to update");
            return Ok(GremlinRequestResult::default());
        }

        let outcome: Result<GremlinRequestResult> = async {
            // Drops go one by one: the backend rejects batched drops
            for key in &dropped_keys {
                self.submit_to_backend(&format!(
                    "g.V({}).properties(\"{}\").drop()",
                    edited.pk_id,
                    query::escape_double_quotes(key)
                ))
                .await?;
            }
            // Runs even with an empty fragment so the response carries the
            // vertex for the in-memory refresh
            self.submit_to_backend(&format!("g.V({}){}", edited.pk_id, update_query_fragment))
                .await
        }
        .await;

        match outcome {
            Ok(result) => {
                let vertices = self.original_graph_data.vertices().to_vec();
                self.collect_node_properties(&vertices);
                self.update_in_memory_graph(result.data.as_ref());
                self.push_graph_to_renderer();
                Ok(result)
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to update vertex properties: {}", error),
                );
                Err(error)
            }
        }
    }

    /// Create a new edge remotely and mirror it into the local graph
    pub async fn create_new_edge(&mut self, edge_data: &GraphNewEdgeData) -> Result<()> {
        let cmd = format!(
            "g.V('{}').addE('{}').To(g.V('{}'))",
            query::escape_single_quotes(&edge_data.input_out_v),
            query::escape_single_quotes(&edge_data.label),
            query::escape_single_quotes(&edge_data.input_in_v)
        );

        match self.submit_to_backend(&cmd).await {
            Ok(result) => {
                let edges: Option<Vec<GremlinEdge>> = result
                    .data
                    .and_then(|data| serde_json::from_value(data).ok());
                let Some(edges) = edges else {
                    self.report(ConsoleKind::Error, "Failed to create edge (empty response).");
                    return Ok(());
                };
                let Some(edge) = edges.first().cloned() else {
                    self.report(ConsoleKind::Error, "Failed to create edge (no edge in response).");
                    return Ok(());
                };

                self.original_graph_data.add_edge(edge.clone());

                // Force the next neighbor load to pick up the new edge
                if let Some(v) = self.original_graph_data.get_vertex_mut(&edge.in_v) {
                    v.out_e_all_loaded = false;
                }
                if let Some(v) = self.original_graph_data.get_vertex_mut(&edge.out_v) {
                    v.in_e_all_loaded = false;
                }

                self.push_graph_to_renderer();
                Ok(())
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to create edge (Gremlin query failed to execute): {}", error),
                );
                Err(error)
            }
        }
    }

    /// The opposite of [`Self::create_new_edge`]: drop remotely, then update
    /// the in-memory graph.
    pub async fn remove_edge(&mut self, edge_id: &str) -> Result<()> {
        let cmd = format!("g.E('{}').drop()", query::escape_single_quotes(edge_id));
        match self.submit_to_backend(&cmd).await {
            Ok(_) => {
                self.original_graph_data.remove_edge(edge_id, false);
                self.push_graph_to_renderer();
                Ok(())
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to remove edge (Gremlin query failed to execute): {}", error),
                );
                Err(error)
            }
        }
    }

    /// Create a new vertex and select it as root
    pub async fn add_vertex(&mut self, vertex_data: &NewVertexData) -> Result<()> {
        let mut cmd = format!("g.AddV('{}')", query::escape_single_quotes(&vertex_data.label));
        for property in &vertex_data.properties {
            if let Some(value) = property.values.first().and_then(query::quoted_prop_value) {
                cmd.push_str(&format!(
                    ".Property('{}', {})",
                    query::escape_single_quotes(&property.key),
                    value
                ));
            }
        }

        match self.submit_to_backend(&cmd).await {
            Ok(result) => {
                let vertices = result
                    .data
                    .as_ref()
                    .map(decode_graph_result)
                    .and_then(|decoded| match decoded {
                        DecodedGraphResult::Vertices(v) => Some(v),
                        _ => None,
                    });
                let Some(vertices) = vertices else {
                    let err = "Failed to create vertex (no data in new vertex response)";
                    self.report(ConsoleKind::Error, err);
                    return Err(ExplorerError::MalformedResult(err.to_string()));
                };
                let Some(vertex) = vertices.first().cloned() else {
                    let err = "Failed to create vertex (no vertex in response)";
                    self.report(ConsoleKind::Error, err);
                    return Err(ExplorerError::MalformedResult(err.to_string()));
                };

                self.original_graph_data.add_vertex(vertex.clone());
                self.push_graph_to_renderer();
                let all_vertices = self.original_graph_data.vertices().to_vec();
                self.collect_node_properties(&all_vertices);

                // Keep the new vertex selected
                self.update_properties_pane(&vertex.id);
                self.set_filter_query_status(FilterQueryStatus::GraphResult).await;

                self.add_to_possible_root_nodes_list(std::slice::from_ref(&vertex));
                let _ = self.select_root_node(&vertex.id).await;
                Ok(())
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to create vertex (Gremlin query failed to execute) :{}", error),
                );
                Err(error)
            }
        }
    }

    /// Drop the highlighted vertex remotely, then locally, and fall back to
    /// the first remaining root candidate.
    pub async fn delete_highlighted_node(&mut self) -> Result<()> {
        let Some(highlighted) = self.highlighted_node.clone() else {
            self.report(ConsoleKind::Error, "No highlighted node to remove.");
            return Ok(());
        };

        let pk_id = self.pk_id_from_node_data(&highlighted);
        match self.submit_to_backend(&format!("g.V({}).drop()", pk_id)).await {
            Ok(_) => {
                self.original_graph_data.remove_vertex(&highlighted.id, false);
                self.push_graph_to_renderer();
                self.highlighted_node = None;
                self.root_map.retain(|v| v.id != highlighted.id);

                if let Some(first) = self.get_possible_root_nodes().first().map(|c| c.id.clone()) {
                    let _ = self.select_root_node(&first).await;
                }
                Ok(())
            }
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!(
                        "Failed to remove node (Gremlin failed to execute). id={} : {}",
                        highlighted.id, error
                    ),
                );
                Err(error)
            }
        }
    }

    /// Apply an edge-editor batch: drops, then additions. Each addition
    /// reloads the highlighted node's first neighbor page in case it linked
    /// to a vertex that isn't loaded into the graph.
    pub async fn edit_graph_edges(&mut self, edited: &EditedEdges) -> Result<()> {
        for edge_id in &edited.dropped_ids {
            let _ = self.remove_edge(edge_id).await;
        }

        for edge_data in &edited.added_edges {
            if self.create_new_edge(edge_data).await.is_ok() {
                if let Some(id) = self.highlighted_node.as_ref().map(|h| h.id.clone()) {
                    let _ = self.load_neighbors_page(&id, 0).await;
                }
            }
        }

        if let Some(id) = self.highlighted_node.as_ref().map(|h| h.id.clone()) {
            self.update_properties_pane(&id);
        }
        Ok(())
    }

    /* ------------------------------------------------------------------ */
    /* Document-store queries                                              */

    /// Run a non-paged document query, returning all results or `None` on
    /// failure (reported, never thrown).
    pub async fn execute_non_paged_doc_db_query(&mut self, query_str: &str) -> Option<Vec<Value>> {
        match self
            .pager
            .fetch_page(
                &self.settings.database_id,
                &self.settings.collection_id,
                query_str,
                0,
                Self::PAGE_ALL,
            )
            .await
        {
            Ok(page) => Some(page.documents),
            Err(error) => {
                self.report(
                    ConsoleKind::Error,
                    &format!("Failed to execute non-paged query {}. Reason:{}", query_str, error),
                );
                None
            }
        }
    }

    /// `g.V()` fast path: enumerate root-candidate documents instead of
    /// pulling every vertex through the graph backend.
    async fn execute_doc_db_gv_query(&mut self) -> Result<UserQueryResult> {
        let doc_query = match &self.settings.partition_key_property {
            Some(pk) => format!(
                "select root.id, root.{} from root where IS_DEFINED(root._isEdge) = false order by root._ts asc",
                pk
            ),
            None => "select root.id from root where IS_DEFINED(root._isEdge) = false order by root._ts desc"
                .to_string(),
        };
        self.current_doc_db_query_info = Some(DocDbQueryInfo {
            query: doc_query,
            index: 0,
        });
        self.load_more_root_nodes().await
    }

    /// Fetch the next page of root candidates and load them as vertices
    pub async fn load_more_root_nodes(&mut self) -> Result<UserQueryResult> {
        let Some(info) = self.current_doc_db_query_info.clone() else {
            return Ok(UserQueryResult {
                request_charge: Self::REQUEST_CHARGE_UNKNOWN_MSG.to_string(),
            });
        };

        let query_info_str = format!(
            "{} ({}-{})",
            info.query,
            info.index + 1,
            info.index + Self::ROOT_LIST_PAGE_SIZE
        );
        let progress =
            ProgressGuard::begin(self.console.clone(), &format!("Executing: {}", query_info_str));

        let page = match self
            .pager
            .fetch_page(
                &self.settings.database_id,
                &self.settings.collection_id,
                &info.query,
                info.index,
                Self::ROOT_LIST_PAGE_SIZE,
            )
            .await
        {
            Ok(page) => page,
            Err(error) => {
                drop(progress);
                return self.fail_root_nodes_query(&info.query, &error).await;
            }
        };
        drop(progress);

        if let Some(current) = &mut self.current_doc_db_query_info {
            current.index = page.last_item_index + 1;
        }
        self.has_more_roots = page.has_more_results;
        let request_charge = page.request_charge.to_string();
        self.report(
            ConsoleKind::Info,
            &format!("Executed: {} ({} RUs)", query_info_str, request_charge),
        );

        let pk_ids: Result<Vec<String>> = page
            .documents
            .iter()
            .map(|doc| query::pk_id_from_document(doc, self.settings.partition_key_property.as_deref()))
            .collect();
        let pk_ids = match pk_ids {
            Ok(ids) => ids,
            Err(error) => {
                let message = error.to_string();
                self.fail_root_nodes_query(&info.query, &message).await?;
                return Err(error);
            }
        };

        self.execute_gremlin_query(&format!("g.V({})", pk_ids.join(","))).await?;

        Ok(UserQueryResult { request_charge })
    }

    async fn fail_root_nodes_query(&mut self, doc_query: &str, error: &str) -> Result<UserQueryResult> {
        let msg = format!("Failed to query: {}. Reason:{}", doc_query, error);
        self.report(ConsoleKind::Error, &msg);
        self.filter_query_error = Some(msg);
        self.set_filter_query_status(FilterQueryStatus::ErrorResult).await;
        Err(ExplorerError::DocumentQuery {
            query: doc_query.to_string(),
            message: error.to_string(),
        })
    }

    /// Vertex candidates for the edge-editor dropdown, excluding the
    /// highlighted node.
    pub async fn update_possible_vertices(&mut self) -> Vec<PossibleVertex> {
        let highlighted_id = self.highlighted_node.as_ref().map(|h| h.id.clone());
        let caption_key = if self.style.node_caption.is_empty() {
            "id"
        } else {
            self.style.node_caption.as_str()
        };
        let doc_query = format!(
            "SELECT c.id, c[\"{}\"] AS p FROM c WHERE NOT IS_DEFINED(c._isEdge)",
            caption_key
        );

        let Some(documents) = self.execute_non_paged_doc_db_query(&doc_query).await else {
            return Vec::new();
        };

        let mut possible_vertices = Vec::new();
        for item in documents {
            let Some(id) = item.get("id").and_then(Value::as_str) else {
                continue;
            };
            if Some(id) == highlighted_id.as_deref() {
                continue;
            }
            // p is a string for id/label captions, else the property array
            match item.get("p") {
                Some(Value::String(caption)) => possible_vertices.push(PossibleVertex {
                    value: id.to_string(),
                    caption: caption.clone(),
                }),
                Some(Value::Array(values)) => {
                    if let Some(caption) = values
                        .first()
                        .and_then(|v| v.get("_value"))
                        .and_then(Value::as_str)
                    {
                        possible_vertices.push(PossibleVertex {
                            value: id.to_string(),
                            caption: caption.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        possible_vertices
    }

    /// Map a node property to an icon set stored in the collection
    pub async fn update_node_icons(&mut self, node_prop: &str, icon_set: Option<&str>) {
        if node_prop == Self::NONE_CHOICE {
            self.style.node_icon_key = None;
            self.push_config_to_renderer();
            return;
        }

        let icon_set = icon_set
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.settings.collection_id)
            .to_string();
        let doc_query = format!(
            "SELECT c._graph_icon_property_value, c.format, c.icon FROM c WHERE c._graph_icon_set = \"{}\"",
            query::escape_double_quotes(&icon_set)
        );

        let Some(documents) = self.execute_non_paged_doc_db_query(&doc_query).await else {
            self.report(
                ConsoleKind::Error,
                &format!("Failed to retrieve icons. iconSet:{}", icon_set),
            );
            return;
        };

        let mut icons_map = HashMap::new();
        for doc in documents {
            let (Some(value), Some(data), Some(format)) = (
                doc.get("_graph_icon_property_value").and_then(Value::as_str),
                doc.get("icon").and_then(Value::as_str),
                doc.get("format").and_then(Value::as_str),
            ) else {
                continue;
            };
            icons_map.insert(
                value.to_string(),
                IconSpec {
                    data: data.to_string(),
                    format: format.to_string(),
                },
            );
        }

        self.style.icons_map = icons_map;
        self.style.node_icon_key = Some(node_prop.to_string());
        self.push_config_to_renderer();
    }

    /* ------------------------------------------------------------------ */
    /* Derived state                                                       */

    /// Union of all node properties, for styling dropdowns
    fn collect_node_properties(&mut self, vertices: &[GremlinVertex]) {
        let mut props = BTreeSet::new();
        for vertex in vertices {
            props.insert("id".to_string());
            if vertex.label.is_some() {
                props.insert("label".to_string());
            }
            for name in vertex.properties.keys() {
                props.insert(name.clone());
            }
        }
        self.node_properties = props.into_iter().collect();
    }

    /// Refresh the highlighted-node pane from a vertex id
    fn update_properties_pane(&mut self, id: &str) {
        let Some(vertex) = self.original_graph_data.get_vertex_by_id(id).cloned() else {
            self.highlighted_node = None;
            return;
        };

        let properties: HashMap<String, Vec<PropertyValue>> = vertex
            .properties
            .iter()
            .map(|(name, values)| {
                (
                    name.clone(),
                    values.iter().map(|p| p.value.clone()).collect(),
                )
            })
            .collect();

        let (sources, targets) = self.update_selected_node_neighbors(&vertex);

        self.highlighted_node = Some(GraphHighlightedNodeData {
            id: vertex.id.clone(),
            label: vertex.label.clone(),
            properties,
            are_neighbors_unknown: vertex.in_edge_ids.is_none() || vertex.out_edge_ids.is_none(),
            sources,
            targets,
        });
    }

    /// Neighbor lists of a node, skipping neighbors not yet loaded into the
    /// graph. Also refreshes the set of known edge labels.
    fn update_selected_node_neighbors(
        &mut self,
        vertex: &GremlinVertex,
    ) -> (Vec<NeighborVertexBasicInfo>, Vec<NeighborVertexBasicInfo>) {
        let graph = &self.original_graph_data;
        let caption_key = &self.style.node_caption;
        let mut edge_labels = BTreeSet::new();
        let mut sources = Vec::new();
        let mut targets = Vec::new();

        for (label, edges) in &vertex.in_e {
            edge_labels.insert(label.clone());
            for edge in edges {
                let neighbor_id = &edge.out_v;
                let Some(neighbor) = graph.get_vertex_by_id(neighbor_id) else {
                    // Neighbor hasn't been loaded into the graph yet
                    continue;
                };
                sources.push(NeighborVertexBasicInfo {
                    name: neighbor
                        .prop_value(caption_key)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| neighbor_id.clone()),
                    id: neighbor_id.clone(),
                    edge_id: edge.id.clone(),
                    edge_label: label.clone(),
                });
            }
        }
        for (label, edges) in &vertex.out_e {
            edge_labels.insert(label.clone());
            for edge in edges {
                let neighbor_id = &edge.in_v;
                let Some(neighbor) = graph.get_vertex_by_id(neighbor_id) else {
                    continue;
                };
                targets.push(NeighborVertexBasicInfo {
                    name: neighbor
                        .prop_value(caption_key)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| neighbor_id.clone()),
                    id: neighbor_id.clone(),
                    edge_id: edge.id.clone(),
                    edge_label: label.clone(),
                });
            }
        }

        self.possible_edge_labels = edge_labels.into_iter().collect();
        (sources, targets)
    }

    /// Refresh a vertex in the local graph from a backend response
    fn update_in_memory_graph(&mut self, data: Option<&Value>) {
        let vertices = data.map(decode_graph_result).and_then(|decoded| match decoded {
            DecodedGraphResult::Vertices(v) => Some(v),
            _ => None,
        });
        let Some(vertices) = vertices else {
            self.report(ConsoleKind::Error, "Failed to update graph (no data)");
            return;
        };
        let Some(updated) = vertices.first() else {
            self.report(ConsoleKind::Error, "Failed to update graph (no vertex in response)");
            return;
        };

        if let Some(current) = self.original_graph_data.get_vertex_mut(&updated.id) {
            // Replace the wire fields; bookkeeping stays
            current.label = updated.label.clone();
            current.properties = updated.properties.clone();
            if !updated.in_e.is_empty() {
                current.in_e = updated.in_e.clone();
            }
            if !updated.out_e.is_empty() {
                current.out_e = updated.out_e.clone();
            }
        }

        if self.highlighted_node.as_ref().map(|h| h.id.as_str()) == Some(updated.id.as_str()) {
            let id = updated.id.clone();
            self.update_properties_pane(&id);
        }
    }

    /* ------------------------------------------------------------------ */
    /* Renderer hand-off                                                   */

    /// Replace the authoritative graph and refresh the renderer
    fn update_graph_data(&mut self, graph: GraphData) {
        self.original_graph_data = graph;
        self.push_graph_to_renderer();
    }

    /// Hand the renderer a disposable structural clone; the authoritative
    /// graph stays untouched by the physics fields.
    fn push_graph_to_renderer(&mut self) {
        let snapshot: GraphData = match serde_json::to_string(&self.original_graph_data)
            .and_then(|json| serde_json::from_str(&json))
        {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!("Failed to clone graph for the renderer: {}", error);
                return;
            }
        };
        match &mut self.renderer {
            Some(renderer) => renderer.update_graph(snapshot, Some(self.style.clone())),
            None => warn!("Attempting to update graph, but renderer not initialized, yet."),
        }
    }

    fn push_config_to_renderer(&mut self) {
        let style = self.style.clone();
        if let Some(renderer) = &mut self.renderer {
            renderer.update_config(style);
        }
    }

    /// Adopt an externally edited style configuration
    pub async fn share_graph_config(&mut self, config: GraphStyleConfig) {
        self.style = config;
        if let Some(id) = self.highlighted_node.as_ref().map(|h| h.id.clone()) {
            self.update_properties_pane(&id);
            self.set_result_display(ResultDisplay::Graph).await;
        }
        self.push_config_to_renderer();
    }

    /* ------------------------------------------------------------------ */
    /* Small state helpers and accessors                                   */

    fn pk_id_from_node_data(&self, node: &GraphHighlightedNodeData) -> String {
        if let Some(pk_prop) = &self.settings.partition_key_property {
            if let Some(first) = node.properties.get(pk_prop).and_then(|values| values.first()) {
                return query::generate_pk_id_pair(first, &node.id);
            }
        }
        format!("\"{}\"", query::escape_double_quotes(&node.id))
    }

    fn push_to_latest_query_fragments(&mut self, query_text: &str) {
        if query_text.is_empty() {
            return;
        }
        if self.latest_queries.iter().any(|q| q == query_text) {
            // no dupes
            return;
        }
        self.latest_queries.insert(0, query_text.to_string());
        self.latest_queries.truncate(Self::MAX_LATEST_QUERIES - 1);
    }

    fn set_execute_counter(&mut self, counter: usize) {
        self.execute_counter = counter;
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation != generation
    }

    fn report(&self, kind: ConsoleKind, message: &str) {
        self.console.report(kind, message);
    }

    pub fn filter_query_status(&self) -> FilterQueryStatus {
        self.filter_query_status
    }

    pub fn result_display(&self) -> ResultDisplay {
        self.result_display
    }

    pub fn filter_query_error(&self) -> Option<&str> {
        self.filter_query_error.as_deref()
    }

    pub fn filter_query_warning(&self) -> Option<&str> {
        self.filter_query_warning.as_deref()
    }

    pub fn highlighted_node(&self) -> Option<&GraphHighlightedNodeData> {
        self.highlighted_node.as_ref()
    }

    pub fn possible_edge_labels(&self) -> &[String] {
        &self.possible_edge_labels
    }

    pub fn node_properties(&self) -> &[String] {
        &self.node_properties
    }

    pub fn latest_queries(&self) -> &[String] {
        &self.latest_queries
    }

    pub fn selected_root_id(&self) -> Option<&str> {
        self.selected_root_id.as_deref()
    }

    pub fn has_more_roots(&self) -> bool {
        self.has_more_roots
    }

    pub fn is_backend_executing(&self) -> bool {
        self.execute_counter > 0
    }

    pub fn query_raw_data(&self) -> Option<&str> {
        self.query_raw_data.as_deref()
    }

    pub fn query_total_request_charge(&self) -> &str {
        &self.query_total_request_charge
    }

    pub fn graph(&self) -> &GraphData {
        &self.original_graph_data
    }

    pub fn style(&self) -> &GraphStyleConfig {
        &self.style
    }
}
