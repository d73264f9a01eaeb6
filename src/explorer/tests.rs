//! Tests for the explorer lifecycle, pagination and mutations

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::*;
use crate::executor::DocumentsPage;

// ============================================================================
// Mock backend
// ============================================================================

#[derive(Clone)]
struct MockResponse {
    matcher: String,
    result: std::result::Result<(Option<Value>, bool), String>,
    once: bool,
}

/// Routes submitted queries by substring match. The latest staged matcher
/// wins, so specific responses can be layered over sticky fallbacks.
/// Unmatched queries resolve to an empty array.
#[derive(Clone, Default)]
struct MockBackend {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    submitted: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    fn stage(&self, matcher: &str, result: std::result::Result<(Option<Value>, bool), String>, once: bool) {
        self.responses.lock().unwrap().push(MockResponse {
            matcher: matcher.to_string(),
            result,
            once,
        });
    }

    fn respond(&self, matcher: &str, data: Value) {
        self.stage(matcher, Ok((Some(data), false)), false);
    }

    fn respond_once(&self, matcher: &str, data: Value) {
        self.stage(matcher, Ok((Some(data), false)), true);
    }

    fn respond_null(&self, matcher: &str) {
        self.stage(matcher, Ok((None, false)), false);
    }

    fn respond_incomplete(&self, matcher: &str, data: Value) {
        self.stage(matcher, Ok((Some(data), true)), false);
    }

    fn fail(&self, matcher: &str, message: &str) {
        self.stage(matcher, Err(message.to_string()), false);
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    fn out_e_query_count(&self) -> usize {
        self.submitted()
            .iter()
            .filter(|q| q.contains(".outE()"))
            .count()
    }

    fn in_e_query_count(&self) -> usize {
        self.submitted()
            .iter()
            .filter(|q| q.contains(".inE()"))
            .count()
    }
}

impl QueryExecutor for MockBackend {
    async fn submit(&self, query: &str) -> std::result::Result<GremlinRequestResult, String> {
        self.submitted.lock().unwrap().push(query.to_string());

        let mut responses = self.responses.lock().unwrap();
        if let Some(pos) = responses
            .iter()
            .rposition(|r| query.contains(&r.matcher))
        {
            let response = responses[pos].clone();
            if response.once {
                responses.remove(pos);
            }
            return match response.result {
                Ok((data, is_incomplete)) => Ok(GremlinRequestResult {
                    data,
                    is_incomplete,
                    total_request_charge: Some(5.0),
                }),
                Err(message) => Err(message),
            };
        }

        Ok(GremlinRequestResult {
            data: Some(json!([])),
            is_incomplete: false,
            total_request_charge: None,
        })
    }
}

#[derive(Clone, Default)]
struct MockPager {
    pages: Arc<Mutex<Vec<std::result::Result<DocumentsPage, String>>>>,
}

impl MockPager {
    fn page(&self, documents: Vec<Value>, has_more: bool) {
        let last_item_index = documents.len().saturating_sub(1);
        self.pages.lock().unwrap().push(Ok(DocumentsPage {
            documents,
            has_more_results: has_more,
            last_item_index,
            request_charge: 2.5,
        }));
    }

    fn fail(&self, message: &str) {
        self.pages.lock().unwrap().push(Err(message.to_string()));
    }
}

impl DocumentQueryPager for MockPager {
    async fn fetch_page(
        &self,
        _database_id: &str,
        _collection_id: &str,
        _query: &str,
        _start_index: usize,
        _page_size: usize,
    ) -> std::result::Result<DocumentsPage, String> {
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            return Err("no documents staged".to_string());
        }
        pages.remove(0)
    }
}

#[derive(Default)]
struct CollectingConsole {
    messages: Mutex<Vec<(ConsoleKind, String)>>,
}

impl ConsoleSink for CollectingConsole {
    fn report(&self, kind: ConsoleKind, message: &str) {
        self.messages.lock().unwrap().push((kind, message.to_string()));
    }
}

impl CollectingConsole {
    fn contains(&self, kind: ConsoleKind, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(k, m)| *k == kind && m.contains(needle))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn vertex_json(id: &str) -> Value {
    json!({ "id": id, "type": "vertex" })
}

fn pair_json(edge_id: &str, out_v: &str, in_v: &str, neighbor: &str) -> Value {
    json!({
        "e": { "id": edge_id, "type": "edge", "label": "knows", "outV": out_v, "inV": in_v },
        "v": { "id": neighbor, "type": "vertex" }
    })
}

fn out_pairs(range: std::ops::Range<usize>) -> Value {
    let pairs: Vec<Value> = range
        .map(|i| pair_json(&format!("e{}", i), "a", &format!("n{}", i), &format!("n{}", i)))
        .collect();
    json!(pairs)
}

struct Fixture {
    backend: MockBackend,
    pager: MockPager,
    console: Arc<CollectingConsole>,
    explorer: GraphExplorer<MockBackend, MockPager>,
}

fn fixture() -> Fixture {
    let backend = MockBackend::default();
    let pager = MockPager::default();
    let console = Arc::new(CollectingConsole::default());
    let mut explorer = GraphExplorer::new(
        backend.clone(),
        pager.clone(),
        console.clone(),
        ExplorerSettings {
            database_id: "db".to_string(),
            collection_id: "coll".to_string(),
            partition_key_property: None,
            is_graph_auto_viz_disabled: false,
        },
    );
    explorer.attach_renderer();
    Fixture {
        backend,
        pager,
        console,
        explorer,
    }
}

/// Stage a single root candidate "a" and submit a query selecting it, with
/// one page of outgoing/incoming pairs staged for the first neighbor load.
async fn select_single_root(f: &mut Fixture, out: Value, incoming: Value) {
    f.backend.respond("g.V('a')", json!([vertex_json("a")]));
    f.backend.respond_once(".outE()", out);
    f.backend.respond_once(".inE()", incoming);
    f.explorer.submit_query("g.V('a')").await;
}

// ============================================================================
// Top-level query lifecycle
// ============================================================================

#[tokio::test]
async fn test_default_query_end_to_end() {
    let mut f = fixture();
    f.pager.page(vec![json!({ "id": "a" }), json!({ "id": "b" })], false);
    f.backend
        .respond("g.V('a','b')", json!([vertex_json("a"), vertex_json("b")]));
    f.backend
        .respond(".outE()", json!([pair_json("e1", "a", "b", "b")]));
    f.backend.respond(".inE()", json!([]));

    f.explorer.submit_query("g.V()").await;

    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::GraphResult);
    assert_eq!(f.explorer.result_display(), ResultDisplay::Graph);

    // Both vertices made it into the model, plus the single edge
    let mut ids = f.explorer.graph().ids();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(f.explorer.graph().edges().len(), 1);
    assert_eq!(f.explorer.graph().edges()[0].id, "e1");

    // First root candidate was auto-selected and became the root
    assert_eq!(f.explorer.selected_root_id(), Some("a"));
    assert_eq!(f.explorer.graph().find_root_node_id(), Some("a".to_string()));

    // The renderer received the snapshot
    let renderer = f.explorer.renderer().unwrap();
    assert_eq!(renderer.nodes().len(), 2);
    assert_eq!(renderer.links().len(), 1);

    // Highlighted-node pane follows the selected root
    let highlighted = f.explorer.highlighted_node().unwrap();
    assert_eq!(highlighted.id, "a");
    assert_eq!(highlighted.targets.len(), 1);
    assert_eq!(highlighted.targets[0].id, "b");

    assert_eq!(f.explorer.query_total_request_charge(), "2.5");
}

#[tokio::test]
async fn test_non_graph_result() {
    let mut f = fixture();
    f.backend.respond("count", json!([{ "count": 42 }]));

    f.explorer.submit_query("g.V().count()").await;

    assert_eq!(
        f.explorer.filter_query_status(),
        FilterQueryStatus::NonGraphResult
    );
    assert_eq!(f.explorer.result_display(), ResultDisplay::Json);
    assert!(f.console.contains(ConsoleKind::Info, "Query result is not a graph"));
}

#[tokio::test]
async fn test_empty_graph_result() {
    let mut f = fixture();
    f.backend.respond("nomatch", json!([]));

    f.explorer.submit_query("g.V().has('k', 'nomatch')").await;

    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::GraphResult);
    assert!(f.explorer.graph().vertices().is_empty());
    assert!(f.console.contains(ConsoleKind::Info, "Query result is empty"));
}

#[tokio::test]
async fn test_null_result_reports_error() {
    let mut f = fixture();
    f.backend.respond_null("g.V('x')");

    f.explorer.submit_query("g.V('x')").await;

    assert_eq!(
        f.explorer.filter_query_status(),
        FilterQueryStatus::GraphEmptyResult
    );
    assert!(f.console.contains(ConsoleKind::Error, "Filter query result is null."));
}

#[tokio::test]
async fn test_executor_failure_surfaces_error_result() {
    let mut f = fixture();
    f.backend.fail("g.V('boom')", "remote blew up");

    f.explorer.submit_query("g.V('boom')").await;

    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::ErrorResult);
    let error = f.explorer.filter_query_error().unwrap();
    assert!(error.contains("g.V('boom')"));
    assert!(f.console.contains(ConsoleKind::Error, "Gremlin query failed"));
}

#[tokio::test]
async fn test_incomplete_result_is_a_warning_not_an_error() {
    let mut f = fixture();
    f.backend
        .respond_incomplete("g.V('big')", json!([vertex_json("big")]));
    f.backend.respond(".outE()", json!([]));
    f.backend.respond(".inE()", json!([]));

    f.explorer.submit_query("g.V('big')").await;

    assert!(f
        .explorer
        .filter_query_warning()
        .unwrap()
        .contains("only partial results"));
    // Partial data still processed as authoritative
    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::GraphResult);
}

#[tokio::test]
async fn test_root_candidate_page_failure() {
    let mut f = fixture();
    f.pager.fail("database offline");

    f.explorer.submit_query("g.V()").await;

    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::ErrorResult);
    assert!(f
        .explorer
        .filter_query_error()
        .unwrap()
        .contains("database offline"));
}

#[tokio::test]
async fn test_latest_query_history_dedup_and_cap() {
    let mut f = fixture();
    for i in 0..12 {
        f.explorer.submit_query(&format!("g.V('q{}')", i)).await;
    }
    // Re-submitting an already-known query must not duplicate it
    f.explorer.submit_query("g.V('q11')").await;

    let latest = f.explorer.latest_queries();
    assert_eq!(latest.len(), 9);
    assert_eq!(latest[0], "g.V('q11')");
    assert_eq!(latest.iter().filter(|q| *q == "g.V('q11')").count(), 1);
}

// ============================================================================
// Neighbor pagination
// ============================================================================

#[tokio::test]
async fn test_first_page_probe_detects_more_data() {
    let mut f = fixture();
    // 11 pairs answer a 10+1 probe: page filled, more to come
    select_single_root(&mut f, out_pairs(0..11), json!([])).await;

    let root = f.explorer.graph().get_vertex_by_id("a").unwrap();
    assert!(!root.out_e_all_loaded);
    assert_eq!(root.out_edge_ids.as_ref().unwrap().len(), 10);

    let pagination = root.pagination.as_ref().unwrap();
    assert_eq!(pagination.total, None);
    assert_eq!(pagination.current_page.start, 0);
    assert_eq!(pagination.current_page.end, 10);

    // Only one page of neighbors materialized (the probe row is discarded)
    assert_eq!(f.explorer.graph().vertices().len(), 11);
    // The incoming direction was not queried: the outgoing probe filled the page
    assert_eq!(f.backend.in_e_query_count(), 0);
}

#[tokio::test]
async fn test_fully_loaded_first_page_sets_no_pagination() {
    let mut f = fixture();
    select_single_root(
        &mut f,
        out_pairs(0..3),
        json!([pair_json("e90", "z", "a", "z")]),
    )
    .await;

    let root = f.explorer.graph().get_vertex_by_id("a").unwrap();
    assert!(root.out_e_all_loaded);
    assert!(root.in_e_all_loaded);
    // 3 outgoing + 1 incoming, fully loaded within the first page: no
    // pagination indicator needed
    assert!(root.pagination.is_none());
    assert_eq!(root.known_edge_count(), 4);
    assert!(f.explorer.graph().has_vertex_id("z"));
}

#[tokio::test]
async fn test_next_page_discards_and_refetches_in_order() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..11), json!([])).await;

    // Page 2: another full probe's worth
    f.backend.respond_once(".outE()", out_pairs(10..21));
    f.explorer
        .on_load_more_data(&LoadMoreDataAction {
            node_id: "a".to_string(),
            page_action: PageAction::NextPage,
        })
        .await;

    {
        let root = f.explorer.graph().get_vertex_by_id("a").unwrap();
        let pagination = root.pagination.as_ref().unwrap();
        assert_eq!(pagination.current_page.start, 10);
        assert_eq!(pagination.current_page.end, 20);
        assert_eq!(pagination.total, None);
        assert_eq!(root.out_edge_ids.as_ref().unwrap().len(), 20);
    }

    // Page 3 drains outgoing (5 of 11 requested) and fills the rest of the
    // page from the incoming direction, probing it independently
    f.backend.respond_once(".outE()", out_pairs(20..25));
    f.backend.respond_once(
        ".inE()",
        json!([
            pair_json("e90", "x", "a", "x"),
            pair_json("e91", "y", "a", "y")
        ]),
    );
    f.explorer
        .on_load_more_data(&LoadMoreDataAction {
            node_id: "a".to_string(),
            page_action: PageAction::NextPage,
        })
        .await;

    let root = f.explorer.graph().get_vertex_by_id("a").unwrap();
    assert!(root.out_e_all_loaded);
    assert!(root.in_e_all_loaded);
    let pagination = root.pagination.as_ref().unwrap();
    assert_eq!(pagination.current_page.start, 20);
    assert_eq!(pagination.current_page.end, 27);
    // Total becomes known once both directions report fully loaded
    assert_eq!(pagination.total, Some(27));

    // The exclusion clause carried the already-loaded edge ids
    let queries = f.backend.submitted();
    let last_out = queries.iter().rev().find(|q| q.contains(".outE()")).unwrap();
    assert!(last_out.contains("without("));
    assert!(last_out.contains("'e0'"));
}

#[tokio::test]
async fn test_no_op_when_everything_loaded() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..3), json!([])).await;
    let queries_before = f.backend.submitted().len();

    f.explorer.load_neighbors_page("a", 10).await.unwrap();

    // Nothing new to fetch: no further executor traffic
    assert_eq!(f.backend.submitted().len(), queries_before);
}

#[tokio::test]
async fn test_reload_trims_unrelated_children() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..5), json!([])).await;
    assert_eq!(f.explorer.graph().vertices().len(), 6);

    // Re-selecting the root rebuilds the working set from scratch
    f.backend.respond_once(".outE()", out_pairs(0..2));
    f.backend.respond_once(".inE()", json!([]));
    f.explorer.select_root_node("a").await.unwrap();

    assert!(f.explorer.graph().has_vertex_id("a"));
    assert_eq!(f.explorer.graph().vertices().len(), 3);
}

#[tokio::test]
async fn test_select_root_resets_pagination_when_over_page_size() {
    let mut f = fixture();
    let mut root = GremlinVertex::new("a");
    root.out_e_all_loaded = true;
    root.in_e_all_loaded = true;
    root.out_edge_ids = Some((0..12).map(|i| format!("e{}", i)).collect());
    root.in_edge_ids = Some(Vec::new());
    f.explorer.root_map.push(root);

    f.backend.respond_once(".outE()", out_pairs(0..4));
    f.backend.respond_once(".inE()", json!([]));
    f.explorer.select_root_node("a").await.unwrap();

    // Prior pagination state was discarded: the fetch ran without any
    // exclusion clause
    let out_query = f
        .backend
        .submitted()
        .into_iter()
        .find(|q| q.contains(".outE()"))
        .unwrap();
    assert!(!out_query.contains("without"));
    assert!(out_query.contains(".limit(11)"));
}

#[tokio::test]
async fn test_select_unknown_root_reports_error() {
    let mut f = fixture();
    assert!(f.explorer.select_root_node("ghost").await.is_err());
    assert!(f
        .console
        .contains(ConsoleKind::Error, "no known vertex with id:ghost"));
}

#[tokio::test]
async fn test_cached_page_skips_executor() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..11), json!([])).await;
    let out_queries_before = f.backend.out_e_query_count();

    // Going back to the first page: the outgoing page is answered from the
    // dense cache, no new outE query hits the backend
    f.explorer
        .on_load_more_data(&LoadMoreDataAction {
            node_id: "a".to_string(),
            page_action: PageAction::FirstPage,
        })
        .await;

    assert_eq!(f.backend.out_e_query_count(), out_queries_before);
    assert!(f
        .console
        .contains(ConsoleKind::Info, "edges from cache for vertex id: a"));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_create_new_edge_applies_only_after_success() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..1), json!([])).await;

    f.backend.respond(
        "addE",
        json!([{ "id": "e9", "type": "edge", "label": "likes", "outV": "n0", "inV": "a" }]),
    );
    f.explorer
        .create_new_edge(&GraphNewEdgeData {
            label: "likes".to_string(),
            input_in_v: "a".to_string(),
            input_out_v: "n0".to_string(),
        })
        .await
        .unwrap();

    assert!(f.explorer.graph().edges().iter().any(|e| e.id == "e9"));
    // The touched endpoints must let the next neighbor load pick the new
    // edge up
    assert!(!f.explorer.graph().get_vertex_by_id("a").unwrap().out_e_all_loaded);
}

#[tokio::test]
async fn test_failed_edge_creation_leaves_graph_untouched() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..1), json!([])).await;
    let edges_before = f.explorer.graph().edges().len();

    f.backend.fail("addE", "conflict");
    let result = f
        .explorer
        .create_new_edge(&GraphNewEdgeData {
            label: "likes".to_string(),
            input_in_v: "a".to_string(),
            input_out_v: "n0".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(f.explorer.graph().edges().len(), edges_before);
    assert!(f.console.contains(ConsoleKind::Error, "Failed to create edge"));
}

#[tokio::test]
async fn test_remove_edge_scrubs_stubs() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..2), json!([])).await;
    assert!(f.explorer.graph().edges().iter().any(|e| e.id == "e0"));

    f.backend.respond("g.E('e0')", json!([]));
    f.explorer.remove_edge("e0").await.unwrap();

    assert!(!f.explorer.graph().edges().iter().any(|e| e.id == "e0"));
    let root = f.explorer.graph().get_vertex_by_id("a").unwrap();
    assert!(root.out_e.values().flatten().all(|e| e.id != "e0"));
}

#[tokio::test]
async fn test_add_vertex_selects_new_root() {
    let mut f = fixture();
    f.backend.respond(
        "g.AddV('person')",
        json!([{ "id": "fresh", "type": "vertex", "label": "person" }]),
    );
    // Neighbor load for the new root
    f.backend.respond(".outE()", json!([]));
    f.backend.respond(".inE()", json!([]));

    f.explorer
        .add_vertex(&NewVertexData {
            label: "person".to_string(),
            properties: vec![InputProperty {
                key: "name".to_string(),
                values: vec![PropertyValue::String("fresh one".to_string())],
            }],
        })
        .await
        .unwrap();

    let add_query = &f.backend.submitted()[0];
    assert!(add_query.contains("g.AddV('person')"));
    assert!(add_query.contains(".Property('name', \"fresh one\")"));

    assert_eq!(f.explorer.selected_root_id(), Some("fresh"));
    assert_eq!(f.explorer.highlighted_node().unwrap().id, "fresh");
    assert_eq!(f.explorer.filter_query_status(), FilterQueryStatus::GraphResult);
}

#[tokio::test]
async fn test_delete_highlighted_node() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..1), json!([])).await;
    assert_eq!(f.explorer.highlighted_node().unwrap().id, "a");

    f.backend.respond(".drop()", json!([]));
    f.explorer.delete_highlighted_node().await.unwrap();

    assert!(!f.explorer.graph().has_vertex_id("a"));
    assert!(f.explorer.highlighted_node().is_none());
    assert!(f.explorer.get_possible_root_nodes().iter().all(|c| c.id != "a"));
}

#[tokio::test]
async fn test_delete_without_highlight_is_reported_noop() {
    let mut f = fixture();
    f.explorer.delete_highlighted_node().await.unwrap();
    assert!(f.console.contains(ConsoleKind::Error, "No highlighted node to remove."));
    assert!(f.backend.submitted().is_empty());
}

#[tokio::test]
async fn test_update_vertex_properties_nothing_to_update() {
    let mut f = fixture();
    let result = f
        .explorer
        .update_vertex_properties(&EditedProperties::new("'a'"))
        .await
        .unwrap();
    assert!(result.data.is_none());
    assert!(f.console.contains(ConsoleKind::Info, "Nothing to update"));
    assert!(f.backend.submitted().is_empty());
}

#[tokio::test]
async fn test_update_vertex_properties_drops_then_updates() {
    let mut f = fixture();
    f.explorer
        .original_graph_data
        .add_vertex(GremlinVertex::new("a"));
    f.backend.respond(
        "g.V('a')",
        json!([{
            "id": "a",
            "type": "vertex",
            "properties": { "age": [{ "id": "p1", "value": 31 }] }
        }]),
    );

    let mut edited = EditedProperties::new("'a'");
    edited.existing_properties.push(InputProperty {
        key: "age".to_string(),
        values: vec![PropertyValue::Number(31.0)],
    });
    edited.dropped_keys.push("obsolete".to_string());
    f.explorer.update_vertex_properties(&edited).await.unwrap();

    // Drop first, then the single update query
    let queries = f.backend.submitted();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].contains("properties(\"obsolete\").drop()"));
    assert!(queries[1].contains(".Property(\"age\", 31)"));

    // Local model refreshed from the response
    let vertex = f.explorer.graph().get_vertex_by_id("a").unwrap();
    assert!(vertex.properties.contains_key("age"));
}

#[tokio::test]
async fn test_multi_valued_properties_are_not_updated() {
    let mut f = fixture();
    let mut edited = EditedProperties::new("'a'");
    edited.existing_properties.push(InputProperty {
        key: "tags".to_string(),
        values: vec![
            PropertyValue::String("x".to_string()),
            PropertyValue::String("y".to_string()),
        ],
    });
    f.explorer.update_vertex_properties(&edited).await.unwrap();
    // Multi-valued property updates are unsupported: nothing was submitted
    assert!(f.backend.submitted().is_empty());
}

// ============================================================================
// Derived state
// ============================================================================

#[tokio::test]
async fn test_collect_node_properties_union_and_default_caption() {
    let mut f = fixture();
    f.backend.respond(
        "g.V('props')",
        json!([
            {
                "id": "a", "type": "vertex", "label": "person",
                "properties": {
                    "name": [{ "id": "p1", "value": "alice" }],
                    "age": [{ "id": "p2", "value": 31 }]
                }
            },
            { "id": "b", "type": "vertex" }
        ]),
    );
    f.backend.respond(".outE()", json!([]));
    f.backend.respond(".inE()", json!([]));

    f.explorer.submit_query("g.V('props')").await;

    let props = f.explorer.node_properties();
    for expected in ["id", "label", "name", "age"] {
        assert!(props.contains(&expected.to_string()), "missing {}", expected);
    }
    // "name" exists, so it becomes the default caption
    assert_eq!(f.explorer.style().node_caption, "name");
}

#[tokio::test]
async fn test_update_possible_vertices_excludes_highlighted() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..1), json!([])).await;

    f.pager.page(
        vec![
            json!({ "id": "a", "p": "root" }),
            json!({ "id": "x", "p": "ex" }),
            json!({ "id": "y", "p": [{ "id": "py", "_value": "why" }] }),
        ],
        false,
    );
    let possible = f.explorer.update_possible_vertices().await;

    assert_eq!(possible.len(), 2);
    assert!(possible.iter().any(|v| v.value == "x" && v.caption == "ex"));
    assert!(possible.iter().any(|v| v.value == "y" && v.caption == "why"));
}

#[tokio::test]
async fn test_update_node_icons() {
    let mut f = fixture();
    f.pager.page(
        vec![json!({
            "_graph_icon_property_value": "person",
            "format": "svg",
            "icon": "PHN2Zz4="
        })],
        false,
    );
    f.explorer.update_node_icons("label", None).await;

    assert_eq!(f.explorer.style().node_icon_key.as_deref(), Some("label"));
    assert_eq!(f.explorer.style().icons_map["person"].format, "svg");

    f.explorer
        .update_node_icons(GraphExplorer::<MockBackend, MockPager>::NONE_CHOICE, None)
        .await;
    assert!(f.explorer.style().node_icon_key.is_none());
}

#[tokio::test]
async fn test_neighbor_lists_skip_unloaded_vertices() {
    let mut f = fixture();
    select_single_root(&mut f, out_pairs(0..11), json!([])).await;

    // The probe's 11th stub (n10) never materialized into the graph, so the
    // neighbor list only shows the ten loaded targets
    let highlighted = f.explorer.highlighted_node().unwrap();
    assert_eq!(highlighted.targets.len(), 10);
    assert!(highlighted.targets.iter().all(|t| t.id != "n10"));
    assert_eq!(f.explorer.possible_edge_labels(), &["knows".to_string()]);
}
