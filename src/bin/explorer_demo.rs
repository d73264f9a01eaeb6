//! Explorer demo - drives the graph explorer against a canned in-memory
//! backend and prints what the UI layer would observe.
//!
//! Run: cargo run --bin explorer-demo

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use graphex::{
    DocumentQueryPager, DocumentsPage, ExplorerSettings, GraphEvent, GraphExplorer,
    GremlinRequestResult, PageAction, QueryExecutor, TracingConsole,
};

// ============================================================================
// Canned dataset
// ============================================================================

#[derive(Clone)]
struct Person {
    id: &'static str,
    name: &'static str,
}

#[derive(Clone)]
struct Relation {
    id: &'static str,
    label: &'static str,
    out_v: &'static str,
    in_v: &'static str,
}

const PEOPLE: &[Person] = &[
    Person { id: "alice", name: "Alice" },
    Person { id: "bob", name: "Bob" },
    Person { id: "carol", name: "Carol" },
    Person { id: "dave", name: "Dave" },
];

const RELATIONS: &[Relation] = &[
    Relation { id: "r1", label: "knows", out_v: "alice", in_v: "bob" },
    Relation { id: "r2", label: "knows", out_v: "alice", in_v: "carol" },
    Relation { id: "r3", label: "works_with", out_v: "bob", in_v: "carol" },
    Relation { id: "r4", label: "knows", out_v: "dave", in_v: "alice" },
];

/// Minimal Gremlin look-alike over the canned dataset. Understands exactly
/// the query shapes the explorer emits: `g.V(ids...)`, `.outE()`/`.inE()`
/// adjacency pages and mutation steps (rejected, the demo set is read-only).
struct CannedBackend;

impl CannedBackend {
    fn vertex_json(id: &str) -> Option<Value> {
        let person = PEOPLE.iter().find(|p| p.id == id)?;
        Some(json!({
            "id": person.id,
            "type": "vertex",
            "label": "person",
            "properties": { "name": [{ "id": format!("{}-name", person.id), "value": person.name }] }
        }))
    }

    fn edge_json(relation: &Relation) -> Value {
        json!({
            "id": relation.id,
            "type": "edge",
            "label": relation.label,
            "outV": relation.out_v,
            "inV": relation.in_v
        })
    }

    /// Ids listed inside `g.V('a','b',...)`
    fn parse_ids(query: &str) -> Vec<String> {
        let Some(start) = query.find("g.V(") else {
            return Vec::new();
        };
        let Some(end) = query[start..].find(')') else {
            return Vec::new();
        };
        query[start + 4..start + end]
            .split(',')
            .map(|part| part.trim().trim_matches('\'').to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }

    fn adjacency_page(&self, query: &str, outgoing: bool) -> Value {
        let ids = Self::parse_ids(query);
        let Some(vertex_id) = ids.first() else {
            return json!([]);
        };

        let pairs: Vec<Value> = RELATIONS
            .iter()
            .filter(|r| {
                if outgoing {
                    r.out_v == vertex_id
                } else {
                    r.in_v == vertex_id
                }
            })
            .filter_map(|r| {
                let neighbor = if outgoing { r.in_v } else { r.out_v };
                Some(json!({ "e": Self::edge_json(r), "v": Self::vertex_json(neighbor)? }))
            })
            .collect();
        json!(pairs)
    }
}

impl QueryExecutor for CannedBackend {
    async fn submit(&self, query: &str) -> std::result::Result<GremlinRequestResult, String> {
        let data = if query.contains(".outE()") {
            self.adjacency_page(query, true)
        } else if query.contains(".inE()") {
            self.adjacency_page(query, false)
        } else if query.starts_with("g.V(") {
            let vertices: Vec<Value> = Self::parse_ids(query)
                .iter()
                .filter_map(|id| Self::vertex_json(id))
                .collect();
            json!(vertices)
        } else {
            return Err(format!("unsupported query: {}", query));
        };

        Ok(GremlinRequestResult {
            data: Some(data),
            is_incomplete: false,
            total_request_charge: Some(2.19),
        })
    }
}

struct CannedPager;

impl DocumentQueryPager for CannedPager {
    async fn fetch_page(
        &self,
        _database_id: &str,
        _collection_id: &str,
        _query: &str,
        start_index: usize,
        page_size: usize,
    ) -> std::result::Result<DocumentsPage, String> {
        let documents: Vec<Value> = PEOPLE
            .iter()
            .skip(start_index)
            .take(page_size)
            .map(|p| json!({ "id": p.id }))
            .collect();
        let fetched = documents.len();
        Ok(DocumentsPage {
            documents,
            has_more_results: start_index + fetched < PEOPLE.len(),
            last_item_index: start_index + fetched.saturating_sub(1),
            request_charge: 3.5,
        })
    }
}

// ============================================================================
// Demo driver
// ============================================================================

async fn pump_renderer_events(
    explorer: &mut GraphExplorer<CannedBackend, CannedPager>,
) {
    let events = match explorer.renderer_mut() {
        Some(renderer) => renderer.drain_events(),
        None => return,
    };
    for event in events {
        if let GraphEvent::GraphUpdated(n) = &event {
            println!("  renderer ingested graph update #{}", n);
        }
        explorer.handle_graph_event(event).await;
    }
}

fn print_graph_summary(explorer: &GraphExplorer<CannedBackend, CannedPager>) {
    let graph = explorer.graph();
    println!(
        "  graph: {} vertices, {} edges, root={:?}",
        graph.vertices().len(),
        graph.edges().len(),
        graph.find_root_node_id()
    );
    for edge in graph.edges() {
        println!("    {} -[{}]-> {}", edge.out_v, edge.label, edge.in_v);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Graph explorer demo ===\n");

    let mut explorer = GraphExplorer::new(
        CannedBackend,
        CannedPager,
        Arc::new(TracingConsole::default()),
        ExplorerSettings {
            database_id: "demo-db".to_string(),
            collection_id: "people".to_string(),
            partition_key_property: None,
            is_graph_auto_viz_disabled: false,
        },
    );
    explorer.attach_renderer();

    println!("1. Submitting the default query...");
    explorer.submit_query("g.V()").await;
    pump_renderer_events(&mut explorer).await;

    println!("  status: {:?}, display: {:?}", explorer.filter_query_status(), explorer.result_display());
    println!("  request charge: {}", explorer.query_total_request_charge());
    println!("  root candidates:");
    for candidate in explorer.get_possible_root_nodes() {
        println!("    {} ({})", candidate.caption, candidate.id);
    }
    print_graph_summary(&explorer);

    println!("\n2. Running the force simulation until it settles...");
    let mut ticks = 0;
    if let Some(renderer) = explorer.renderer_mut() {
        while renderer.step() && ticks < 500 {
            ticks += 1;
        }
    }
    println!("  settled after {} ticks:", ticks);
    if let Some(renderer) = explorer.renderer() {
        for node in renderer.nodes() {
            println!(
                "    {:<8} at ({:>7.1}, {:>7.1}){}",
                node.caption,
                node.x,
                node.y,
                if node.is_root { "  [root]" } else { "" }
            );
        }
    }

    println!("\n3. Selecting 'carol' as the new root...");
    explorer.select_root_node("carol").await.ok();
    pump_renderer_events(&mut explorer).await;
    print_graph_summary(&explorer);

    if let Some(highlighted) = explorer.highlighted_node() {
        println!("  highlighted: {} (sources: {}, targets: {})",
            highlighted.id,
            highlighted.sources.len(),
            highlighted.targets.len()
        );
    }

    println!("\n4. Asking for another neighbor page through the renderer...");
    if let Some(renderer) = explorer.renderer_mut() {
        renderer.request_page("carol", PageAction::FirstPage);
    }
    pump_renderer_events(&mut explorer).await;
    print_graph_summary(&explorer);

    println!("\nDone.");
    Ok(())
}
