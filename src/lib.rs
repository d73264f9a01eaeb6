//! graphex - in-memory graph explorer core
//!
//! # Architecture
//!
//! - **Graph model**: vertex/edge collections with adjacency indexes,
//!   mutated incrementally as neighbor pages load
//! - **Bounded caches**: dense page cache for edge/vertex query results,
//!   per-vertex adjacency memory to avoid redundant fetches
//! - **Query shaping**: paginated adjacency queries with size-bounded
//!   exclusion clauses
//! - **Explorer**: one controller per graph tab, orchestrating query
//!   submission, root selection and executor-confirmed mutations
//! - **Renderer contract**: force-layout over disposable structural clones,
//!   never the authoritative graph
//!
//! # Usage example
//!
//! ```no_run
//! use std::sync::Arc;
//! use graphex::{
//!     DocumentQueryPager, DocumentsPage, ExplorerSettings, GraphExplorer,
//!     GremlinRequestResult, QueryExecutor, TracingConsole,
//! };
//!
//! struct Backend;
//!
//! impl QueryExecutor for Backend {
//!     async fn submit(&self, _query: &str) -> Result<GremlinRequestResult, String> {
//!         Err("not connected".to_string())
//!     }
//! }
//!
//! impl DocumentQueryPager for Backend {
//!     async fn fetch_page(
//!         &self,
//!         _database_id: &str,
//!         _collection_id: &str,
//!         _query: &str,
//!         _start_index: usize,
//!         _page_size: usize,
//!     ) -> Result<DocumentsPage, String> {
//!         Err("not connected".to_string())
//!     }
//! }
//!
//! # async fn run() {
//! let mut explorer = GraphExplorer::new(
//!     Backend,
//!     Backend,
//!     Arc::new(TracingConsole::default()),
//!     ExplorerSettings::default(),
//! );
//! explorer.attach_renderer();
//! explorer.submit_query("g.V()").await;
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod executor;
pub mod explorer;
pub mod graph;
pub mod query;
pub mod render;

pub use cache::{ArraysByKeyCache, EdgeInfoCache};
pub use error::{ExplorerError, Result};
pub use executor::{
    decode_graph_result, ConsoleKind, ConsoleSink, DecodedGraphResult, DocumentQueryPager,
    DocumentsPage, GremlinRequestResult, QueryExecutor, TracingConsole,
};
pub use explorer::{ExplorerSettings, FilterQueryStatus, GraphExplorer, ResultDisplay};
pub use graph::{EdgeVertexPair, GraphData, GremlinEdge, GremlinVertex};
pub use render::{D3ForceGraph, GraphEvent, GraphStyleConfig, PageAction};
