//! External capability contracts and result decoding
//!
//! The explorer core never talks to a backend directly. It consumes a query
//! executor (submit a query string, get data or an error), a document pager
//! (enumerate root-candidate documents page by page) and a console sink
//! (report progress and failures). All three are injected at construction so
//! independent explorer instances never share state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::graph::{EdgeVertexPair, GremlinVertex};

/// Result of one query submission.
#[derive(Clone, Debug, Default)]
pub struct GremlinRequestResult {
    /// Raw result payload; `None` when the backend returned null
    pub data: Option<Value>,
    /// The backend truncated the result (size cap hit). Not an error: the
    /// partial data is authoritative for this page, but the user is warned.
    pub is_incomplete: bool,
    pub total_request_charge: Option<f64>,
}

/// Submits query strings to the graph backend.
///
/// Errors are transport/remote failure messages; the explorer wraps them
/// with the offending query text before reporting.
#[allow(async_fn_in_trait)]
pub trait QueryExecutor {
    async fn submit(&self, query: &str) -> std::result::Result<GremlinRequestResult, String>;
}

/// One page of documents from the document store.
#[derive(Clone, Debug, Default)]
pub struct DocumentsPage {
    pub documents: Vec<Value>,
    pub has_more_results: bool,
    /// Index of the last returned item within the overall result stream
    pub last_item_index: usize,
    pub request_charge: f64,
}

/// Enumerates documents for root-candidate listing and lookups.
#[allow(async_fn_in_trait)]
pub trait DocumentQueryPager {
    async fn fetch_page(
        &self,
        database_id: &str,
        collection_id: &str,
        query: &str,
        start_index: usize,
        page_size: usize,
    ) -> std::result::Result<DocumentsPage, String>;
}

/// Message classes of the console contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleKind {
    Info,
    Error,
    InProgress,
}

/// Single funnel for everything the explorer wants the surrounding UI to
/// observe. In-progress messages return a token so the entry can be
/// dismissed when the operation settles.
pub trait ConsoleSink: Send + Sync {
    fn report(&self, kind: ConsoleKind, message: &str);

    fn begin_progress(&self, message: &str) -> u64 {
        self.report(ConsoleKind::InProgress, message);
        0
    }

    fn dismiss_progress(&self, _token: u64) {}
}

/// Default console sink: forwards to `tracing`.
#[derive(Default)]
pub struct TracingConsole {
    next_token: AtomicU64,
}

impl ConsoleSink for TracingConsole {
    fn report(&self, kind: ConsoleKind, message: &str) {
        match kind {
            ConsoleKind::Error => error!("{}", message),
            ConsoleKind::Info | ConsoleKind::InProgress => info!("{}", message),
        }
    }

    fn begin_progress(&self, message: &str) -> u64 {
        info!("{}", message);
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }
}

/// Dismisses an in-progress console entry when dropped
pub struct ProgressGuard {
    sink: Arc<dyn ConsoleSink>,
    token: u64,
}

impl ProgressGuard {
    pub fn begin(sink: Arc<dyn ConsoleSink>, message: &str) -> Self {
        let token = sink.begin_progress(message);
        ProgressGuard { sink, token }
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.sink.dismiss_progress(self.token);
    }
}

/// Query result shapes the explorer understands, decided in one place at
/// the executor boundary.
#[derive(Clone, Debug)]
pub enum DecodedGraphResult {
    /// Array of vertices (possibly empty)
    Vertices(Vec<GremlinVertex>),
    /// Array of `{e, v}` edge/vertex pairs
    EdgePairs(Vec<EdgeVertexPair>),
    /// Anything else well-formed: scalars, aggregates, non-graph arrays
    Scalar(Value),
    /// Array that claims a graph shape but fails to decode
    Malformed,
}

fn is_vertex_shaped(item: &Value) -> bool {
    item.get("id").is_some() && item.get("type").and_then(Value::as_str) == Some("vertex")
}

fn is_pair_shaped(item: &Value) -> bool {
    let (Some(e), Some(v)) = (item.get("e"), item.get("v")) else {
        return false;
    };
    e.get("id").is_some()
        && e.get("type").and_then(Value::as_str) == Some("edge")
        && is_vertex_shaped(v)
}

/// Classify and decode a query result payload.
///
/// An empty array decodes as an empty vertex list; callers expecting pairs
/// treat it as zero pairs.
pub fn decode_graph_result(data: &Value) -> DecodedGraphResult {
    let Some(items) = data.as_array() else {
        return DecodedGraphResult::Scalar(data.clone());
    };

    if items.is_empty() {
        return DecodedGraphResult::Vertices(Vec::new());
    }

    if items.iter().all(is_pair_shaped) {
        return match serde_json::from_value::<Vec<EdgeVertexPair>>(data.clone()) {
            Ok(pairs) => DecodedGraphResult::EdgePairs(pairs),
            Err(_) => DecodedGraphResult::Malformed,
        };
    }

    if is_vertex_shaped(&items[0]) {
        return match serde_json::from_value::<Vec<GremlinVertex>>(data.clone()) {
            Ok(vertices) => DecodedGraphResult::Vertices(vertices),
            Err(_) => DecodedGraphResult::Malformed,
        };
    }

    DecodedGraphResult::Scalar(data.clone())
}
