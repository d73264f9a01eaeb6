//! Error types for the graph explorer core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Query result does not match the expected vertex or edge/vertex-pair shape
    #[error("Malformed query result: {0}")]
    MalformedResult(String),

    /// Remote/transport failure surfaced by the query executor
    #[error("Query failed: {query}: {message}")]
    Executor { query: String, message: String },

    /// Document-side failure surfaced by the document pager
    #[error("Document query failed: {query}: {message}")]
    DocumentQuery { query: String, message: String },

    /// Vertex id is not a string when computing a pk/id pair
    #[error("Vertex id is not a string: {0}")]
    NonStringVertexId(String),

    /// Partition key is neither scalar nor a non-empty array
    #[error("Vertex pk is not a string nor a non-empty array: {0}")]
    InvalidPartitionKey(String),

    /// Fetch attempted at a negative or otherwise unusable offset
    #[error("Invalid fetch range: {0}")]
    InvalidFetchRange(String),

    /// No root candidate known for the requested id
    #[error("No known vertex with id: {0}")]
    UnknownRootCandidate(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
