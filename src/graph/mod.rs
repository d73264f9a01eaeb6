//! Граф модель: wire types, коллекции и пере-формирование вокруг root

pub mod data;
pub mod types;
pub mod util;

pub use data::{GraphData, MapArray};
pub use types::{
    EdgeVertexPair, GremlinEdge, GremlinProperty, GremlinShortInEdge, GremlinShortOutEdge,
    GremlinVertex, PageRange, PaginationInfo, PropertyValue,
};
