//! Ограниченные кэши результатов запросов
//!
//! Both caches are owned by one explorer instance and cleared at the start
//! of every new top-level query.

pub mod arrays_by_key;
pub mod edge_info;

pub use arrays_by_key::ArraysByKeyCache;
pub use edge_info::EdgeInfoCache;
