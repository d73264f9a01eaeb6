//! Gremlin query-text construction
//!
//! Stateless helpers that shape the paginated adjacency queries and the
//! identity fragments (`pkid` pairs) embedded in them. Query strings are
//! bounded: exclusion clauses are packed greedily up to a maximum argument
//! length and pagination falls back from `limit()` to `range()` when not
//! every already-loaded edge id fits.

use serde_json::Value;

use crate::error::{ExplorerError, Result};
use crate::graph::{GremlinVertex, PropertyValue};

/// Output of [`get_limited_array_string`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinArrayMaxCharOutput {
    pub result: String,
    /// Number of leading items consumed
    pub consumed_count: usize,
}

/// From `["id1", "id2", "idn"]` build `'id1','id2','idn'`, greedily joining
/// as many leading items as fit within `max_size` characters. Empty output
/// if even the first quoted item doesn't fit.
pub fn get_limited_array_string(array: &[String], max_size: usize) -> JoinArrayMaxCharOutput {
    if array.is_empty() || array[0].len() + 2 > max_size {
        return JoinArrayMaxCharOutput {
            result: String::new(),
            consumed_count: 0,
        };
    }

    let mut output = format!("'{}'", array[0]);
    let mut consumed = 1;
    for item in &array[1..] {
        let candidate = format!("{},'{}'", output, item);
        if candidate.len() <= max_size {
            output = candidate;
            consumed += 1;
        } else {
            break;
        }
    }

    JoinArrayMaxCharOutput {
        result: output,
        consumed_count: consumed,
    }
}

/// Build a paginated "fetch adjacent edge+vertex pairs" query for one
/// direction (`out_e` true: outgoing, false: incoming).
///
/// Already-loaded edges are excluded through a `without()` step packed up to
/// `without_step_arg_max_length` characters. When every excluded id fits,
/// the page is expressed with `limit()` relative to the filtered stream;
/// otherwise with `range()` whose bounds are shifted left by the number of
/// ids the exclusion clause could pack.
pub fn create_fetch_edge_pair_query(
    out_e: bool,
    pkid: &str,
    excluded_edge_ids: &[String],
    start_index: usize,
    page_size: usize,
    without_step_arg_max_length: usize,
) -> String {
    let (edge_step, vertex_step) = if out_e { ("outE", "inV") } else { ("inE", "outV") };

    if !excluded_edge_ids.is_empty() {
        let joined = get_limited_array_string(excluded_edge_ids, without_step_arg_max_length);
        let has_without_step = if joined.result.is_empty() {
            String::new()
        } else {
            format!(".has(id, without({}))", joined.result)
        };

        if joined.consumed_count == excluded_edge_ids.len() {
            format!(
                "g.V({}).{}(){}.limit({}).as('e').{}().as('v').select('e', 'v')",
                pkid, edge_step, has_without_step, page_size, vertex_step
            )
        } else {
            let start = start_index as i64 - joined.consumed_count as i64;
            format!(
                "g.V({}).{}(){}.range({},{}).as('e').{}().as('v').select('e', 'v')",
                pkid,
                edge_step,
                has_without_step,
                start,
                start + page_size as i64,
                vertex_step
            )
        }
    } else {
        format!(
            "g.V({}).{}().limit({}).as('e').{}().as('v').select('e', 'v')",
            pkid, edge_step, page_size, vertex_step
        )
    }
}

/// Minimal substitution to keep a double-quoted Gremlin string intact
pub fn escape_double_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Minimal substitution to keep a single-quoted Gremlin string intact
pub fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Render a property value for a `.property(...)` step: numbers and
/// booleans verbatim, strings double-quoted, nulls dropped.
pub fn quoted_prop_value(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Number(n) => Some(format!("{}", n)),
        PropertyValue::Bool(b) => Some(format!("{}", b)),
        PropertyValue::String(s) => Some(format!("\"{}\"", escape_double_quotes(s))),
        PropertyValue::Other(Value::Null) => None,
        PropertyValue::Other(v) => Some(format!("\"{}\"", escape_double_quotes(&v.to_string()))),
    }
}

/// `['pk', 'id']` fragment: string pk quoted, non-string verbatim
pub fn generate_pk_id_pair(pk: &PropertyValue, id: &str) -> String {
    let pk_str = match pk {
        PropertyValue::String(s) => format!("'{}'", s),
        other => format!("{}", other),
    };
    format!("[{}, '{}']", pk_str, escape_single_quotes(id))
}

/// Identity fragment for a vertex: pk-id pair on a partitioned collection
/// (when the partition-key property is present), quoted id otherwise.
pub fn pk_id_from_vertex(vertex: &GremlinVertex, partition_key_property: Option<&str>) -> String {
    if let Some(pk_prop) = partition_key_property {
        if let Some(pk) = vertex
            .properties
            .get(pk_prop)
            .and_then(|values| values.first())
            .map(|p| p.value.clone())
        {
            return generate_pk_id_pair(&pk, &vertex.id);
        }
    }
    format!("'{}'", escape_single_quotes(&vertex.id))
}

/// Identity fragment for a raw document from the document store.
///
/// Not total: a non-string id or a partition key that is neither scalar nor
/// a non-empty array is an error.
pub fn pk_id_from_document(doc: &Value, partition_key_property: Option<&str>) -> Result<String> {
    let id = match doc.get("id") {
        Some(Value::String(id)) => id.clone(),
        other => {
            return Err(ExplorerError::NonStringVertexId(
                serde_json::to_string(&other).unwrap_or_default(),
            ))
        }
    };

    if let Some(pk_prop) = partition_key_property {
        if let Some(pk) = doc.get(pk_prop) {
            let pk_value = match pk {
                Value::String(s) => PropertyValue::String(s.clone()),
                Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or_default()),
                Value::Bool(b) => PropertyValue::Bool(*b),
                Value::Array(items) if !items.is_empty() => {
                    // pk is [{ id: 'id', _value: 'value' }]
                    match items[0].get("_value") {
                        Some(Value::String(s)) => PropertyValue::String(s.clone()),
                        Some(Value::Number(n)) => PropertyValue::Number(n.as_f64().unwrap_or_default()),
                        Some(Value::Bool(b)) => PropertyValue::Bool(*b),
                        other => {
                            return Err(ExplorerError::InvalidPartitionKey(
                                serde_json::to_string(&other).unwrap_or_default(),
                            ))
                        }
                    }
                }
                other => {
                    return Err(ExplorerError::InvalidPartitionKey(other.to_string()));
                }
            };
            return Ok(generate_pk_id_pair(&pk_value, &id));
        }
    }

    Ok(format!("'{}'", escape_single_quotes(&id)))
}
