//! The reshaping engine
//!
//! A transformation runs as a fixed pipeline:
//!
//! 1. [`list`] picks the working list and the output cardinality
//! 2. [`expand`] rebuilds each record from the item template
//! 3. [`pipeline`] runs operate, then each, then remove
//!
//! Path reads and writes used throughout live in [`path`].
//!
//! # Examples
//!
//! ```
//! use reshape_core::{transform, MappingSpecBuilder, MappingTemplate};
//! use serde_json::{json, Value};
//!
//! let spec = MappingSpecBuilder::new()
//!     .list("users")
//!     .item(MappingTemplate::template([("fullName", MappingTemplate::path("name"))]))
//!     .default_value("fullName", json!("Unknown"))
//!     .build();
//!
//! let input = json!({"users": [{"name": "Ann", "age": 30}, {"age": 41}]});
//! let output = transform(&input, &spec, &Value::Null).unwrap();
//! assert_eq!(output, json!([{"fullName": "Ann"}, {"fullName": "Unknown"}]));
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod path;
pub mod list;
pub mod expand;
pub mod pipeline;

#[cfg(test)]
mod tests;


use crate::mapping::MappingSpec;
use crate::Result;
use serde_json::Value;

/// Reshape `data` according to `spec`.
///
/// `context` is passed untouched to every transform and each callback. The
/// result is a list when `spec.list` is set or `data` is an array, and a
/// single record otherwise. An empty working list always yields an empty
/// array. The first callback error aborts the call and is returned as-is.
pub fn transform(data: &Value, spec: &MappingSpec, context: &Value) -> Result<Value> {
    let working = list::resolve_list(data, spec);
    if working.is_empty() {
        log::debug!("Working list is empty, returning an empty array");
        return Ok(Value::Array(Vec::new()));
    }

    let mut records = match &spec.item {
        Some(template) => expand::map_items(working.items, template, data, spec),
        None => working.items.to_vec(),
    };

    pipeline::operate(&mut records, context, data, spec)?;
    pipeline::each(&mut records, context, data, spec)?;
    pipeline::remove(&mut records, spec);

    log::debug!(
        "Transformed {} records (operate: {}, removed fields: {}, as list: {})",
        records.len(),
        spec.operate.len(),
        spec.remove.len(),
        working.as_list
    );

    if working.as_list {
        Ok(Value::Array(records))
    } else {
        Ok(records.into_iter().next().unwrap_or(Value::Null))
    }
}

/// Asynchronous form of [`transform`].
///
/// Runs the same synchronous computation and resolves with its result; it
/// never yields, spawns or blocks.
pub async fn transform_async(data: &Value, spec: &MappingSpec, context: &Value) -> Result<Value> {
    transform(data, spec, context)
}

impl MappingSpec {
    /// Apply this specification to `data`; see [`transform`]
    pub fn apply(&self, data: &Value, context: &Value) -> Result<Value> {
        transform(data, self, context)
    }
}
