//! Working-list resolution
//!
//! Every transformation runs in list mode. This module picks the records to
//! process and remembers whether the caller should get a list or a single
//! record back.

use crate::mapping::MappingSpec;
use super::path;
use serde_json::Value;
use std::slice;

/// Records selected for processing
#[derive(Debug)]
pub struct WorkingList<'a> {
    /// The records, borrowed from the input
    pub items: &'a [Value],
    /// Whether the result is returned as a list rather than a single record
    pub as_list: bool,
}

impl WorkingList<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Select the working list for `data`.
///
/// With a `list` path, the array found there is used and the result is a
/// list; a path that finds nothing, or finds something other than an array,
/// yields an empty list. Without one, an array input is used as-is and any
/// other input is processed as a single record.
pub fn resolve_list<'a>(data: &'a Value, spec: &MappingSpec) -> WorkingList<'a> {
    match spec.list.as_deref().filter(|p| !p.is_empty()) {
        Some(list_path) => {
            let items: &[Value] = match path::lookup(Some(data), list_path, data) {
                Some(Value::Array(items)) => items.as_slice(),
                Some(other) => {
                    log::debug!(
                        "List path '{}' resolved to a non-array value ({}), treating as empty",
                        list_path,
                        type_name(other)
                    );
                    &[]
                }
                None => {
                    log::debug!("List path '{}' resolved to nothing", list_path);
                    &[]
                }
            };
            WorkingList { items, as_list: true }
        }
        None => match data {
            Value::Array(items) => WorkingList {
                items: items.as_slice(),
                as_list: true,
            },
            single => WorkingList {
                items: slice::from_ref(single),
                as_list: false,
            },
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
