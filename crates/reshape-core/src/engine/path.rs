//! Dotted-path access over nested records
//!
//! Paths are plain dot-delimited field names (`user.address.city`). A segment
//! that parses as an unsigned integer also indexes into arrays
//! (`items.0.name`). There is no other syntax.
//!
//! Reads never fail: a path that leads nowhere yields `None`, which callers
//! resolve through defaults or by omitting the field. Traversal stops at any
//! falsy value (`null`, `false`, `0`, `""`) that still has segments after it,
//! not only at missing keys.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::mapping::MappingSpec;
use serde_json::{Map, Value};

/// Whether a value counts as falsy for traversal purposes.
///
/// Empty arrays and objects are truthy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Borrow the value at `path` without consulting defaults.
///
/// Starts from `root`, or from `root_data` when `root` is absent or falsy.
/// An empty path returns `root` itself.
pub fn lookup<'a>(root: Option<&'a Value>, path: &str, root_data: &'a Value) -> Option<&'a Value> {
    if path.is_empty() {
        return root;
    }

    let mut current = match root {
        Some(value) if !is_falsy(value) => Some(value),
        _ => Some(root_data),
    };

    for segment in path.split('.') {
        current = match current {
            Some(value) if !is_falsy(value) => child(value, segment),
            _ => None,
        };
        if current.is_none() {
            break;
        }
    }

    current
}

/// Read the value at `path`, falling back to the default registered for
/// `default_key` when nothing is found.
///
/// A stored `null` is a found value and is returned as-is.
pub fn get_value(
    root: Option<&Value>,
    path: &str,
    default_key: Option<&str>,
    root_data: &Value,
    spec: &MappingSpec,
) -> Option<Value> {
    if path.is_empty() {
        return root.cloned();
    }
    if let Some(found) = lookup(root, path, root_data) {
        return Some(found.clone());
    }

    let fallback = default_key.and_then(|key| spec.default_for(key));
    if fallback.is_some() {
        log::trace!(
            "No value at '{}', using default for '{}'",
            path,
            default_key.unwrap_or_default()
        );
    }
    fallback.cloned()
}

/// Write `value` at `path`, creating empty records for missing or falsy
/// intermediate segments.
///
/// Does nothing for an empty path or a root that cannot hold fields. A write
/// that would have to pass through a truthy scalar is dropped.
pub fn set_value(root: &mut Value, path: &str, value: Value) {
    if path.is_empty() || !is_container(root) {
        return;
    }

    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut target = root;
    for segment in parents {
        target = match child_slot(target, segment) {
            Some(slot) => slot,
            None => {
                log::trace!("Dropped write to '{}': no slot for segment '{}'", path, segment);
                return;
            }
        };
        if is_falsy(target) {
            *target = Value::Object(Map::new());
        } else if !is_container(target) {
            log::trace!("Dropped write to '{}': segment '{}' holds a scalar", path, segment);
            return;
        }
    }

    assign(target, last, value);
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_slot<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => Some(map.entry(segment).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok()?;
            if index == items.len() {
                items.push(Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}

fn assign(target: &mut Value, segment: &str, value: Value) {
    match target {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
        }
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) if index < items.len() => items[index] = value,
            Ok(index) if index == items.len() => items.push(value),
            _ => log::trace!("Dropped array write at segment '{}'", segment),
        },
        _ => {}
    }
}
