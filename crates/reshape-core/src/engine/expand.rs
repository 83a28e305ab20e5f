//! Template expansion
//!
//! Builds one output value per input record by walking the item template.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::mapping::{MappingSpec, MappingTemplate};
use super::path;
use serde_json::{Map, Value};

/// Expand `template` against one input record.
///
/// `data` is the original input, used as the lookup root when `item` is
/// falsy. Record fields whose path finds nothing (and has no default) are left
/// out; a path in any other position yields `null` instead, since an array
/// slot or a top-level item cannot be omitted.
pub fn expand(template: &MappingTemplate, item: &Value, data: &Value, spec: &MappingSpec) -> Value {
    match template {
        MappingTemplate::PathRef(source) => {
            path::get_value(Some(item), source, None, data, spec).unwrap_or(Value::Null)
        }
        MappingTemplate::Group(templates) => Value::Array(
            templates
                .iter()
                .map(|sub| expand(sub, item, data, spec))
                .collect(),
        ),
        MappingTemplate::Template(fields) => {
            let mut record = Map::new();
            for (name, sub) in fields {
                match sub {
                    MappingTemplate::PathRef(source) => {
                        if let Some(value) = path::get_value(Some(item), source, Some(name.as_str()), data, spec) {
                            record.insert(name.clone(), value);
                        }
                    }
                    MappingTemplate::Group(_) | MappingTemplate::Template(_) => {
                        record.insert(name.clone(), expand(sub, item, data, spec));
                    }
                    MappingTemplate::Malformed => {
                        log::trace!("Malformed template entry for field '{}'", name);
                        record.insert(name.clone(), Value::String(String::new()));
                    }
                }
            }
            Value::Object(record)
        }
        MappingTemplate::Malformed => Value::Object(Map::new()),
    }
}

/// Expand `template` independently for every record in `list`
pub fn map_items(list: &[Value], template: &MappingTemplate, data: &Value, spec: &MappingSpec) -> Vec<Value> {
    list.iter()
        .map(|item| expand(template, item, data, spec))
        .collect()
}
