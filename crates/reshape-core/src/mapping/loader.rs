//! Loading mapping specifications from JSON and YAML documents
//!
//! A document names its transforms and each-callback by registry name; the
//! loader resolves those names against a [`CallbackRegistry`]. No file access
//! happens here, callers hand over the document text or value.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::Error;
use crate::Result;
use super::registry::CallbackRegistry;
use super::types::{MappingSpec, MappingTemplate, Operation};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Serialized form of a mapping specification
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingDocument {
    #[serde(default)]
    list: Option<String>,
    #[serde(default)]
    item: Option<Value>,
    #[serde(default)]
    remove: Vec<String>,
    #[serde(default)]
    operate: Vec<OperationDocument>,
    #[serde(default)]
    defaults: HashMap<String, Value>,
    #[serde(default)]
    each: Option<String>,
}

/// Serialized form of one operate entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct OperationDocument {
    run: String,
    on: String,
}

impl MappingSpec {
    /// Build a specification from an already parsed JSON value
    pub fn from_value(document: &Value, registry: &CallbackRegistry) -> Result<Self> {
        let Some(fields) = document.as_object() else {
            return Err(Error::configuration(
                "Mapping document must be an object",
                None,
            ));
        };
        let parsed = MappingDocument::deserialize(document)
            .map_err(|e| Error::configuration(e.to_string(), failing_key(fields)))?;
        resolve(parsed, registry)
    }

    /// Build a specification from JSON text
    pub fn from_json_str(text: &str, registry: &CallbackRegistry) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document, registry)
    }

    /// Build a specification from YAML text
    pub fn from_yaml_str(text: &str, registry: &CallbackRegistry) -> Result<Self> {
        let document: Value = serde_yaml::from_str(text)?;
        Self::from_value(&document, registry)
    }
}

impl MappingTemplate {
    /// Interpret a document value as a template.
    ///
    /// Strings become path references, arrays become groups and objects become
    /// templates. Any other leaf is kept as [`MappingTemplate::Malformed`].
    pub fn from_document(value: &Value) -> Self {
        match value {
            Value::String(path) => MappingTemplate::PathRef(path.clone()),
            Value::Array(items) => {
                MappingTemplate::Group(items.iter().map(Self::from_document).collect())
            }
            Value::Object(fields) => MappingTemplate::Template(
                fields
                    .iter()
                    .map(|(name, sub)| (name.clone(), Self::from_document(sub)))
                    .collect(),
            ),
            other => {
                log::trace!("Unsupported template entry {} loaded as malformed", other);
                MappingTemplate::Malformed
            }
        }
    }
}

/// First top-level key that does not load on its own
fn failing_key(fields: &Map<String, Value>) -> Option<&str> {
    fields
        .iter()
        .find(|(name, value)| {
            let mut single = Map::new();
            single.insert((*name).clone(), (*value).clone());
            MappingDocument::deserialize(&Value::Object(single)).is_err()
        })
        .map(|(name, _)| name.as_str())
}

fn resolve(document: MappingDocument, registry: &CallbackRegistry) -> Result<MappingSpec> {
    let operate = document
        .operate
        .into_iter()
        .map(|op| {
            let run = registry.require_transform(&op.run)?;
            Ok(Operation::from_fn(op.on, run).named(op.run))
        })
        .collect::<Result<Vec<_>>>()?;

    let (each, each_name) = match document.each {
        Some(name) => (Some(registry.require_each(&name)?), Some(name)),
        None => (None, None),
    };

    let spec = MappingSpec {
        list: document.list,
        item: document.item.as_ref().map(MappingTemplate::from_document),
        remove: document.remove,
        operate,
        defaults: document.defaults,
        each,
        each_name,
    };
    log::debug!(
        "Loaded mapping spec: list={:?}, {} operate entries, {} removals, {} defaults",
        spec.list,
        spec.operate.len(),
        spec.remove.len(),
        spec.defaults.len()
    );
    Ok(spec)
}
