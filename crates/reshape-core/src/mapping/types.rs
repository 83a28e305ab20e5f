//! Core types for mapping specifications
//!
//! This module defines the mapping specification, the recursive item template,
//! the operate entries and the callback signatures the engine invokes.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied value transform used by the operate stage.
///
/// Receives the value found at the operation path (`None` when nothing is
/// there) and the opaque call context, and returns the value to store back.
pub type TransformFn = Arc<dyn Fn(Option<&Value>, &Value) -> Result<Value> + Send + Sync>;

/// A caller-supplied per-record callback used by the each stage
pub type EachFn = Arc<dyn Fn(EachItem<'_>) -> Result<()> + Send + Sync>;

/// Recursive description of how one output record is built from one input record
#[derive(Debug, Clone, PartialEq)]
pub enum MappingTemplate {
    /// Dotted path naming a source value to copy
    PathRef(String),
    /// Ordered templates producing an array
    Group(Vec<MappingTemplate>),
    /// Output field name to sub-template, in output order
    Template(Vec<(String, MappingTemplate)>),
    /// Unsupported entry found while loading a document
    Malformed,
}

impl MappingTemplate {
    /// Template copying the value at `path`
    pub fn path(path: impl Into<String>) -> Self {
        MappingTemplate::PathRef(path.into())
    }

    /// Template producing an array, one element per sub-template
    pub fn group<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = MappingTemplate>,
    {
        MappingTemplate::Group(templates.into_iter().collect())
    }

    /// Template producing a record from `(output field, sub-template)` pairs
    pub fn template<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, MappingTemplate)>,
        K: Into<String>,
    {
        MappingTemplate::Template(
            fields
                .into_iter()
                .map(|(name, template)| (name.into(), template))
                .collect(),
        )
    }
}

impl From<&str> for MappingTemplate {
    fn from(path: &str) -> Self {
        MappingTemplate::PathRef(path.to_string())
    }
}

impl From<String> for MappingTemplate {
    fn from(path: String) -> Self {
        MappingTemplate::PathRef(path)
    }
}

/// One `{transform, on}` entry of the operate stage
#[derive(Clone)]
pub struct Operation {
    /// Handler applied to the value at `on`
    pub run: TransformFn,
    /// Dotted path read from and written back to on every record
    pub on: String,
    /// Registry name of the handler, if it was resolved from one
    pub name: Option<String>,
}

impl Operation {
    /// Create an operation from a handler
    pub fn new<F>(on: impl Into<String>, run: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            run: Arc::new(run),
            on: on.into(),
            name: None,
        }
    }

    /// Create an operation from an already shared handler
    pub fn from_fn(on: impl Into<String>, run: TransformFn) -> Self {
        Self {
            run,
            on: on.into(),
            name: None,
        }
    }

    /// Attach the registry name used for logging
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown in logs and debug output
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<fn>")
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("run", &self.label())
            .field("on", &self.on)
            .finish()
    }
}

/// Arguments handed to an each callback for one record
pub struct EachItem<'a> {
    /// Position of the current record in the list
    pub index: usize,
    /// The full output list; the current record is `list[index]`
    pub list: &'a mut [Value],
    /// Opaque caller context
    pub context: &'a Value,
    /// The original input passed to the transformation
    pub data: &'a Value,
    /// The mapping specification being applied
    pub spec: &'a MappingSpec,
}

impl EachItem<'_> {
    /// The current record
    pub fn record(&self) -> &Value {
        &self.list[self.index]
    }

    /// The current record, for in-place changes
    pub fn record_mut(&mut self) -> &mut Value {
        &mut self.list[self.index]
    }
}

/// Declarative configuration for one transformation.
///
/// Built once by the caller and reused across calls; the engine only reads it.
#[derive(Clone, Default)]
pub struct MappingSpec {
    /// Dotted path selecting the array to process; `None` processes the input itself
    pub list: Option<String>,
    /// Template applied to every record; `None` passes records through
    pub item: Option<MappingTemplate>,
    /// Field names deleted from every output record
    pub remove: Vec<String>,
    /// Value transforms applied in declaration order
    pub operate: Vec<Operation>,
    /// Fallback values keyed by output field name
    pub defaults: HashMap<String, Value>,
    /// Per-record side-effect callback
    pub each: Option<EachFn>,
    /// Registry name of `each`, if it was resolved from one
    pub each_name: Option<String>,
}

impl MappingSpec {
    /// Create an empty specification that passes input through unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Default value registered for an output field
    pub fn default_for(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }
        self.defaults.get(key)
    }
}

impl fmt::Debug for MappingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let each = self
            .each
            .as_ref()
            .map(|_| self.each_name.as_deref().unwrap_or("<fn>"));
        f.debug_struct("MappingSpec")
            .field("list", &self.list)
            .field("item", &self.item)
            .field("remove", &self.remove)
            .field("operate", &self.operate)
            .field("defaults", &self.defaults)
            .field("each", &each)
            .finish()
    }
}
