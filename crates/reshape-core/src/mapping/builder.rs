//! Builder for creating mapping specifications
//!
//! This module provides a fluent builder API for constructing a
//! [`MappingSpec`] in code rather than loading it from a document.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use super::types::{EachFn, EachItem, MappingSpec, MappingTemplate, Operation, TransformFn};
use serde_json::Value;
use std::sync::Arc;

/// Builder for creating mapping specifications
#[derive(Default)]
pub struct MappingSpecBuilder {
    spec: MappingSpec,
}

impl MappingSpecBuilder {
    /// Create a new, empty builder
    pub fn new() -> Self {
        Self { spec: MappingSpec::new() }
    }

    /// Process the array found at `path` instead of the input itself
    pub fn list(mut self, path: impl Into<String>) -> Self {
        self.spec.list = Some(path.into());
        self
    }

    /// Set the item template
    pub fn item(mut self, template: impl Into<MappingTemplate>) -> Self {
        self.spec.item = Some(template.into());
        self
    }

    /// Remove every listed field from each output record
    pub fn remove<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.remove.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Remove a single field from each output record
    pub fn remove_field(mut self, field: impl Into<String>) -> Self {
        self.spec.remove.push(field.into());
        self
    }

    /// Register a fallback value for an output field
    pub fn default_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.spec.defaults.insert(field.into(), value);
        self
    }

    /// Register several fallback values
    pub fn defaults<I, K>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.spec
            .defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Append an operate entry running `run` on the value at `on`
    pub fn operate<F>(mut self, on: impl Into<String>, run: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.spec.operate.push(Operation::new(on, run));
        self
    }

    /// Append an operate entry with a shared, named handler
    pub fn operate_named(
        mut self,
        on: impl Into<String>,
        name: impl Into<String>,
        run: TransformFn,
    ) -> Self {
        self.spec.operate.push(Operation::from_fn(on, run).named(name));
        self
    }

    /// Append a prepared operate entry
    pub fn operation(mut self, operation: Operation) -> Self {
        self.spec.operate.push(operation);
        self
    }

    /// Set the per-record callback
    pub fn each<F>(mut self, each: F) -> Self
    where
        F: Fn(EachItem<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.spec.each = Some(Arc::new(each));
        self.spec.each_name = None;
        self
    }

    /// Set a shared, named per-record callback
    pub fn each_named(mut self, name: impl Into<String>, each: EachFn) -> Self {
        self.spec.each = Some(each);
        self.spec.each_name = Some(name.into());
        self
    }

    /// Build the mapping specification
    pub fn build(self) -> MappingSpec {
        self.spec
    }
}
