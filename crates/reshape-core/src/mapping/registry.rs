//! Named callback registry
//!
//! Mapping documents refer to transforms and each-callbacks by name. The
//! registry resolves those names to handlers the caller registered up front.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::{CallbackKind, Error};
use crate::Result;
use super::built_in;
use super::types::{EachFn, EachItem, TransformFn};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry mapping names to transform and each handlers
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    transforms: HashMap<String, TransformFn>,
    each: HashMap<String, EachFn>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the stock handlers from [`built_in`]
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        for (name, handler) in built_in::named() {
            registry.register_shared_transform(name, handler);
        }
        registry
    }

    /// Register a transform handler, replacing any handler with the same name
    pub fn register_transform<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Option<&Value>, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_shared_transform(name, Arc::new(handler))
    }

    /// Register an already shared transform handler
    pub fn register_shared_transform(
        &mut self,
        name: impl Into<String>,
        handler: TransformFn,
    ) -> &mut Self {
        let name = name.into();
        if self.transforms.insert(name.clone(), handler).is_some() {
            log::debug!("Replaced transform handler '{}'", name);
        }
        self
    }

    /// Register an each handler, replacing any handler with the same name
    pub fn register_each<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(EachItem<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.each.insert(name.clone(), Arc::new(handler)).is_some() {
            log::debug!("Replaced each handler '{}'", name);
        }
        self
    }

    /// Look up a transform handler
    pub fn transform(&self, name: &str) -> Option<TransformFn> {
        self.transforms.get(name).cloned()
    }

    /// Look up an each handler
    pub fn each(&self, name: &str) -> Option<EachFn> {
        self.each.get(name).cloned()
    }

    /// Look up a transform handler, failing on an unknown name
    pub fn require_transform(&self, name: &str) -> Result<TransformFn> {
        self.transform(name).ok_or_else(|| Error::UnknownCallback {
            name: name.to_string(),
            kind: CallbackKind::Transform,
        })
    }

    /// Look up an each handler, failing on an unknown name
    pub fn require_each(&self, name: &str) -> Result<EachFn> {
        self.each(name).ok_or_else(|| Error::UnknownCallback {
            name: name.to_string(),
            kind: CallbackKind::Each,
        })
    }

    /// Number of registered transform handlers
    pub fn transform_count(&self) -> usize {
        self.transforms.len()
    }

    /// Number of registered each handlers
    pub fn each_count(&self) -> usize {
        self.each.len()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut transforms: Vec<&String> = self.transforms.keys().collect();
        transforms.sort();
        let mut each: Vec<&String> = self.each.keys().collect();
        each.sort();
        f.debug_struct("CallbackRegistry")
            .field("transforms", &transforms)
            .field("each", &each)
            .finish()
    }
}
