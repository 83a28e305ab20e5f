//! Mapping specifications: what a transformation should produce
//!
//! A [`MappingSpec`] describes one reshaping declaratively: which list to
//! process, how each record is rebuilt, which value transforms run afterwards,
//! which fields are dropped and which defaults fill the gaps.
//!
//! # Module Organization
//!
//! - [`types`] - Specification, template and callback types
//! - [`builder`] - Fluent builder API for specifications written in code
//! - [`registry`] - Named handlers referenced from mapping documents
//! - [`built_in`] - Opt-in stock transform handlers
//! - [`loader`] - Building specifications from JSON and YAML documents
//!
//! # Examples
//!
//! ```
//! use reshape_core::{MappingSpecBuilder, MappingTemplate};
//! use serde_json::json;
//!
//! let spec = MappingSpecBuilder::new()
//!     .list("users")
//!     .item(MappingTemplate::template([("fullName", MappingTemplate::path("name"))]))
//!     .default_value("fullName", json!("Unknown"))
//!     .build();
//!
//! assert_eq!(spec.list.as_deref(), Some("users"));
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

// Core types
pub mod types;

// Builder API
pub mod builder;

// Named handler registry
pub mod registry;

// Stock handlers
pub mod built_in;

// Document loading
pub mod loader;

pub use types::{EachFn, EachItem, MappingSpec, MappingTemplate, Operation, TransformFn};
pub use builder::MappingSpecBuilder;
pub use registry::CallbackRegistry;
