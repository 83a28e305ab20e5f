//! Reshape Core - Declarative object-reshaping engine
//!
//! This crate converts arbitrary input records into a target shape described by
//! a mapping specification, instead of hand-written transform code per source
//! format.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Mapping Specifications**: Templates, value transforms, defaults and
//!   removals, built in code or loaded from JSON/YAML documents
//! - **Engine**: Dotted-path access, template expansion, list resolution and
//!   the operate / each / remove post-processing stages
//!
//! # Example
//!
//! ```
//! use reshape_core::{transform, MappingSpecBuilder, MappingTemplate, Result};
//! use serde_json::{json, Value};
//!
//! fn example() -> Result<()> {
//!     let spec = MappingSpecBuilder::new()
//!         .list("users")
//!         .item(MappingTemplate::template([("fullName", MappingTemplate::path("name"))]))
//!         .default_value("fullName", json!("Unknown"))
//!         .build();
//!
//!     let output = transform(&json!({"users": [{"name": "Ann", "age": 30}]}), &spec, &Value::Null)?;
//!     assert_eq!(output, json!([{"fullName": "Ann"}]));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod mapping;
pub mod engine;

// Re-export main types for convenience
pub use error::{CallbackKind, Error, Result};
pub use mapping::{
    // Specification types
    MappingSpec, MappingTemplate, Operation,

    // Callback types
    TransformFn, EachFn, EachItem,

    // Construction
    MappingSpecBuilder, CallbackRegistry,
};
pub use mapping::built_in;
pub use engine::{transform, transform_async};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
