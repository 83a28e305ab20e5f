//! Built-in transform handlers for common operations
//!
//! Nothing here runs unless a caller registers it or places it in an operate
//! entry. The handlers cover the usual scalar clean-ups: type conversions,
//! case changes and trimming.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::Error;
use crate::Result;
use super::types::TransformFn;
use serde_json::{Number, Value};
use std::sync::Arc;

/// Every named built-in, as registered by `CallbackRegistry::with_built_ins`
pub fn named() -> Vec<(&'static str, TransformFn)> {
    vec![
        ("identity", identity()),
        ("to_string", to_string()),
        ("to_number", to_number()),
        ("to_boolean", to_boolean()),
        ("uppercase", uppercase()),
        ("lowercase", lowercase()),
        ("trim", trim()),
    ]
}

/// Return the value unchanged; a missing value becomes `null`
pub fn identity() -> TransformFn {
    Arc::new(|value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        Ok(value.cloned().unwrap_or(Value::Null))
    })
}

/// Render scalars as strings; strings and missing values pass through
pub fn to_string() -> TransformFn {
    Arc::new(|value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        match value {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::String(s)) => Ok(Value::String(s.clone())),
            Some(Value::Number(n)) => Ok(Value::String(n.to_string())),
            Some(Value::Bool(b)) => Ok(Value::String(b.to_string())),
            Some(other) => Err(conversion_error("to_string", other, "string")),
        }
    })
}

/// Parse strings as numbers; numbers pass through
pub fn to_number() -> TransformFn {
    Arc::new(|value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        match value {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::Number(n)) => Ok(Value::Number(n.clone())),
            Some(Value::String(s)) => parse_number(s.trim())
                .ok_or_else(|| conversion_error("to_number", &Value::String(s.clone()), "number")),
            Some(Value::Bool(b)) => Ok(Value::from(u8::from(*b))),
            Some(other) => Err(conversion_error("to_number", other, "number")),
        }
    })
}

/// Convert common truthy/falsy spellings to booleans
pub fn to_boolean() -> TransformFn {
    Arc::new(|value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        match value {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::Bool(b)) => Ok(Value::Bool(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
                "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
                _ => Err(conversion_error("to_boolean", &Value::String(s.clone()), "boolean")),
            },
            Some(Value::Number(n)) => Ok(Value::Bool(n.as_f64().map(|f| f != 0.0).unwrap_or(false))),
            Some(other) => Err(conversion_error("to_boolean", other, "boolean")),
        }
    })
}

/// Uppercase strings; other values pass through
pub fn uppercase() -> TransformFn {
    map_string(|s| s.to_uppercase())
}

/// Lowercase strings; other values pass through
pub fn lowercase() -> TransformFn {
    map_string(|s| s.to_lowercase())
}

/// Trim surrounding whitespace from strings; other values pass through
pub fn trim() -> TransformFn {
    map_string(|s| s.trim().to_string())
}

/// Replace a missing or `null` value with `fallback`
pub fn default_to(fallback: Value) -> TransformFn {
    Arc::new(move |value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        match value {
            None | Some(Value::Null) => Ok(fallback.clone()),
            Some(v) => Ok(v.clone()),
        }
    })
}

fn map_string<F>(f: F) -> TransformFn
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(move |value: Option<&Value>, _ctx: &Value| -> Result<Value> {
        match value {
            Some(Value::String(s)) => Ok(Value::String(f(s))),
            Some(other) => Ok(other.clone()),
            None => Ok(Value::Null),
        }
    })
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn conversion_error(handler: &str, value: &Value, to: &str) -> Error {
    Error::callback(format!("{}: cannot convert {} to {}", handler, value, to))
}
