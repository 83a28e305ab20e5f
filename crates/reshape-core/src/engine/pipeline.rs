//! Post-processing stages
//!
//! After expansion the list passes through three stages, in this order:
//! operate (value transforms), each (per-record callback) and remove (field
//! deletion). Errors from caller callbacks are returned untouched and abort
//! the remaining work.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::mapping::{EachItem, MappingSpec};
use crate::Result;
use super::path;
use serde_json::Value;

/// Apply every operate entry, in declaration order, to every record.
///
/// An entry runs across the whole list before the next entry starts.
pub fn operate(list: &mut [Value], context: &Value, data: &Value, spec: &MappingSpec) -> Result<()> {
    for operation in &spec.operate {
        log::trace!("Applying '{}' on '{}' to {} records", operation.label(), operation.on, list.len());
        for record in list.iter_mut() {
            let current = path::get_value(Some(&*record), &operation.on, None, data, spec);
            let updated = (operation.run)(current.as_ref(), context)?;
            path::set_value(record, &operation.on, updated);
        }
    }
    Ok(())
}

/// Invoke the each callback once per record, in list order
pub fn each(list: &mut [Value], context: &Value, data: &Value, spec: &MappingSpec) -> Result<()> {
    let Some(callback) = &spec.each else {
        return Ok(());
    };
    for index in 0..list.len() {
        callback(EachItem {
            index,
            list: &mut *list,
            context,
            data,
            spec,
        })?;
    }
    Ok(())
}

/// Delete the configured fields from every record
pub fn remove(list: &mut [Value], spec: &MappingSpec) {
    if spec.remove.is_empty() {
        return;
    }
    for record in list.iter_mut() {
        match record {
            Value::Object(fields) => {
                for name in &spec.remove {
                    fields.shift_remove(name.as_str());
                }
            }
            other => log::trace!("Skipping removal on non-record value {}", other),
        }
    }
}
