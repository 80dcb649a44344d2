//! Raw API records to [`Item`]s
//!
//! A single malformed record aborts the whole batch: callers either get
//! every record normalized or an error naming the first offending one.

use ahash::AHashSet;
use pv_core::Item;
use serde_json::{Map, Value};

use crate::DataError;

/// Parse a response body that must be a JSON array of records
pub fn parse_records(body: &[u8]) -> Result<Vec<Value>, DataError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(records) => Ok(records),
        other => Err(DataError::Parse(format!(
            "expected a JSON array of photo records, got {}",
            json_kind(&other)
        ))),
    }
}

/// Normalize every record, preserving order
///
/// Fails on the first record with a missing or mistyped field, or on an
/// id seen earlier in the batch.
pub fn normalize_records(raw: &[Value]) -> Result<Vec<Item>, DataError> {
    let mut seen = AHashSet::with_capacity(raw.len());

    raw.iter()
        .enumerate()
        .map(|(index, record)| {
            let item = normalize_record(index, record)?;
            if !seen.insert(item.id) {
                return Err(DataError::DuplicateId { id: item.id, index });
            }
            Ok(item)
        })
        .collect()
}

fn normalize_record(index: usize, record: &Value) -> Result<Item, DataError> {
    let object = record.as_object().ok_or_else(|| DataError::MalformedRecord {
        index,
        field: "record",
        reason: format!("is {}, expected an object", json_kind(record)),
    })?;

    Ok(Item::new(
        integer_field(index, object, "id")?,
        string_field(index, object, "title")?,
        string_field(index, object, "thumbnailUrl")?,
        string_field(index, object, "url")?,
        integer_field(index, object, "albumId")?,
    ))
}

fn integer_field(
    index: usize,
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<u64, DataError> {
    let value = required(index, object, field)?;
    value.as_u64().ok_or_else(|| DataError::MalformedRecord {
        index,
        field,
        reason: format!("is {}, expected a non-negative integer", json_kind(value)),
    })
}

fn string_field(
    index: usize,
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, DataError> {
    let value = required(index, object, field)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DataError::MalformedRecord {
            index,
            field,
            reason: format!("is {}, expected a string", json_kind(value)),
        })
}

fn required<'a>(
    index: usize,
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, DataError> {
    match object.get(field) {
        Some(Value::Null) | None => Err(DataError::MalformedRecord {
            index,
            field,
            reason: "is missing".to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
