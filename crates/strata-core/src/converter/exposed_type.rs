//! Persisted form of `ExposedType`
//!
//! Tokens are stored verbatim, types as fully-qualified names. Mappings and
//! sequences apply the same rule to every element. On load a string that is
//! not a known token is located through the registry.

use serde_json::{Map, Value};

use super::references::EXPOSED_TYPE_KEY;
use crate::errors::{Result, StrataError};
use crate::model::{ExposedEntry, ExposedToken, ExposedType};
use crate::registry::Registry;

pub fn serialize(exposed: &ExposedType) -> Value {
    match exposed {
        ExposedType::Token(token) => Value::String(token.as_str().to_string()),
        ExposedType::Type(handle) => Value::String(handle.path().qualified()),
        ExposedType::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), serialize_entry(v)))
                .collect::<Map<String, Value>>(),
        ),
        ExposedType::List(entries) => Value::Array(entries.iter().map(serialize_entry).collect()),
    }
}

fn serialize_entry(entry: &ExposedEntry) -> Value {
    match entry {
        ExposedEntry::Token(token) => Value::String(token.as_str().to_string()),
        ExposedEntry::Type(handle) => Value::String(handle.path().qualified()),
    }
}

/// Rebuild an exposed type; `Null` means the node has none
pub fn deserialize(value: &Value, registry: &Registry) -> Result<Option<ExposedType>> {
    let exposed: ExposedType = match value {
        Value::Null => return Ok(None),
        Value::String(s) => deserialize_entry_str(s, registry)?.into(),
        Value::Object(map) => ExposedType::Map(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), deserialize_entry(v, registry)?)))
                .collect::<Result<_>>()?,
        ),
        Value::Array(items) => ExposedType::List(
            items
                .iter()
                .map(|v| deserialize_entry(v, registry))
                .collect::<Result<_>>()?,
        ),
        other => {
            return Err(StrataError::format(
                EXPOSED_TYPE_KEY,
                format!("unsupported exposed type value {}", other),
            ))
        }
    };
    Ok(Some(exposed))
}

fn deserialize_entry(value: &Value, registry: &Registry) -> Result<ExposedEntry> {
    match value {
        Value::String(s) => deserialize_entry_str(s, registry),
        other => Err(StrataError::format(
            EXPOSED_TYPE_KEY,
            format!("expected a token or qualified name, found {}", other),
        )),
    }
}

fn deserialize_entry_str(raw: &str, registry: &Registry) -> Result<ExposedEntry> {
    match ExposedToken::parse(raw) {
        Some(token) => Ok(ExposedEntry::Token(token)),
        None => registry.locate(raw).map(ExposedEntry::Type),
    }
}
