//! Encoding of function and type references as property values
//!
//! A reference is persisted as a `<prefix>_name` / `<prefix>_module` pair
//! holding the symbol name and namespace, or as a single fully-qualified
//! string. Both keys null means "no reference".

use serde_json::Value;

use crate::errors::{Result, StrataError};
use crate::model::PropertyMap;
use crate::registry::{FunctionHandle, Registry, SymbolPath, TypeHandle};

pub const READ_FCT_NAME_KEY: &str = "read_fct_name";
pub const READ_FCT_MODULE_KEY: &str = "read_fct_module";
pub const WRITE_FCT_NAME_KEY: &str = "write_fct_name";
pub const WRITE_FCT_MODULE_KEY: &str = "write_fct_module";
pub const ENCODER_NAME_KEY: &str = "encoder_name";
pub const ENCODER_MODULE_KEY: &str = "encoder_module";
pub const DECODER_NAME_KEY: &str = "decoder_name";
pub const DECODER_MODULE_KEY: &str = "decoder_module";
pub const WRITE_QUERY_BUILDER_NAME_KEY: &str = "write_query_builder_name";
pub const WRITE_QUERY_BUILDER_MODULE_KEY: &str = "write_query_builder_module";
pub const CUSTOM_DOCUMENT_KEY: &str = "custom_document";
pub const EXPOSED_TYPE_KEY: &str = "exposed_type";

/// Name/namespace key pair of one reference slot
#[derive(Debug, Clone, Copy)]
pub struct PairKeys {
    pub name: &'static str,
    pub module: &'static str,
}

pub const READ_FCT: PairKeys = PairKeys {
    name: READ_FCT_NAME_KEY,
    module: READ_FCT_MODULE_KEY,
};
pub const WRITE_FCT: PairKeys = PairKeys {
    name: WRITE_FCT_NAME_KEY,
    module: WRITE_FCT_MODULE_KEY,
};
pub const ENCODER: PairKeys = PairKeys {
    name: ENCODER_NAME_KEY,
    module: ENCODER_MODULE_KEY,
};
pub const DECODER: PairKeys = PairKeys {
    name: DECODER_NAME_KEY,
    module: DECODER_MODULE_KEY,
};
pub const WRITE_QUERY_BUILDER: PairKeys = PairKeys {
    name: WRITE_QUERY_BUILDER_NAME_KEY,
    module: WRITE_QUERY_BUILDER_MODULE_KEY,
};

/// Write `path` into the pair, or nulls when absent
pub fn put_pair(props: &mut PropertyMap, keys: PairKeys, path: Option<&SymbolPath>) {
    let (name, module) = match path {
        Some(p) => (
            Value::String(p.name().to_string()),
            Value::String(p.namespace().to_string()),
        ),
        None => (Value::Null, Value::Null),
    };
    props.set(keys.name, name);
    props.set(keys.module, module);
}

/// Remove the pair from `props` and return `(namespace, name)` if set
///
/// Empty strings count as unset. A pair with only one side set cannot be
/// resolved and is rejected.
fn take_pair(props: &mut PropertyMap, keys: PairKeys) -> Result<Option<(String, String)>> {
    let name = take_optional_string(props, keys.name)?;
    let module = take_optional_string(props, keys.module)?;
    match (module, name) {
        (Some(module), Some(name)) => Ok(Some((module, name))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(StrataError::format(keys.name, "namespace is set but name is missing")),
        (None, Some(_)) => Err(StrataError::format(keys.module, "name is set but namespace is missing")),
    }
}

fn take_optional_string(props: &mut PropertyMap, key: &str) -> Result<Option<String>> {
    match props.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(StrataError::format(key, format!("expected a string, found {}", other))),
    }
}

/// Remove a function pair from `props` and resolve it
pub fn take_function(
    props: &mut PropertyMap,
    keys: PairKeys,
    registry: &Registry,
) -> Result<Option<FunctionHandle>> {
    take_pair(props, keys)?
        .map(|(module, name)| registry.resolve_function(&module, &name))
        .transpose()
}

/// Remove a type pair from `props` and resolve it
pub fn take_type(
    props: &mut PropertyMap,
    keys: PairKeys,
    registry: &Registry,
) -> Result<Option<TypeHandle>> {
    take_pair(props, keys)?
        .map(|(module, name)| registry.resolve_type(&module, &name))
        .transpose()
}

/// Write a type as one fully-qualified string, or drop the key when absent
pub fn put_qualified(props: &mut PropertyMap, key: &str, handle: Option<&TypeHandle>) {
    match handle {
        Some(h) => {
            props.set(key, Value::String(h.path().qualified()));
        }
        None => {
            props.remove(key);
        }
    }
}

/// Remove a fully-qualified type string from `props` and locate it
pub fn take_qualified(
    props: &mut PropertyMap,
    key: &str,
    registry: &Registry,
) -> Result<Option<TypeHandle>> {
    take_optional_string(props, key)?
        .map(|fqn| registry.locate(&fqn))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Document;

    #[test]
    fn test_pair_round_trip() {
        let mut registry = Registry::new();
        let f = registry
            .register_function("etl.readers", "read_sales", |_| Value::Null)
            .unwrap();

        let mut props = PropertyMap::new();
        put_pair(&mut props, READ_FCT, Some(f.path()));
        assert_eq!(props.get(READ_FCT_NAME_KEY), Some(&json!("read_sales")));
        assert_eq!(props.get(READ_FCT_MODULE_KEY), Some(&json!("etl.readers")));

        let back = take_function(&mut props, READ_FCT, &registry).unwrap();
        assert_eq!(back, Some(f));
        assert!(props.is_empty());
    }

    #[test]
    fn test_absent_pair_writes_nulls_and_reads_none() {
        let registry = Registry::new();
        let mut props = PropertyMap::new();
        put_pair(&mut props, WRITE_FCT, None);

        assert_eq!(props.get(WRITE_FCT_NAME_KEY), Some(&Value::Null));
        assert_eq!(take_function(&mut props, WRITE_FCT, &registry).unwrap(), None);
    }

    #[test]
    fn test_missing_keys_read_as_none() {
        let registry = Registry::new();
        let mut props = PropertyMap::new();
        assert_eq!(take_type(&mut props, ENCODER, &registry).unwrap(), None);
    }

    #[test]
    fn test_partial_pair_is_format_error() {
        let registry = Registry::new();
        let mut props = PropertyMap::new();
        props.set(DECODER_MODULE_KEY, json!("codecs"));
        props.set(DECODER_NAME_KEY, Value::Null);

        let err = take_type(&mut props, DECODER, &registry).unwrap_err();
        assert!(matches!(err, StrataError::Format { .. }));
    }

    #[test]
    fn test_unregistered_pair_is_resolution_error() {
        let registry = Registry::new();
        let mut props = PropertyMap::new();
        props.set(ENCODER_NAME_KEY, json!("Gone"));
        props.set(ENCODER_MODULE_KEY, json!("codecs"));

        let err = take_type(&mut props, ENCODER, &registry).unwrap_err();
        assert_eq!(
            err,
            StrataError::Resolution {
                reference: "codecs.Gone".to_string()
            }
        );
    }

    #[test]
    fn test_qualified_round_trip() {
        let mut registry = Registry::new();
        let doc = registry.register_type::<Document>("app.documents", "Order").unwrap();

        let mut props = PropertyMap::new();
        put_qualified(&mut props, CUSTOM_DOCUMENT_KEY, Some(&doc));
        assert_eq!(props.get(CUSTOM_DOCUMENT_KEY), Some(&json!("app.documents.Order")));

        let back = take_qualified(&mut props, CUSTOM_DOCUMENT_KEY, &registry).unwrap();
        assert_eq!(back, Some(doc));
    }
}
