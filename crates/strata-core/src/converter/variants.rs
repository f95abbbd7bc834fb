//! Per-variant encoding of typed properties
//!
//! Decoding goes through a table keyed by the persisted `storage_type` tag
//! so that an unknown tag is detected before anything else is read.
//! Encoding is an exhaustive match: adding a variant without an encoder
//! does not compile.

use std::collections::BTreeMap;
use std::fmt;

use super::references::{
    put_pair, put_qualified, take_function, take_qualified, take_type, CUSTOM_DOCUMENT_KEY,
    DECODER, ENCODER, READ_FCT, WRITE_FCT, WRITE_QUERY_BUILDER,
};
use crate::errors::Result;
use crate::model::{
    DataNodeKind, GenericProperties, JsonProperties, MongoCollectionProperties, PropertyMap,
    SqlProperties, StorageType,
};
use crate::registry::Registry;

/// Rebuilds a variant, consuming the property keys it owns
pub type DecodeFn = fn(&mut PropertyMap, &Registry) -> Result<DataNodeKind>;

/// Table of variant constructors keyed by storage type tag
#[derive(Clone)]
pub struct VariantConstructors {
    decoders: BTreeMap<&'static str, DecodeFn>,
}

impl fmt::Debug for VariantConstructors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

impl VariantConstructors {
    /// Constructors for every built-in variant
    pub fn standard() -> Self {
        let mut table = Self {
            decoders: BTreeMap::new(),
        };
        table.register(StorageType::Generic, decode_generic);
        table.register(StorageType::Json, decode_json);
        table.register(StorageType::Sql, decode_sql);
        table.register(StorageType::MongoCollection, decode_mongo_collection);
        table.register(StorageType::SqlTable, |_, _| Ok(DataNodeKind::SqlTable));
        table.register(StorageType::Csv, |_, _| Ok(DataNodeKind::Csv));
        table.register(StorageType::Excel, |_, _| Ok(DataNodeKind::Excel));
        table.register(StorageType::Parquet, |_, _| Ok(DataNodeKind::Parquet));
        table.register(StorageType::Pickle, |_, _| Ok(DataNodeKind::Pickle));
        table.register(StorageType::InMemory, |_, _| Ok(DataNodeKind::InMemory));
        table
    }

    /// An empty table; every tag is unknown until registered
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// Install or replace the constructor for `storage_type`
    pub fn register(&mut self, storage_type: StorageType, decode: DecodeFn) {
        self.decoders.insert(storage_type.as_str(), decode);
    }

    pub fn get(&self, tag: &str) -> Option<DecodeFn> {
        self.decoders.get(tag).copied()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }
}

impl Default for VariantConstructors {
    fn default() -> Self {
        Self::standard()
    }
}

fn decode_generic(props: &mut PropertyMap, registry: &Registry) -> Result<DataNodeKind> {
    Ok(DataNodeKind::Generic(GenericProperties {
        read_fct: take_function(props, READ_FCT, registry)?,
        write_fct: take_function(props, WRITE_FCT, registry)?,
    }))
}

fn decode_json(props: &mut PropertyMap, registry: &Registry) -> Result<DataNodeKind> {
    Ok(DataNodeKind::Json(JsonProperties {
        encoder: take_type(props, ENCODER, registry)?,
        decoder: take_type(props, DECODER, registry)?,
    }))
}

fn decode_sql(props: &mut PropertyMap, registry: &Registry) -> Result<DataNodeKind> {
    Ok(DataNodeKind::Sql(SqlProperties {
        write_query_builder: take_function(props, WRITE_QUERY_BUILDER, registry)?,
    }))
}

fn decode_mongo_collection(props: &mut PropertyMap, registry: &Registry) -> Result<DataNodeKind> {
    Ok(DataNodeKind::MongoCollection(MongoCollectionProperties {
        custom_document: take_qualified(props, CUSTOM_DOCUMENT_KEY, registry)?,
    }))
}

/// Write the variant's typed properties into `props`
pub fn encode_kind(kind: &DataNodeKind, props: &mut PropertyMap) {
    match kind {
        DataNodeKind::Generic(p) => {
            put_pair(props, READ_FCT, p.read_fct.as_ref().map(|f| f.path()));
            put_pair(props, WRITE_FCT, p.write_fct.as_ref().map(|f| f.path()));
        }
        DataNodeKind::Json(p) => {
            put_pair(props, ENCODER, p.encoder.as_ref().map(|t| t.path()));
            put_pair(props, DECODER, p.decoder.as_ref().map(|t| t.path()));
        }
        DataNodeKind::Sql(p) => {
            put_pair(
                props,
                WRITE_QUERY_BUILDER,
                p.write_query_builder.as_ref().map(|f| f.path()),
            );
        }
        DataNodeKind::MongoCollection(p) => {
            put_qualified(props, CUSTOM_DOCUMENT_KEY, p.custom_document.as_ref());
        }
        DataNodeKind::SqlTable
        | DataNodeKind::Csv
        | DataNodeKind::Excel
        | DataNodeKind::Parquet
        | DataNodeKind::Pickle
        | DataNodeKind::InMemory => {}
    }
}
