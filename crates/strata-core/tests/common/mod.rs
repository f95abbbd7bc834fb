use std::sync::Arc;

use serde_json::{json, Value};
use strata_core::model::{
    DataNode, DataNodeKind, GenericProperties, JsonProperties, MongoCollectionProperties,
    SqlProperties,
};
use strata_core::{DataNodeConverter, Registry};

pub struct SalesEncoder;
pub struct SalesDecoder;
pub struct SalesDocument;
pub struct SalesFrame;

/// Registry with one symbol per reference slot used by the fixtures
#[allow(dead_code)]
pub fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_function("etl.readers", "read_sales", |_| json!([{"amount": 1}]))
        .unwrap();
    registry
        .register_function("etl.writers", "write_sales", |args| {
            Value::from(args.len() as u64)
        })
        .unwrap();
    registry
        .register_function("etl.sql", "insert_sales", |_| {
            json!("INSERT INTO sales VALUES (?)")
        })
        .unwrap();
    registry
        .register_type::<SalesEncoder>("codecs.sales", "SalesEncoder")
        .unwrap();
    registry
        .register_type::<SalesDecoder>("codecs.sales", "SalesDecoder")
        .unwrap();
    registry
        .register_type::<SalesDocument>("documents", "SalesDocument")
        .unwrap();
    registry
        .register_type::<SalesFrame>("analytics.frames", "SalesFrame")
        .unwrap();
    registry
}

#[allow(dead_code)]
pub fn test_converter() -> DataNodeConverter {
    DataNodeConverter::new(Arc::new(test_registry()))
}

/// One node per storage type, with every reference slot filled
#[allow(dead_code)]
pub fn node_per_variant(registry: &Registry) -> Vec<DataNode> {
    let kinds = vec![
        DataNodeKind::Generic(GenericProperties {
            read_fct: Some(registry.resolve_function("etl.readers", "read_sales").unwrap()),
            write_fct: Some(registry.resolve_function("etl.writers", "write_sales").unwrap()),
        }),
        DataNodeKind::Json(JsonProperties {
            encoder: Some(registry.resolve_type("codecs.sales", "SalesEncoder").unwrap()),
            decoder: Some(registry.resolve_type("codecs.sales", "SalesDecoder").unwrap()),
        }),
        DataNodeKind::Sql(SqlProperties {
            write_query_builder: Some(
                registry.resolve_function("etl.sql", "insert_sales").unwrap(),
            ),
        }),
        DataNodeKind::MongoCollection(MongoCollectionProperties {
            custom_document: Some(registry.locate("documents.SalesDocument").unwrap()),
        }),
        DataNodeKind::SqlTable,
        DataNodeKind::Csv,
        DataNodeKind::Excel,
        DataNodeKind::Parquet,
        DataNodeKind::Pickle,
        DataNodeKind::InMemory,
    ];

    kinds
        .into_iter()
        .map(|kind| {
            let config_id = format!("cfg_{}", kind.storage_type());
            DataNode::new(DataNode::generate_id(&config_id), config_id, kind)
        })
        .collect()
}
