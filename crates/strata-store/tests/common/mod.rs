use std::sync::Arc;

use serde_json::json;
use strata_core::model::{DataNode, DataNodeKind, DataNodeModel, GenericProperties};
use strata_core::{DataNodeConverter, Registry};
use strata_store::{Backend, FsBackend, Repository, SqliteBackend};
use tempfile::TempDir;

pub type NodeRepository = Repository<DataNodeConverter, Box<dyn Backend<DataNodeModel>>>;

/// Repository plus the temp directory it writes into
pub struct Fixture {
    pub repo: NodeRepository,
    pub dir: TempDir,
}

#[allow(dead_code)]
pub fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_function("etl.readers", "read_rows", |_| json!([]))
        .unwrap();
    registry
}

#[allow(dead_code)]
pub fn converter() -> DataNodeConverter {
    DataNodeConverter::new(Arc::new(test_registry()))
}

#[allow(dead_code)]
pub fn fs_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let backend: Box<dyn Backend<DataNodeModel>> = Box::new(FsBackend::new(dir.path()));
    Fixture {
        repo: Repository::new(converter(), backend),
        dir,
    }
}

#[allow(dead_code)]
pub fn sqlite_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let backend: Box<dyn Backend<DataNodeModel>> =
        Box::new(SqliteBackend::open_in_memory().unwrap());
    Fixture {
        repo: Repository::new(converter(), backend),
        dir,
    }
}

/// Run `scenario` once per backend
#[allow(dead_code)]
pub fn for_each_backend(scenario: impl Fn(&Fixture)) {
    for fixture in [fs_fixture(), sqlite_fixture()] {
        scenario(&fixture);
    }
}

/// Csv node `data_node-<i>` named `name-<i>`
#[allow(dead_code)]
pub fn csv_node(i: usize) -> DataNode {
    let mut node = DataNode::new(format!("data_node-{}", i), "sales", DataNodeKind::Csv);
    node.name = Some(format!("name-{}", i));
    node
}

#[allow(dead_code)]
pub fn generic_node(id: &str, registry: &Registry) -> DataNode {
    DataNode::new(
        id,
        "ingest",
        DataNodeKind::Generic(GenericProperties {
            read_fct: Some(registry.resolve_function("etl.readers", "read_rows").unwrap()),
            write_fct: None,
        }),
    )
}
