pub mod data_node;
pub mod edit;
pub mod exposed_type;
pub mod properties;
pub mod record;
pub mod scope;
pub mod storage_type;

pub use data_node::{
    DataNode, DataNodeKind, GenericProperties, JsonProperties, MongoCollectionProperties,
    SqlProperties, DEFAULT_VERSION,
};
pub use edit::Edit;
pub use exposed_type::{ExposedEntry, ExposedToken, ExposedType};
pub use properties::PropertyMap;
pub use record::{DataNodeModel, ModelEdit};
pub use scope::Scope;
pub use storage_type::StorageType;
