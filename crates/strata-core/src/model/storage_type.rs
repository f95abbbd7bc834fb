use std::fmt;

/// Discriminator selecting a data node variant
///
/// The tag strings are part of the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageType {
    Generic,
    Json,
    Sql,
    SqlTable,
    MongoCollection,
    Csv,
    Excel,
    Parquet,
    Pickle,
    InMemory,
}

impl StorageType {
    /// Every known variant
    pub const ALL: [StorageType; 10] = [
        StorageType::Generic,
        StorageType::Json,
        StorageType::Sql,
        StorageType::SqlTable,
        StorageType::MongoCollection,
        StorageType::Csv,
        StorageType::Excel,
        StorageType::Parquet,
        StorageType::Pickle,
        StorageType::InMemory,
    ];

    /// Persisted tag
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Generic => "generic",
            StorageType::Json => "json",
            StorageType::Sql => "sql",
            StorageType::SqlTable => "sql_table",
            StorageType::MongoCollection => "mongo_collection",
            StorageType::Csv => "csv",
            StorageType::Excel => "excel",
            StorageType::Parquet => "parquet",
            StorageType::Pickle => "pickle",
            StorageType::InMemory => "in_memory",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == tag)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
