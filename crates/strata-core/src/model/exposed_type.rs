use std::collections::BTreeMap;

use crate::registry::TypeHandle;

/// Short exposed-type tokens persisted verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposedToken {
    Numpy,
    Pandas,
    Modin,
}

impl ExposedToken {
    pub const ALL: [ExposedToken; 3] = [ExposedToken::Numpy, ExposedToken::Pandas, ExposedToken::Modin];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExposedToken::Numpy => "numpy",
            ExposedToken::Pandas => "pandas",
            ExposedToken::Modin => "modin",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }
}

/// One element of a mapping or sequence exposed type
#[derive(Debug, Clone, PartialEq)]
pub enum ExposedEntry {
    Token(ExposedToken),
    Type(TypeHandle),
}

/// Shape in which a data node exposes its data to readers
#[derive(Debug, Clone, PartialEq)]
pub enum ExposedType {
    Token(ExposedToken),
    Type(TypeHandle),
    Map(BTreeMap<String, ExposedEntry>),
    List(Vec<ExposedEntry>),
}

impl From<ExposedEntry> for ExposedType {
    fn from(entry: ExposedEntry) -> Self {
        match entry {
            ExposedEntry::Token(t) => ExposedType::Token(t),
            ExposedEntry::Type(t) => ExposedType::Type(t),
        }
    }
}
