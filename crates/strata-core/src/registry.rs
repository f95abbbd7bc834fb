//! Reference registry
//!
//! Closed-world lookup from a `(namespace, name)` pair to a registered
//! function or type, and back. Data nodes hold handles produced here; the
//! converter persists a handle as its path and resolves the path again on
//! load. Nothing is loaded or executed by lookup itself.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{Result, StrataError};

/// Signature shared by every registered function (read/write functions,
/// query builders)
pub type NodeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Symbolic location of a registered symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolPath {
    namespace: String,
    name: String,
}

impl SymbolPath {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name, `namespace.name`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Handle to a registered function
///
/// Two handles are equal only when they point at the same registration.
#[derive(Clone)]
pub struct FunctionHandle {
    path: SymbolPath,
    func: Arc<NodeFn>,
}

impl FunctionHandle {
    pub fn path(&self) -> &SymbolPath {
        &self.path
    }

    /// Invoke the registered function
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl PartialEq for FunctionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionHandle({})", self.path)
    }
}

/// Handle to a registered type descriptor
#[derive(Debug, Clone)]
pub struct TypeHandle {
    path: SymbolPath,
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeHandle {
    pub fn path(&self) -> &SymbolPath {
        &self.path
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name recorded at registration (diagnostic only)
    pub fn rust_type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this handle describes `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.type_id == other.type_id
    }
}

impl Eq for TypeHandle {}

/// Any registered symbol
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Function(FunctionHandle),
    Type(TypeHandle),
}

impl Symbol {
    pub fn path(&self) -> &SymbolPath {
        match self {
            Symbol::Function(f) => f.path(),
            Symbol::Type(t) => t.path(),
        }
    }
}

/// Registry of functions and types addressable by path
///
/// Built once at startup and then shared read-only (typically behind an
/// `Arc`), so lookups are deterministic for a given process.
#[derive(Debug, Default)]
pub struct Registry {
    symbols: BTreeMap<SymbolPath, Symbol>,
    by_qualified: HashMap<String, SymbolPath>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `namespace.name`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSymbol` if the path (or its qualified form) is taken.
    pub fn register_function<F>(
        &mut self,
        namespace: &str,
        name: &str,
        func: F,
    ) -> Result<FunctionHandle>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let handle = FunctionHandle {
            path: SymbolPath::new(namespace, name),
            func: Arc::new(func),
        };
        self.insert(Symbol::Function(handle.clone()))?;
        Ok(handle)
    }

    /// Register the Rust type `T` under `namespace.name`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSymbol` if the path (or its qualified form) is taken.
    pub fn register_type<T: 'static>(&mut self, namespace: &str, name: &str) -> Result<TypeHandle> {
        let handle = TypeHandle {
            path: SymbolPath::new(namespace, name),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        };
        self.insert(Symbol::Type(handle.clone()))?;
        Ok(handle)
    }

    fn insert(&mut self, symbol: Symbol) -> Result<()> {
        let path = symbol.path().clone();
        let qualified = path.qualified();
        if self.symbols.contains_key(&path) || self.by_qualified.contains_key(&qualified) {
            return Err(StrataError::DuplicateSymbol {
                reference: qualified,
            });
        }
        self.by_qualified.insert(qualified, path.clone());
        self.symbols.insert(path, symbol);
        Ok(())
    }

    /// Resolve a path to whatever was registered there
    ///
    /// # Errors
    ///
    /// Returns `Resolution` if nothing is registered under the path.
    pub fn resolve(&self, namespace: &str, name: &str) -> Result<Symbol> {
        let path = SymbolPath::new(namespace, name);
        self.symbols
            .get(&path)
            .cloned()
            .ok_or_else(|| StrataError::Resolution {
                reference: path.qualified(),
            })
    }

    /// Resolve a path that must denote a function
    ///
    /// # Errors
    ///
    /// Returns `Resolution` if the path is unknown or denotes a type.
    pub fn resolve_function(&self, namespace: &str, name: &str) -> Result<FunctionHandle> {
        match self.resolve(namespace, name)? {
            Symbol::Function(f) => Ok(f),
            Symbol::Type(t) => Err(StrataError::Resolution {
                reference: format!("{} (registered as a type, expected a function)", t.path()),
            }),
        }
    }

    /// Resolve a path that must denote a type
    ///
    /// # Errors
    ///
    /// Returns `Resolution` if the path is unknown or denotes a function.
    pub fn resolve_type(&self, namespace: &str, name: &str) -> Result<TypeHandle> {
        match self.resolve(namespace, name)? {
            Symbol::Type(t) => Ok(t),
            Symbol::Function(f) => Err(StrataError::Resolution {
                reference: format!("{} (registered as a function, expected a type)", f.path()),
            }),
        }
    }

    /// Locate a type by its fully-qualified name
    ///
    /// # Errors
    ///
    /// Returns `Resolution` if no type has that qualified name.
    pub fn locate(&self, qualified_name: &str) -> Result<TypeHandle> {
        let unresolved = || StrataError::Resolution {
            reference: qualified_name.to_string(),
        };
        let path = self.by_qualified.get(qualified_name).ok_or_else(unresolved)?;
        match self.symbols.get(path) {
            Some(Symbol::Type(t)) => Ok(t.clone()),
            _ => Err(unresolved()),
        }
    }

    /// Path under which a symbol is known
    pub fn describe(&self, symbol: &Symbol) -> SymbolPath {
        symbol.path().clone()
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.symbols
            .contains_key(&SymbolPath::new(namespace, name))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Encoder;
    struct Decoder;

    #[test]
    fn test_register_and_resolve_function() {
        let mut registry = Registry::new();
        let handle = registry
            .register_function("app.io", "read_rows", |_| json!([1, 2, 3]))
            .unwrap();

        let resolved = registry.resolve_function("app.io", "read_rows").unwrap();
        assert_eq!(resolved, handle);
        assert_eq!(resolved.call(&[]), json!([1, 2, 3]));
    }

    #[test]
    fn test_register_and_locate_type() {
        let mut registry = Registry::new();
        let handle = registry.register_type::<Encoder>("app.codec", "Encoder").unwrap();

        let located = registry.locate("app.codec.Encoder").unwrap();
        assert_eq!(located, handle);
        assert!(located.is::<Encoder>());
        assert!(!located.is::<Decoder>());
    }

    #[test]
    fn test_describe_round_trips_through_resolve() {
        let mut registry = Registry::new();
        registry.register_type::<Decoder>("app.codec", "Decoder").unwrap();

        let symbol = registry.resolve("app.codec", "Decoder").unwrap();
        let path = registry.describe(&symbol);
        assert_eq!(path.namespace(), "app.codec");
        assert_eq!(path.name(), "Decoder");
        assert_eq!(registry.resolve(path.namespace(), path.name()).unwrap(), symbol);
    }

    #[test]
    fn test_unknown_reference_is_resolution_error() {
        let registry = Registry::new();
        let err = registry.resolve("nowhere", "nothing").unwrap_err();
        assert_eq!(
            err,
            StrataError::Resolution {
                reference: "nowhere.nothing".to_string()
            }
        );
        assert!(registry.locate("nowhere.nothing").is_err());
    }

    #[test]
    fn test_kind_mismatch_is_resolution_error() {
        let mut registry = Registry::new();
        registry.register_type::<Encoder>("app", "Encoder").unwrap();
        registry.register_function("app", "build", |_| Value::Null).unwrap();

        assert!(matches!(
            registry.resolve_function("app", "Encoder"),
            Err(StrataError::Resolution { .. })
        ));
        assert!(matches!(
            registry.resolve_type("app", "build"),
            Err(StrataError::Resolution { .. })
        ));
        assert!(registry.locate("app.build").is_err());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register_type::<Encoder>("a.b", "C").unwrap();

        // Same qualified name via a different split
        let err = registry.register_type::<Decoder>("a", "b.C").unwrap_err();
        assert!(matches!(err, StrataError::DuplicateSymbol { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_registrations_are_not_equal() {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let a = first.register_function("m", "f", |_| Value::Null).unwrap();
        let b = second.register_function("m", "f", |_| Value::Null).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
