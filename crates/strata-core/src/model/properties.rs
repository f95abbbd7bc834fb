use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed property bag
///
/// Holds the variant-independent, forward-compatible part of a data node's
/// properties as JSON values. Ordered so that serialized output is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PropertyMap {
    data: BTreeMap<String, Value>,
}

impl PropertyMap {
    /// Create a new empty PropertyMap
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a value by key, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// Remove a value by key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get all keys in order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for PropertyMap {
    fn from(data: BTreeMap<String, Value>) -> Self {
        Self { data }
    }
}

impl From<PropertyMap> for BTreeMap<String, Value> {
    fn from(map: PropertyMap) -> Self {
        map.data
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_returns_previous() {
        let mut map = PropertyMap::new();
        assert_eq!(map.set("path", json!("/a")), None);
        assert_eq!(map.set("path", json!("/b")), Some(json!("/a")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_object_in_key_order() {
        let map: PropertyMap = [("zeta", json!(1)), ("alpha", json!(2))].into_iter().collect();
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"alpha":2,"zeta":1}"#);

        let back: PropertyMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }
}
