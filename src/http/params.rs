use serde::Serialize;
use serde_json::{Map, Value};

/// Query parameters or JSON body fields for a request.
///
/// Entries whose value is absent (`None` or JSON `null`) are dropped on
/// insertion, so they never reach the query string or the serialized body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, skipping it when the value is absent.
    ///
    /// `Option<T>` converts to `null` when `None`, so optional arguments can be
    /// passed straight through.
    pub fn insert(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Renders the fields as query pairs. Strings are sent unquoted; other
    /// values use their JSON text.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .fold(Params::new(), |params, (key, value)| params.insert(&key, value))
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Params::new(), |params, (key, value)| {
                params.insert(key.as_ref(), value)
            })
    }
}
