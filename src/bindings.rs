//! Typed results of a successful parse.

use indexmap::IndexMap;
use serde::Serialize;

/// The value bound to a declared name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Positional or keyword value, verbatim
    Text(String),
    /// Flag state
    Bool(bool),
    /// Keyword option never supplied and not pre-seeded
    Unset,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}

/// Name to value mapping, positionals first then options, each in
/// declaration order. Keys are normalized names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    values: IndexMap<String, Value>,
}

impl Bindings {
    pub(crate) fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    /// Look up a binding. Hyphenated names are accepted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name.replace('-', "_").as_str())
    }

    /// Text of a positional or keyword binding.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// State of a flag; `false` for anything that isn't a set flag.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
