//! Ordered parameter containers for query strings and request bodies.
//!
//! # Design
//! `Params<V>` keeps entries in insertion order and stores each value as an
//! `Option<V>`, where `None` marks a key that was supplied without a value
//! ("undefined"). Undefined entries survive until the encoding step so the
//! skip rule is applied in exactly one place. Re-inserting an existing key
//! replaces its value in place.
//!
//! Query strings only accept scalars, arrays of scalars, and null
//! (`QueryValue`). Bodies accept any JSON value.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single scalar usable in a query string.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_positive() { "Infinity" } else { "-Infinity" })
            }
            // -0 prints as 0
            Scalar::Float(n) if *n == 0.0 => f.write_str("0"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Value of a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

impl fmt::Display for QueryValue {
    /// Renders the value the way string interpolation does on the wire:
    /// arrays become comma-joined elements.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => f.write_str("null"),
            QueryValue::Scalar(s) => write!(f, "{s}"),
            QueryValue::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<Scalar> for QueryValue {
    fn from(value: Scalar) -> Self {
        QueryValue::Scalar(value)
    }
}

macro_rules! query_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for QueryValue {
                fn from(items: Vec<$ty>) -> Self {
                    QueryValue::Array(items.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

query_value_from!(&str, String, i64, i32, u32, f64, bool);

/// Ordered key-value container with optional ("undefined") values.
#[derive(Debug, Clone, PartialEq)]
pub struct Params<V> {
    entries: Vec<(String, Option<V>)>,
}

/// Query-string parameters.
pub type QueryParams = Params<QueryValue>;

/// JSON body parameters.
pub type BodyParams = Params<serde_json::Value>;

impl<V> Default for Params<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> Params<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a defined value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<V>) -> &mut Self {
        self.set(key.into(), Some(value.into()))
    }

    /// Insert or replace a value that may be undefined.
    pub fn insert_opt<T: Into<V>>(&mut self, key: impl Into<String>, value: Option<T>) -> &mut Self {
        self.set(key.into(), value.map(Into::into))
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<V>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style `insert_opt`.
    pub fn with_opt<T: Into<V>>(mut self, key: impl Into<String>, value: Option<T>) -> Self {
        self.insert_opt(key, value);
        self
    }

    fn set(&mut self, key: String, value: Option<V>) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Number of entries, including undefined ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with a defined value, in insertion order.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// All entries, undefined ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&V>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

impl<K: Into<String>, V> FromIterator<(K, Option<V>)> for Params<V> {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k.into(), v);
        }
        params
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for BodyParams {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }
}

/// Serializes as a JSON object of the defined entries only.
impl<V: Serialize> Serialize for Params<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let defined: Vec<_> = self.defined().collect();
        let mut map = serializer.serialize_map(Some(defined.len()))?;
        for (k, v) in defined {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
