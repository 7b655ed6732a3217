//! HTTP header collection shared by requests, responses and the
//! [`Environment`](crate::Environment).
//!
//! Headers are stored in an ordered map to preserve insertion order among
//! distinct names. Lookup is case-insensitive while the casing of the first
//! insertion is kept for serialization. A name maps to one or more values;
//! each value is serialized on its own line.
//!
//! This abstraction does not enforce any HTTP semantics. Response headers
//! are validated when the environment is harvested, see
//! [`Environment::into_response`](crate::Environment::into_response).

use indexmap::IndexMap;
use unicase::UniCase;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<UniCase<String>, Vec<String>>,
}

fn key(name: &str) -> UniCase<String> {
    UniCase::new(name.to_owned())
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, keeping any values already present under `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .entry(UniCase::new(name.into()))
            .or_default()
            .push(value.into());
    }

    /// Replaces all values under `name`. An existing name keeps its position
    /// and original casing.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(UniCase::new(name.into()), vec![value.into()]);
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.headers
            .get(&key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.headers.shift_remove(&key(name))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Serializes every header line, `name: value\r\n`, in collection order.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, values) in self.iter() {
            for value in values {
                result.push_str(name);
                result.push_str(": ");
                result.push_str(value);
                result.push_str("\r\n");
            }
        }
        result
    }
}

impl<N, V> FromIterator<(N, V)> for HttpHeaders
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}
