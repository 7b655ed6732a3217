use std::any::Any;
use std::fmt;

use indexmap::IndexMap;

type Value = Box<dyn Any + Send + Sync>;

/// Open key/value store for anything the typed fields do not cover.
///
/// Keys are free-form strings, values are typed: a lookup with the wrong
/// type returns `None`.
#[derive(Default)]
pub struct Extensions {
    map: IndexMap<String, Value>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T) -> Option<Value>
    where
        T: Any + Send + Sync,
    {
        self.map.insert(key.into(), Box::new(value))
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.map.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.map.get_mut(key).and_then(|value| value.downcast_mut::<T>())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}
