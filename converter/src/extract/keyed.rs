//! Insertion-ordered map with last-write-wins values.

use indexmap::map::{IntoValues, Iter};
use indexmap::IndexMap;

/// Map from a domain id (service id, channel id, lineup id) to a value.
///
/// Iteration follows the order in which keys were first inserted.
/// Inserting an existing key replaces its value and keeps its position,
/// so the last CSV row for an id wins while the channel order stays the
/// order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> KeyedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn into_values(self) -> IntoValues<String, V> {
        self.entries.into_values()
    }

    /// Value under `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<String>,
        make: impl FnOnce() -> V,
    ) -> &mut V {
        self.entries.entry(key.into()).or_insert_with(make)
    }

    /// Value under `key`, inserting `V::default()` first if absent.
    pub fn entry_or_default(&mut self, key: impl Into<String>) -> &mut V
    where
        V: Default,
    {
        self.entries.entry(key.into()).or_default()
    }
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> IntoIterator for &'a KeyedMap<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for KeyedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
