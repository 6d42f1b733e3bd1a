//! Case-insensitive key policy.
//!
//! Every string-keyed lookup (aim references, contract references, rule
//! names, postcodes) normalizes keys through [`normalize_key`]. Callers never
//! upper-case keys themselves.

use std::collections::HashMap;

/// Normalize a lookup key: trim surrounding whitespace, ASCII upper-case.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

/// Normalize a postcode: drop all whitespace, ASCII upper-case.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Map keyed by normalized string.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    map: HashMap<String, V>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; the first value stored under a key wins.
    pub fn insert_first(&mut self, key: &str, value: V) {
        self.map.entry(normalize_key(key)).or_insert(value);
    }

    /// Mutable access to the value for `key`, inserting a default first.
    pub fn entry_or_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        self.map.entry(normalize_key(key)).or_default()
    }

    /// Insert or replace the value for `key`.
    pub fn insert(&mut self, key: &str, value: V) {
        self.map.insert(normalize_key(key), value);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(&normalize_key(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.map.get_mut(&normalize_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.map.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.map.iter().map(|(key, value)| (key.as_str(), value))
    }
}
