//! Multi-value key/value store shared by every source and the resolver
//!
//! Each key maps to an ordered list of string values. Writes replace a key's
//! list wholesale, and merges are last-writer-wins per key.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Key/value store where every key holds an ordered list of values.
///
/// Key iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Data {
    values: HashMap<String, Vec<String>>,
}

/// Selects which keys survive [`Data::filter`].
#[derive(Debug, Clone)]
pub enum Criterion<'a> {
    /// Keep only this key.
    Key(&'a str),
    /// Keep the keys contained in this set.
    KeySet(HashSet<String>),
    /// Keep the keys that also exist in another store.
    KeysOf(&'a Data),
}

impl Criterion<'_> {
    fn keeps(&self, key: &str) -> bool {
        match self {
            Criterion::Key(k) => *k == key,
            Criterion::KeySet(keys) => keys.contains(key),
            Criterion::KeysOf(other) => other.exists(key),
        }
    }
}

impl<'a> From<&'a str> for Criterion<'a> {
    fn from(key: &'a str) -> Self {
        Criterion::Key(key)
    }
}

impl<'a> From<&'a Data> for Criterion<'a> {
    fn from(other: &'a Data) -> Self {
        Criterion::KeysOf(other)
    }
}

impl From<HashSet<String>> for Criterion<'_> {
    fn from(keys: HashSet<String>) -> Self {
        Criterion::KeySet(keys)
    }
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys. Don't rely on their order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All values for `key`, or an empty slice when the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The value for `key` if it holds exactly one, otherwise `""`.
    pub fn get(&self, key: &str) -> &str {
        match self.get_all(key) {
            [single] => single.as_str(),
            _ => "",
        }
    }

    pub fn is_true(&self, key: &str) -> bool {
        self.get(key) == "true"
    }

    pub fn is_false(&self, key: &str) -> bool {
        self.get(key) == "false"
    }

    /// Replace the values of `key`.
    pub fn set<K, I, V>(&mut self, key: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.values.insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    pub fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Like [`Data::get`], but removes the key afterwards.
    pub fn pick(&mut self, key: &str) -> String {
        let value = self.get(key).to_string();
        self.delete(key);
        value
    }

    /// Like [`Data::get_all`], but removes the key afterwards.
    pub fn pick_all(&mut self, key: &str) -> Vec<String> {
        self.values.remove(key).unwrap_or_default()
    }

    /// Overwrite keys in `self` with every key of `other`.
    ///
    /// Keys missing from `other` are left untouched.
    pub fn merge(&mut self, other: &Data) {
        for (key, values) in &other.values {
            self.values.insert(key.clone(), values.clone());
        }
    }

    /// Merge several stores in order; later stores win.
    pub fn merge_all<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a Data>,
    {
        for other in others {
            self.merge(other);
        }
    }

    /// Delete every key the criterion does not keep.
    pub fn filter<'a>(&mut self, criterion: impl Into<Criterion<'a>>) {
        let criterion = criterion.into();
        self.values.retain(|key, _| criterion.keeps(key));
    }
}

impl<K, V> FromIterator<(K, V)> for Data
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut data = Data::new();
        for (key, values) in iter {
            data.set(key, values);
        }
        data
    }
}

impl From<HashMap<String, Vec<String>>> for Data {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

/// Merge stores into a new one. Later values overwrite previous ones.
pub fn merge<'a, I>(stores: I) -> Data
where
    I: IntoIterator<Item = &'a Data>,
{
    let mut merged = Data::new();
    merged.merge_all(stores);
    merged
}

/// Copy `data` and keep only the keys the criterion selects.
pub fn filter<'a>(data: &Data, criterion: impl Into<Criterion<'a>>) -> Data {
    let mut filtered = data.clone();
    filtered.filter(criterion);
    filtered
}
