//! String dictionary built from list text.
//!
//! Three list shapes are understood:
//! `pairs` (`{k v k v}`), `keys` (every element a key, values empty), and
//! `values` (every element a value, keys minted from a process-wide counter).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{DuplicateKey, Error};
use crate::list::{format, parse, PairList};
use crate::pattern::Pattern;

/// Shared by every dictionary in the process; never reset, so synthetic
/// keys stay unique for the whole run.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Mint the next synthetic key.
pub fn next_unique_key() -> String {
    (NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1).to_string()
}

/// How list text maps onto dictionary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    Pairs,
    Keys,
    Values,
}

/// String → string map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringDictionary {
    map: HashMap<String, String>,
}

impl StringDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from list text.
    ///
    /// With `add_only`, a repeated key fails with [`DuplicateKey`] instead
    /// of overwriting.  `Values` never collides.
    pub fn from_list(text: &str, shape: ListShape, add_only: bool) -> Result<Self, Error> {
        let elements = parse::split(text)?;
        let mut dict = Self::new();
        match shape {
            ListShape::Pairs => {
                let pairs = PairList::from_elements(elements)?;
                for (k, v) in pairs.iter() {
                    dict.put(k, v, add_only)?;
                }
            }
            ListShape::Keys => {
                for k in elements {
                    dict.put(&k, "", add_only)?;
                }
            }
            ListShape::Values => {
                for v in elements {
                    dict.map.insert(next_unique_key(), v);
                }
            }
        }
        Ok(dict)
    }

    fn put(&mut self, key: &str, value: &str, add_only: bool) -> Result<(), DuplicateKey> {
        if add_only {
            self.add(key, value)
        } else {
            self.insert(key, value);
            Ok(())
        }
    }

    /// Set (or overwrite) a key.  Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    /// Add a key that must not already exist.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), DuplicateKey> {
        let key = key.into();
        if self.map.contains_key(&key) {
            return Err(DuplicateKey { key });
        }
        self.map.insert(key, value.into());
        Ok(())
    }

    /// Add `value` under a freshly minted key; returns the key.
    pub fn add_value(&mut self, value: impl Into<String>) -> String {
        let key = next_unique_key();
        self.map.insert(key.clone(), value.into());
        key
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keys in sorted order, optionally filtered.
    pub fn keys(&self, filter: Option<&Pattern>) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .map
            .keys()
            .map(String::as_str)
            .filter(|k| filter.map_or(true, |p| p.matches(k)))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Pair-list text in sorted key order; `filter` applies to keys.
    pub fn to_list_string(&self, filter: Option<&Pattern>) -> String {
        let keys = self.keys(filter);
        format::join(
            keys.iter().flat_map(|k| [*k, self.map[*k].as_str()]),
            " ",
            None,
        )
    }
}
