//! Ordered path table.
//!
//! A map keyed by normalised path strings that also remembers insertion
//! order.  Order lives in a side index (`lookup key → order index`) kept
//! separate from the value map; the indices are always a permutation of
//! `0..len`.  Removing an entry shifts every later index down by one, so a
//! re-inserted key goes to the end.
//!
//! Corruption of the side index is a programming defect.  It is reported
//! through `log::error!` (target `tclish::path`) and the optional
//! [`DiagnosticHook`], and surfaces to the caller as an
//! [`InvariantViolation`] rather than an ordinary error.

pub mod translate;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, error};

use crate::error::{DuplicateKey, InvariantViolation, SerializationError};
use crate::list::{self, format};
use crate::pattern::Pattern;

pub use translate::PathTranslation;

/// Tag and version at the head of serialised tables.
const SERIAL_TAG: &str = "tclish-path-table";
const SERIAL_VERSION: &str = "1";

/// Something the table noticed about its own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDiagnostic {
    /// A copy found the source's order index out of step with its entries
    /// and re-derived order from the value map.
    OrderRebuilt { expected: usize, found: usize },
    /// The order index is corrupt.
    Invariant(InvariantViolation),
}

impl fmt::Display for PathDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathDiagnostic::OrderRebuilt { expected, found } => write!(
                f,
                "order index had {found} entries for {expected} keys; rebuilt from table order"
            ),
            PathDiagnostic::Invariant(v) => write!(f, "order index corrupt: {v}"),
        }
    }
}

/// Callback invoked for every [`PathDiagnostic`].
pub type DiagnosticHook = Arc<dyn Fn(&PathDiagnostic) + Send + Sync>;

#[derive(Debug, Clone)]
struct Entry<V> {
    /// Display spelling from the first insertion.
    key: String,
    value: V,
}

/// Path-keyed map that preserves insertion order.
#[derive(Clone)]
pub struct PathTable<V> {
    translation: PathTranslation,
    entries: HashMap<String, Entry<V>>,
    order: HashMap<String, usize>,
    next_index: usize,
    hook: Option<DiagnosticHook>,
}

impl<V: fmt::Debug> fmt::Debug for PathTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTable")
            .field("translation", &self.translation)
            .field("entries", &self.entries)
            .field("order", &self.order)
            .field("next_index", &self.next_index)
            .finish()
    }
}

impl<V> Default for PathTable<V> {
    fn default() -> Self {
        Self::new(PathTranslation::default())
    }
}

impl<V> PathTable<V> {
    pub fn new(translation: PathTranslation) -> Self {
        Self {
            translation,
            entries: HashMap::new(),
            order: HashMap::new(),
            next_index: 0,
            hook: None,
        }
    }

    pub fn translation(&self) -> PathTranslation {
        self.translation
    }

    pub fn set_diagnostic_hook(&mut self, hook: DiagnosticHook) {
        self.hook = Some(hook);
    }

    pub fn clear_diagnostic_hook(&mut self) {
        self.hook = None;
    }

    fn report(&self, diag: PathDiagnostic) {
        error!(target: "tclish::path", "{diag}");
        if let Some(hook) = &self.hook {
            hook(&diag);
        }
    }

    fn violation(&self, v: InvariantViolation) -> InvariantViolation {
        self.report(PathDiagnostic::Invariant(v.clone()));
        v
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert a new key.  Fails if the normalised key is already present.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), DuplicateKey> {
        let lookup = self.translation.lookup_key(key);
        if let Some(existing) = self.entries.get(&lookup) {
            return Err(DuplicateKey { key: existing.key.clone() });
        }
        self.append(lookup, self.translation.translate(key), value);
        Ok(())
    }

    /// Insert or overwrite.  An existing key keeps its order index and its
    /// original spelling.  Returns the previous value.
    pub fn upsert(&mut self, key: &str, value: V) -> Option<V> {
        let lookup = self.translation.lookup_key(key);
        if let Some(entry) = self.entries.get_mut(&lookup) {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.append(lookup, self.translation.translate(key), value);
        None
    }

    fn append(&mut self, lookup: String, display: String, value: V) {
        if self.order.contains_key(&lookup) {
            self.report(PathDiagnostic::Invariant(InvariantViolation::CountMismatch {
                entries: self.entries.len(),
                ordering: self.order.len(),
            }));
        } else {
            self.order.insert(lookup.clone(), self.next_index);
            self.next_index += 1;
        }
        self.entries.insert(lookup, Entry { key: display, value });
    }

    /// Remove a key, closing the gap it leaves in the order.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let lookup = self.translation.lookup_key(key);
        let entry = self.entries.remove(&lookup)?;
        match self.order.remove(&lookup) {
            Some(removed) => {
                for index in self.order.values_mut() {
                    if *index > removed {
                        *index -= 1;
                    }
                }
                self.next_index = self.next_index.saturating_sub(1);
            }
            None => {
                self.report(PathDiagnostic::Invariant(InvariantViolation::CountMismatch {
                    entries: self.entries.len() + 1,
                    ordering: self.order.len(),
                }));
            }
        }
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.next_index = 0;
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&V> {
        let lookup = self.translation.lookup_key(key);
        self.entries.get(&lookup).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let lookup = self.translation.lookup_key(key);
        self.entries.get_mut(&lookup).map(|e| &mut e.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&self.translation.lookup_key(key))
    }

    // ── Ordered views ─────────────────────────────────────────────────────

    /// Lookup keys by order index, after validating the side index.
    fn ordered_lookup_keys(&self) -> Result<Vec<&str>, InvariantViolation> {
        let count = self.entries.len();
        if self.order.len() != count {
            return Err(self.violation(InvariantViolation::CountMismatch {
                entries: count,
                ordering: self.order.len(),
            }));
        }
        let mut slots: Vec<Option<&str>> = vec![None; count];
        for (lookup, &index) in &self.order {
            let Some(slot) = slots.get_mut(index) else {
                return Err(self.violation(InvariantViolation::IndexOutOfRange {
                    key: lookup.clone(),
                    index,
                    count,
                }));
            };
            if let Some(first) = slot {
                return Err(self.violation(InvariantViolation::DuplicateIndex {
                    index,
                    first: (*first).to_owned(),
                    second: lookup.clone(),
                }));
            }
            *slot = Some(lookup.as_str());
        }
        // In range, distinct, and as many as the slots: every slot is full.
        Ok(slots.into_iter().flatten().collect())
    }

    fn entry_for(&self, lookup: &str) -> Result<&Entry<V>, InvariantViolation> {
        self.entries.get(lookup).ok_or_else(|| {
            self.violation(InvariantViolation::MissingValue { key: lookup.to_owned() })
        })
    }

    /// Verify the side index without building a view.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for lookup in self.ordered_lookup_keys()? {
            self.entry_for(lookup)?;
        }
        Ok(())
    }

    /// Keys (display spelling) in insertion order.
    pub fn keys_in_order(&self, reverse: bool) -> Result<Vec<&str>, InvariantViolation> {
        let mut keys = self
            .ordered_lookup_keys()?
            .into_iter()
            .map(|lookup| self.entry_for(lookup).map(|e| e.key.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        if reverse {
            keys.reverse();
        }
        Ok(keys)
    }

    /// `(key, value)` pairs in insertion order.
    pub fn pairs_in_order(&self, reverse: bool) -> Result<Vec<(&str, &V)>, InvariantViolation> {
        let mut pairs = self
            .ordered_lookup_keys()?
            .into_iter()
            .map(|lookup| self.entry_for(lookup).map(|e| (e.key.as_str(), &e.value)))
            .collect::<Result<Vec<_>, _>>()?;
        if reverse {
            pairs.reverse();
        }
        Ok(pairs)
    }

    fn lookup_at(&self, index: usize, reverse: bool) -> Option<&str> {
        let count = self.entries.len();
        if index >= count {
            return None;
        }
        let target = if reverse { count - 1 - index } else { index };
        self.order
            .iter()
            .find(|(_, i)| **i == target)
            .map(|(lookup, _)| lookup.as_str())
    }

    /// The key at order position `index` (counted from the end when
    /// `reverse`), found by a single scan of the side index.
    pub fn nth_key(&self, index: usize, reverse: bool) -> Option<&str> {
        let lookup = self.lookup_at(index, reverse)?;
        self.entries.get(lookup).map(|e| e.key.as_str())
    }

    pub fn nth_pair(&self, index: usize, reverse: bool) -> Option<(&str, &V)> {
        let lookup = self.lookup_at(index, reverse)?;
        self.entries.get(lookup).map(|e| (e.key.as_str(), &e.value))
    }

    /// Ordered keys as list text, optionally filtered by a glob pattern.
    pub fn to_list_string(
        &self,
        pattern: Option<&str>,
        nocase: bool,
        reverse: bool,
    ) -> Result<String, InvariantViolation> {
        let keys = self.keys_in_order(reverse)?;
        let filter = pattern.map(|p| Pattern::glob(p, nocase));
        Ok(format::join(keys, list::CANONICAL_SEPARATOR, filter.as_ref()))
    }

    /// `tclish-path-table 1 <translation> {<ordered keys>}`.
    pub fn serialize(&self) -> Result<String, InvariantViolation> {
        let keys = self.to_list_string(None, false, false)?;
        Ok(format::join(
            [SERIAL_TAG, SERIAL_VERSION, self.translation.name(), keys.as_str()],
            list::CANONICAL_SEPARATOR,
            None,
        ))
    }
}

impl<V: Default> PathTable<V> {
    /// Insert `key` with a default value.
    pub fn insert_default(&mut self, key: &str) -> Result<(), DuplicateKey> {
        self.insert(key, V::default())
    }

    /// Add every path with a default value.  With `merge`, paths already
    /// present are skipped; without it, the first duplicate fails.
    /// Returns the number of paths added.
    pub fn extend<I, S>(&mut self, paths: I, merge: bool) -> Result<usize, DuplicateKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.as_ref();
            if merge && self.contains(path) {
                continue;
            }
            self.insert_default(path)?;
            added += 1;
        }
        Ok(added)
    }

    /// Build a table from paths, silently skipping duplicates.
    pub fn from_paths<I, S>(paths: I, translation: PathTranslation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new(translation);
        for path in paths {
            if table.insert_default(path.as_ref()).is_err() {
                debug!(target: "tclish::path", "skipping duplicate path \"{}\"", path.as_ref());
            }
        }
        table
    }

    /// Rebuild a table from [`serialize`](Self::serialize) output.
    /// Values are defaulted.
    pub fn deserialize(text: &str) -> Result<Self, SerializationError> {
        let fail = |reason: String| SerializationError { reason };
        let parts = list::split(text).map_err(|e| fail(e.to_string()))?;
        let [tag, version, translation, keys] = parts.as_slice() else {
            return Err(fail(format!("expected 4 elements, got {}", parts.len())));
        };
        if tag != SERIAL_TAG {
            return Err(fail(format!("bad tag \"{tag}\"")));
        }
        if version != SERIAL_VERSION {
            return Err(fail(format!("unsupported version \"{version}\"")));
        }
        let translation: PathTranslation = translation.parse().map_err(fail)?;
        let keys = list::split(keys).map_err(|e| fail(e.to_string()))?;
        let mut table = Self::new(translation);
        for key in &keys {
            table.insert_default(key).map_err(|e| fail(e.to_string()))?;
        }
        Ok(table)
    }
}

impl<V: Clone> PathTable<V> {
    /// Copy `source`.
    ///
    /// When the source's side index agrees with its entry count it is copied
    /// directly; otherwise order is re-derived from the value map's own
    /// enumeration order and an [`PathDiagnostic::OrderRebuilt`] is reported
    /// (through the source's hook, which the copy inherits).
    pub fn merged_from(source: &PathTable<V>) -> Self {
        let mut table = Self {
            translation: source.translation,
            entries: source.entries.clone(),
            order: HashMap::new(),
            next_index: 0,
            hook: source.hook.clone(),
        };
        if source.order.len() == source.entries.len() {
            table.order = source.order.clone();
            table.next_index = source.next_index;
        } else {
            table.report(PathDiagnostic::OrderRebuilt {
                expected: source.entries.len(),
                found: source.order.len(),
            });
            for lookup in table.entries.keys() {
                table.order.insert(lookup.clone(), table.next_index);
                table.next_index += 1;
            }
        }
        table
    }

    /// Append every entry of `other` (in its order) that this table lacks.
    pub fn merge(&mut self, other: &PathTable<V>) -> Result<usize, InvariantViolation> {
        let mut added = 0;
        for (key, value) in other.pairs_in_order(false)? {
            if !self.contains(key) {
                self.upsert(key, value.clone());
                added += 1;
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn table(keys: &[&str]) -> PathTable<u32> {
        let mut t = PathTable::new(PathTranslation::Unix);
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as u32).unwrap();
        }
        t
    }

    fn recording_hook(t: &mut PathTable<u32>) -> Arc<Mutex<Vec<PathDiagnostic>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        t.set_diagnostic_hook(Arc::new(move |d: &PathDiagnostic| sink.lock().unwrap().push(d.clone())));
        seen
    }

    #[test]
    fn remove_closes_gap_and_reinsert_appends() {
        let mut t = table(&["a", "b", "c"]);
        assert_eq!(t.remove("b"), Some(1));
        assert_eq!(t.keys_in_order(false).unwrap(), ["a", "c"]);
        assert_eq!(t.order["a"], 0);
        assert_eq!(t.order["c"], 1);
        assert_eq!(t.next_index, 2);

        t.insert("b", 9).unwrap();
        assert_eq!(t.keys_in_order(false).unwrap(), ["a", "c", "b"]);
        assert_eq!(t.order["b"], 2);
        t.check_invariants().unwrap();
    }

    #[test]
    fn strict_insert_rejects_duplicates() {
        let mut t = table(&["/usr/lib"]);
        let err = t.insert("/usr/lib/", 5).unwrap_err();
        assert_eq!(err.key, "/usr/lib");
        assert_eq!(t.get("/usr/lib"), Some(&0));
    }

    #[test]
    fn upsert_keeps_order_and_spelling() {
        let mut t = PathTable::new(PathTranslation::Windows);
        t.insert("C:/Tcl", 1).unwrap();
        t.insert("D:/x", 2).unwrap();
        assert_eq!(t.upsert("c:\\TCL\\", 3), Some(1));
        assert_eq!(t.pairs_in_order(false).unwrap(), [("C:\\Tcl", &3), ("D:\\x", &2)]);
        assert_eq!(t.upsert("e:/", 4), None);
        assert_eq!(t.nth_key(2, false), Some("e:\\"));
    }

    #[test]
    fn normalised_spellings_collide() {
        let t = table(&["a\\b"]);
        assert!(t.contains("a/b/"));
        assert!(!t.contains("A/B"));
    }

    #[test]
    fn reverse_views_and_nth() {
        let t = table(&["x", "y", "z"]);
        assert_eq!(t.keys_in_order(true).unwrap(), ["z", "y", "x"]);
        assert_eq!(t.nth_key(0, false), Some("x"));
        assert_eq!(t.nth_key(0, true), Some("z"));
        assert_eq!(t.nth_key(2, true), Some("x"));
        assert_eq!(t.nth_key(3, false), None);
        assert_eq!(t.nth_pair(1, false), Some(("y", &1)));
    }

    #[test]
    fn get_mut_and_clear() {
        let mut t = table(&["a"]);
        *t.get_mut("a").unwrap() = 7;
        assert_eq!(t.get("a"), Some(&7));
        t.clear();
        assert!(t.is_empty());
        t.insert("b", 1).unwrap();
        assert_eq!(t.order["b"], 0);
    }

    #[test]
    fn extend_with_and_without_merge() {
        let mut t: PathTable<u32> = PathTable::new(PathTranslation::Unix);
        assert_eq!(t.extend(["a", "b"], false).unwrap(), 2);
        assert_eq!(t.extend(["b", "c"], true).unwrap(), 1);
        assert!(t.extend(["c"], false).is_err());
        assert_eq!(t.keys_in_order(false).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn from_paths_skips_duplicates() {
        let t: PathTable<()> = PathTable::from_paths(["/a", "/b/", "/a/", "/c"], PathTranslation::Unix);
        assert_eq!(t.keys_in_order(false).unwrap(), ["/a", "/b", "/c"]);
    }

    #[test]
    fn list_string_with_pattern() {
        let t = table(&["/usr/lib", "/opt/Lib", "/usr/share"]);
        assert_eq!(t.to_list_string(None, false, false).unwrap(), "/usr/lib /opt/Lib /usr/share");
        assert_eq!(t.to_list_string(Some("*lib"), true, true).unwrap(), "/opt/Lib /usr/lib");
        let spaced = table(&["/My Docs"]);
        assert_eq!(spaced.to_list_string(None, false, false).unwrap(), "{/My Docs}");
    }

    #[test]
    fn copy_fast_path_preserves_order() {
        let mut t = table(&["c", "a", "b"]);
        let seen = recording_hook(&mut t);
        let copy = PathTable::merged_from(&t);
        assert_eq!(copy.keys_in_order(false).unwrap(), ["c", "a", "b"]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn copy_fallback_is_observable() {
        let mut t = table(&["a", "b", "c"]);
        let seen = recording_hook(&mut t);
        t.order.remove("b");

        let copy = PathTable::merged_from(&t);
        copy.check_invariants().unwrap();
        let mut keys = copy.keys_in_order(false).unwrap();
        keys.sort_unstable();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            [PathDiagnostic::OrderRebuilt { expected: 3, found: 2 }]
        );
    }

    #[test]
    fn out_of_range_index_is_an_invariant_violation() {
        let mut t = table(&["a", "b"]);
        let seen = recording_hook(&mut t);
        t.order.insert("b".into(), 5);
        let err = t.keys_in_order(false).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::IndexOutOfRange { key: "b".into(), index: 5, count: 2 }
        );
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_index_is_an_invariant_violation() {
        let mut t = table(&["a", "b"]);
        t.order.insert("b".into(), 0);
        assert!(matches!(
            t.check_invariants(),
            Err(InvariantViolation::DuplicateIndex { index: 0, .. })
        ));
    }

    #[test]
    fn missing_value_is_an_invariant_violation() {
        let mut t = table(&["a", "b"]);
        let entry = t.entries.remove("b").unwrap();
        t.entries.insert("zz".into(), entry);
        assert!(matches!(
            t.pairs_in_order(false),
            Err(InvariantViolation::MissingValue { .. })
        ));
    }

    #[test]
    fn count_mismatch_is_an_invariant_violation() {
        let mut t = table(&["a"]);
        t.order.clear();
        assert_eq!(
            t.check_invariants(),
            Err(InvariantViolation::CountMismatch { entries: 1, ordering: 0 })
        );
    }

    #[test]
    fn merge_appends_missing_in_source_order() {
        let mut a = table(&["x", "y"]);
        let b = table(&["z", "x", "w"]);
        assert_eq!(a.merge(&b).unwrap(), 2);
        assert_eq!(a.keys_in_order(false).unwrap(), ["x", "y", "z", "w"]);
    }

    #[test]
    fn serialize_round_trip() {
        let t = table(&["/a b", "/c", "/{d"]);
        let text = t.serialize().unwrap();
        assert!(text.starts_with("tclish-path-table 1 unix "));
        let back: PathTable<u32> = PathTable::deserialize(&text).unwrap();
        assert_eq!(back.keys_in_order(false).unwrap(), ["/a b", "/c", "/{d"]);
        assert_eq!(back.translation(), PathTranslation::Unix);
    }

    #[test]
    fn deserialize_rejects_bad_input() {
        assert!(PathTable::<u32>::deserialize("tclish-path-table 2 unix {}").is_err());
        assert!(PathTable::<u32>::deserialize("other 1 unix {}").is_err());
        assert!(PathTable::<u32>::deserialize("tclish-path-table 1 dos {}").is_err());
        assert!(PathTable::<u32>::deserialize("tclish-path-table 1 unix {a a}").is_err());
        assert!(PathTable::<u32>::deserialize("{").is_err());
    }
}
