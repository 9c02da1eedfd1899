//! Tcl list values.
//!
//! A [`List`] is an ordered sequence of [`Element`]s with a lazily computed,
//! cached canonical string.  Every mutator drops the cache; the cache is
//! only consulted for the canonical form (single-space separator, no filter).
//!
//! `parse(format(l)) == l` holds element-for-element for every list `l`.

pub mod element;
pub mod format;
pub mod pairs;
pub mod parse;
pub mod typed;

use std::cell::OnceCell;
use std::cmp::Ordering;

use log::trace;

use crate::error::ParseError;
use crate::pattern::{MatchMode, Pattern, PatternError};

pub use element::{Element, ElementFlags};
pub use pairs::PairList;
pub use parse::{split, Splitter};
pub use typed::{ListValue, TypedList};

/// The canonical element separator.
pub const CANONICAL_SEPARATOR: &str = " ";

// ── FormatOptions ─────────────────────────────────────────────────────────────

/// How to render a list as text.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    separator: String,
    filter: Option<Pattern>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            separator: CANONICAL_SEPARATOR.to_owned(),
            filter: None,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Keep only elements matching the glob `pattern`.
    pub fn pattern(mut self, pattern: &str, nocase: bool) -> Self {
        self.filter = Some(Pattern::glob(pattern, nocase));
        self
    }

    /// Keep only elements matching the regular expression `re`.
    pub fn regexp(mut self, re: &str, nocase: bool) -> Result<Self, PatternError> {
        self.filter = Some(Pattern::new(re, MatchMode::Regexp, nocase)?);
        Ok(self)
    }

    pub fn filter(mut self, pattern: Option<Pattern>) -> Self {
        self.filter = pattern;
        self
    }

    pub fn get_separator(&self) -> &str {
        &self.separator
    }

    pub fn get_filter(&self) -> Option<&Pattern> {
        self.filter.as_ref()
    }

    /// `true` when these options produce the canonical form.
    pub fn is_canonical(&self) -> bool {
        self.separator == CANONICAL_SEPARATOR && self.filter.is_none()
    }
}

/// Format `elements` with `separator`, keeping only those that match the
/// glob `pattern` (compared case-insensitively when `nocase`).
pub fn format<I, S>(elements: I, separator: &str, pattern: Option<&str>, nocase: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let filter = pattern.map(|p| Pattern::glob(p, nocase));
    format::join(elements, separator, filter.as_ref())
}

// ── List ──────────────────────────────────────────────────────────────────────

/// An ordered list of elements with a cached canonical string.
#[derive(Debug, Clone, Default)]
pub struct List {
    elements: Vec<Element>,
    canonical: OnceCell<String>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            canonical: OnceCell::new(),
        }
    }

    /// Parse list text.  An empty string is an empty list.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let elements = parse::split(text)?;
        Ok(Self::from_elements(elements))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Iterate over element texts.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().map(Element::text)
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    fn invalidate(&mut self) {
        self.canonical.take();
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    pub fn push(&mut self, element: impl Into<Element>) {
        self.invalidate();
        self.elements.push(element.into());
    }

    /// Insert before `index`; an index past the end appends.
    pub fn insert(&mut self, index: usize, element: impl Into<Element>) {
        self.invalidate();
        let index = index.min(self.elements.len());
        self.elements.insert(index, element.into());
    }

    pub fn remove(&mut self, index: usize) -> Option<Element> {
        if index >= self.elements.len() {
            return None;
        }
        self.invalidate();
        Some(self.elements.remove(index))
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, element: impl Into<Element>) -> Option<Element> {
        let slot = self.elements.get_mut(index)?;
        let old = std::mem::replace(slot, element.into());
        self.invalidate();
        Some(old)
    }

    pub fn clear(&mut self) {
        self.invalidate();
        self.elements.clear();
    }

    /// Sort by element text (stable).
    pub fn sort(&mut self) {
        self.invalidate();
        self.elements.sort_by(|a, b| a.text().cmp(b.text()));
    }

    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Element, &Element) -> Ordering,
    {
        self.invalidate();
        self.elements.sort_by(|a, b| compare(a, b));
    }

    pub fn reverse(&mut self) {
        self.invalidate();
        self.elements.reverse();
    }

    pub fn extend<I, E>(&mut self, elements: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        self.invalidate();
        self.elements.extend(elements.into_iter().map(Into::into));
    }

    /// Drop later duplicates (by text), keeping first occurrences in order.
    pub fn retain_unique(&mut self) {
        self.invalidate();
        let mut seen = std::collections::HashSet::new();
        self.elements.retain(|e| seen.insert(e.text().to_owned()));
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Elements `first..=last`, clamped like Tcl `lrange`: a negative
    /// `first` means 0, a `last` past the end means the last element, and
    /// `first > last` yields an empty list.
    pub fn range(&self, first: isize, last: isize) -> List {
        match self.clamp(first, last) {
            Some((a, b)) => List::from_elements(self.elements[a..=b].iter().cloned()),
            None => List::new(),
        }
    }

    fn clamp(&self, first: isize, last: isize) -> Option<(usize, usize)> {
        if self.elements.is_empty() {
            return None;
        }
        let first = first.max(0) as usize;
        let last = usize::try_from(last).ok()?.min(self.elements.len() - 1);
        (first <= last).then_some((first, last))
    }

    /// Index of the first element matching `pattern`.
    pub fn search(&self, pattern: &Pattern) -> Option<usize> {
        self.elements.iter().position(|e| pattern.matches(e.text()))
    }

    // ── Formatting ────────────────────────────────────────────────────────

    /// The canonical string form, computed once and cached until the next
    /// mutation.
    pub fn to_canonical(&self) -> &str {
        self.canonical.get_or_init(|| {
            trace!(target: "tclish::list", "formatting {} elements", self.elements.len());
            format::join(self.texts(), CANONICAL_SEPARATOR, None)
        })
    }

    /// Format with explicit options; the cache is used only when `options`
    /// describe the canonical form.
    pub fn to_string_with(&self, options: &FormatOptions) -> String {
        if options.is_canonical() {
            return self.to_canonical().to_owned();
        }
        format::join(self.texts(), &options.separator, options.filter.as_ref())
    }

    /// Format the elements `first..=last` (clamped as in [`range`](Self::range)).
    pub fn format_range(&self, first: isize, last: isize, options: &FormatOptions) -> String {
        match self.clamp(first, last) {
            Some((a, b)) => format::join(
                self.elements[a..=b].iter().map(Element::text),
                &options.separator,
                options.filter.as_ref(),
            ),
            None => String::new(),
        }
    }

    /// Concatenate element texts with `separator` and no quoting.
    pub fn raw_concat(&self, separator: &str) -> String {
        format::raw_join(self.texts(), separator)
    }

    /// `true` if the canonical string is currently cached.
    pub fn is_cached(&self) -> bool {
        self.canonical.get().is_some()
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.elements.len() == other.elements.len() && self.texts().eq(other.texts())
    }
}

impl Eq for List {}

impl std::fmt::Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_canonical())
    }
}

impl std::str::FromStr for List {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<E: Into<Element>> FromIterator<E> for List {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_elements(iter)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;
    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for List {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;
    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
