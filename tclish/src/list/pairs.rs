//! Name/value pair lists (`{name value name value ...}`).

use crate::error::ParseError;
use crate::list::{format, parse, Element, List};

/// An ordered list of name/value pairs.
///
/// Names may repeat; [`get`](Self::get) returns the last value for a name,
/// matching dictionary semantics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairList {
    pairs: Vec<(String, String)>,
}

impl PairList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse list text that must hold an even number of elements.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::from_elements(parse::split(text)?)
    }

    /// Pair up already-split elements.
    pub fn from_elements(elements: Vec<String>) -> Result<Self, ParseError> {
        if elements.len() % 2 != 0 {
            return Err(ParseError::OddElementCount { count: elements.len() });
        }
        let mut pairs = Vec::with_capacity(elements.len() / 2);
        let mut it = elements.into_iter();
        while let (Some(name), Some(value)) = (it.next(), it.next()) {
            pairs.push((name, value));
        }
        Ok(Self { pairs })
    }

    pub fn from_list(list: &List) -> Result<Self, ParseError> {
        Self::from_elements(list.texts().map(str::to_owned).collect())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flatten to a list; each value element carries its name.
    pub fn to_list(&self) -> List {
        let mut list = List::new();
        for (name, value) in &self.pairs {
            list.push(name.as_str());
            list.push(Element::named(name.as_str(), value.as_str()));
        }
        list
    }

    pub fn to_canonical(&self) -> String {
        format::join(
            self.pairs.iter().flat_map(|(n, v)| [n.as_str(), v.as_str()]),
            " ",
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_list_pairs_up() {
        let p = PairList::parse("a 1 {b c} {2 3}").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("b c"), Some("2 3"));
        assert_eq!(p.to_canonical(), "a 1 {b c} {2 3}");
    }

    #[test]
    fn odd_list_is_an_error() {
        let err = PairList::parse("a 1 b").unwrap_err();
        assert_eq!(err, ParseError::OddElementCount { count: 3 });
        assert_eq!(
            err.to_string(),
            "list of name/value pairs must have an even number of elements, has 3"
        );
    }

    #[test]
    fn last_value_wins() {
        let p = PairList::parse("k 1 k 2").unwrap();
        assert_eq!(p.get("k"), Some("2"));
        assert_eq!(p.names().collect::<Vec<_>>(), ["k", "k"]);
    }

    #[test]
    fn to_list_names_values() {
        let mut p = PairList::new();
        p.push("x", "");
        let l = p.to_list();
        assert_eq!(l.to_canonical(), "x {}");
        assert_eq!(l.get(1).and_then(Element::name), Some("x"));
    }

    #[test]
    fn empty_input() {
        assert!(PairList::parse("").unwrap().is_empty());
    }
}
