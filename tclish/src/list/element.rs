//! List element: a text value plus optional metadata.
//!
//! An [`Element`] is immutable once placed in a [`List`](super::List);
//! list mutators replace elements rather than editing them in place.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Metadata flags carried by an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ElementFlags(u8);

impl ElementFlags {
    pub const NONE: Self        = Self(0x00);
    /// The element is a formal argument that has a default value.
    pub const HAS_DEFAULT: Self = Self(0x01);
    /// The element is the variadic tail (`args`) of an argument list.
    pub const VARIADIC: Self    = Self(0x02);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ElementFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

impl BitOrAssign for ElementFlags {
    fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }
}

impl BitAnd for ElementFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self { Self(self.0 & rhs.0) }
}

impl Not for ElementFlags {
    type Output = Self;
    fn not(self) -> Self { Self(!self.0) }
}

/// One list element.
///
/// `name` is set when the element came from a name/value pair (for example a
/// formal argument with a default).  Formatting and equality of lists only
/// look at [`text`](Self::text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Element {
    text: String,
    name: Option<String>,
    flags: ElementFlags,
}

impl Element {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: None,
            flags: ElementFlags::NONE,
        }
    }

    /// An element tagged with the name it was paired with.
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: Some(name.into()),
            flags: ElementFlags::NONE,
        }
    }

    /// Return a copy of `self` with `flags` added.
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consume the element and return its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for Element {
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_element_has_no_metadata() {
        let e = Element::from("hello");
        assert_eq!(e.text(), "hello");
        assert_eq!(e.name(), None);
        assert!(e.flags().is_empty());
        assert_eq!(e.len(), 5);
    }

    #[test]
    fn named_element_with_flags() {
        let e = Element::named("count", "10").with_flags(ElementFlags::HAS_DEFAULT);
        assert_eq!(e.name(), Some("count"));
        assert!(e.flags().contains(ElementFlags::HAS_DEFAULT));
        assert!(!e.flags().contains(ElementFlags::VARIADIC));
    }

    #[test]
    fn flags_combine() {
        let f = ElementFlags::HAS_DEFAULT | ElementFlags::VARIADIC;
        assert!(f.contains(ElementFlags::VARIADIC));
        assert_eq!(f & !ElementFlags::VARIADIC, ElementFlags::HAS_DEFAULT);
    }

    #[test]
    fn display_impl() {
        let e = Element::from("world");
        assert_eq!(format!("{e}"), "world");
        assert_eq!(e.into_text(), "world");
    }
}
