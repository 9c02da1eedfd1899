//! Numeric lists: the list codec plus per-element conversion.
//!
//! Integer literals follow Tcl: optional surrounding whitespace, optional
//! sign, then decimal digits or a `0x` / `0o` / `0b` prefixed radix form.

use std::fmt::Display;

use crate::error::{Error, ValueError};
use crate::list::{format, parse, List};

/// A value type that list elements can be converted to.
pub trait ListValue: Copy + Display {
    /// Type name used in conversion errors ("expected integer but got ...").
    const EXPECTED: &'static str;

    fn parse_value(text: &str) -> Option<Self>;
}

/// Parse a Tcl integer literal into its signed value.
///
/// Returns `None` for anything that is not an integer or does not fit in
/// an `i128`.
pub fn parse_integer(text: &str) -> Option<i128> {
    let s = text.trim_matches(|c: char| c.is_ascii_whitespace());
    let (negative, s) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (16, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0b") => (2, &s[2..]),
        _ => (10, s),
    };
    // from_str_radix would accept a second sign here.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let magnitude = u128::from_str_radix(digits, radix).ok()?;
    let magnitude = i128::try_from(magnitude).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl ListValue for i32 {
    const EXPECTED: &'static str = "integer";
    fn parse_value(text: &str) -> Option<Self> {
        i32::try_from(parse_integer(text)?).ok()
    }
}

impl ListValue for i64 {
    const EXPECTED: &'static str = "wide integer";
    fn parse_value(text: &str) -> Option<Self> {
        i64::try_from(parse_integer(text)?).ok()
    }
}

impl ListValue for u64 {
    const EXPECTED: &'static str = "unsigned wide integer";
    fn parse_value(text: &str) -> Option<Self> {
        u64::try_from(parse_integer(text)?).ok()
    }
}

impl ListValue for u8 {
    const EXPECTED: &'static str = "byte";
    /// Accepts 0..=255, and -128..=-1 as the two's-complement byte image.
    fn parse_value(text: &str) -> Option<Self> {
        match parse_integer(text)? {
            v @ 0..=255 => Some(v as u8),
            v @ -128..=-1 => Some(v as i8 as u8),
            _ => None,
        }
    }
}

/// A list whose elements all convert to `T`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypedList<T> {
    values: Vec<T>,
}

impl<T: ListValue> TypedList<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Parse list text and convert every element.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let elements = parse::split(text)?;
        Ok(Self::convert(elements.iter().map(String::as_str))?)
    }

    /// Convert an already-parsed list.
    pub fn from_list(list: &List) -> Result<Self, ValueError> {
        Self::convert(list.texts())
    }

    fn convert<'a>(texts: impl Iterator<Item = &'a str>) -> Result<Self, ValueError> {
        let values = texts
            .enumerate()
            .map(|(index, text)| {
                T::parse_value(text).ok_or_else(|| ValueError {
                    index,
                    element: text.to_owned(),
                    expected: T::EXPECTED,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_list(&self) -> List {
        self.values.iter().map(|v| v.to_string()).collect()
    }

    /// Canonical text; numbers never need quoting.
    pub fn to_canonical(&self) -> String {
        format::join(self.values.iter().map(|v| v.to_string()), " ", None)
    }
}

impl<T: ListValue> From<Vec<T>> for TypedList<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}
