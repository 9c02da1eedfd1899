//! Error taxonomy.
//!
//! Every error's `Display` text is the user-facing diagnostic and is meant to
//! be shown verbatim (e.g. `bad option "-x": must be -a, -b, or -c`).

use thiserror::Error;

use crate::pattern::PatternError;

/// Malformed list text.  Offsets are 0-based byte offsets into the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unmatched open brace in list (at offset {offset})")]
    UnmatchedBrace { offset: usize },
    #[error("unmatched open quote in list (at offset {offset})")]
    UnmatchedQuote { offset: usize },
    #[error("trailing backslash in list (at offset {offset})")]
    TrailingBackslash { offset: usize },
    #[error("list element in braces followed by \"{found}\" instead of space (at offset {offset})")]
    JunkAfterBrace { offset: usize, found: String },
    #[error("list element in quotes followed by \"{found}\" instead of space (at offset {offset})")]
    JunkAfterQuote { offset: usize, found: String },
    #[error("list of name/value pairs must have an even number of elements, has {count}")]
    OddElementCount { count: usize },
}

impl ParseError {
    /// Byte offset of the offending character, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnmatchedBrace { offset }
            | ParseError::UnmatchedQuote { offset }
            | ParseError::TrailingBackslash { offset }
            | ParseError::JunkAfterBrace { offset, .. }
            | ParseError::JunkAfterQuote { offset, .. } => Some(*offset),
            ParseError::OddElementCount { .. } => None,
        }
    }
}

/// A list element that does not convert to the requested numeric type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} but got \"{element}\" (element {index})")]
pub struct ValueError {
    pub index: usize,
    pub element: String,
    pub expected: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("key \"{key}\" already exists")]
pub struct DuplicateKey {
    pub key: String,
}

/// A registration that would leave the option set with two entries for
/// the same name, or with two end-of-options markers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateOption {
    #[error("option \"{name}\" already exists")]
    Name { name: String },
    #[error("option \"{name}\" cannot end options: \"{existing}\" already does")]
    EndOfOptions { name: String, existing: String },
}

impl DuplicateOption {
    /// The name that failed to register.
    pub fn name(&self) -> &str {
        match self {
            DuplicateOption::Name { name } | DuplicateOption::EndOfOptions { name, .. } => name,
        }
    }
}

/// Failure to map a caller-supplied name onto a registered option.
///
/// `message` is the complete natural-language diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{message}")]
    Unknown { name: String, message: String },
    #[error("{message}")]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
        message: String,
    },
}

impl ResolveError {
    /// The name the caller asked for.
    pub fn name(&self) -> &str {
        match self {
            ResolveError::Unknown { name, .. } | ResolveError::Ambiguous { name, .. } => name,
        }
    }
}

/// Corruption of the ordered path table's order side index.
///
/// This always indicates a programming defect, never bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("order index {index} for key \"{key}\" is outside 0..{count}")]
    IndexOutOfRange { key: String, index: usize, count: usize },
    #[error("order index {index} is shared by \"{first}\" and \"{second}\"")]
    DuplicateIndex {
        index: usize,
        first: String,
        second: String,
    },
    #[error("order index has {ordering} entries but the table has {entries}")]
    CountMismatch { entries: usize, ordering: usize },
    #[error("ordered key \"{key}\" has no value")]
    MissingValue { key: String },
}

/// Problems with an option's presence, value, or definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("option \"{name}\" not supported for this platform")]
    Unsupported { name: String },
    #[error("option \"{name}\" is disabled")]
    Disabled { name: String },
    #[error("value for \"{name}\" missing")]
    MissingValue { name: String },
    #[error("bad value for option \"{name}\": expected {expected} but got \"{value}\"")]
    BadValue {
        name: String,
        value: String,
        expected: String,
    },
    #[error("option specification \"{spec}\" is incomplete")]
    IncompleteSpec { spec: String },
    #[error("option specification \"{spec}\" has extra words")]
    ExtraSpecWords { spec: String },
    #[error("bad group \"{group}\" in option specification: must be a non-negative integer")]
    BadGroup { group: String },
    #[error("unknown option flag \"{flag}\"")]
    UnknownFlag { flag: String },
    #[error("unknown value kind \"{kind}\"")]
    UnknownKind { kind: String },
    /// The list-of-options token was given; the payload is the
    /// "available options are ..." text.
    #[error("{0}")]
    Listing(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot deserialize path table: {reason}")]
pub struct SerializationError {
    pub reason: String,
}

/// Crate-level error: any of the above.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKey),
    #[error(transparent)]
    DuplicateOption(#[from] DuplicateOption),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_offsets() {
        assert_eq!(ParseError::UnmatchedBrace { offset: 3 }.offset(), Some(3));
        assert_eq!(ParseError::OddElementCount { count: 3 }.offset(), None);
    }

    #[test]
    fn resolve_error_displays_message_verbatim() {
        let e = ResolveError::Unknown {
            name: "-x".into(),
            message: "bad option \"-x\": must be -a or -b".into(),
        };
        assert_eq!(e.to_string(), "bad option \"-x\": must be -a or -b");
        assert_eq!(e.name(), "-x");
    }

    #[test]
    fn crate_error_is_transparent() {
        let e: Error = OptionError::Disabled { name: "-q".into() }.into();
        assert_eq!(e.to_string(), "option \"-q\" is disabled");
    }
}
