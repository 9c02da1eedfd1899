//! Option values and the kinds they are checked against.
//!
//! Every argument is a string at heart; an option's [`ValueKind`] decides
//! how the token following its name is converted when the argument list is
//! scanned.

use std::fmt;

use crate::error::OptionError;
use crate::list::{self, List, ListValue};
use crate::options::message::to_english;

/// What an option's value must look like.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// The option takes no value.
    #[default]
    None,
    String,
    Integer,
    Wide,
    UWide,
    Byte,
    Boolean,
    List,
    /// One of a fixed set of words.
    Enum(Vec<String>),
}

/// A converted option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i32),
    Wide(i64),
    UWide(u64),
    Byte(u8),
    Bool(bool),
    List(List),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Wide(n) => write!(f, "{n}"),
            Value::UWide(n) => write!(f, "{n}"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::List(l) => f.write_str(l.to_canonical()),
        }
    }
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Str(s) => parse_boolean(s),
            _ => self.as_wide().map(|n| n != 0),
        }
    }

    pub fn as_wide(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Wide(n) => Some(*n),
            Value::UWide(n) => i64::try_from(*n).ok(),
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Str(s) => i64::parse_value(s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Tcl boolean words (`1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`,
/// case-insensitive) plus any integer, non-zero meaning true.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        other => list::typed::parse_integer(other).map(|n| n != 0),
    }
}

impl ValueKind {
    /// Parse a kind as written in an option specification: a bare word, or
    /// a list `enum choice ...`.
    pub fn from_spec(spec: &str) -> Result<Self, OptionError> {
        let words = list::split(spec).map_err(|_| OptionError::UnknownKind { kind: spec.to_owned() })?;
        let Some((head, rest)) = words.split_first() else {
            return Ok(ValueKind::None);
        };
        let kind = match head.to_ascii_lowercase().as_str() {
            "enum" if !rest.is_empty() => return Ok(ValueKind::Enum(rest.to_vec())),
            "enum" => return Err(OptionError::IncompleteSpec { spec: spec.to_owned() }),
            "none" => ValueKind::None,
            "string" => ValueKind::String,
            "integer" | "int" => ValueKind::Integer,
            "wide" => ValueKind::Wide,
            "uwide" => ValueKind::UWide,
            "byte" => ValueKind::Byte,
            "boolean" | "bool" => ValueKind::Boolean,
            "list" => ValueKind::List,
            _ => return Err(OptionError::UnknownKind { kind: spec.to_owned() }),
        };
        if rest.is_empty() {
            Ok(kind)
        } else {
            Err(OptionError::UnknownKind { kind: spec.to_owned() })
        }
    }

    pub fn takes_value(&self) -> bool {
        !matches!(self, ValueKind::None)
    }

    /// What the value should have been, for error messages.
    pub fn expected(&self) -> String {
        match self {
            ValueKind::None => "no value".to_owned(),
            ValueKind::String => "string".to_owned(),
            ValueKind::Integer => i32::EXPECTED.to_owned(),
            ValueKind::Wide => i64::EXPECTED.to_owned(),
            ValueKind::UWide => u64::EXPECTED.to_owned(),
            ValueKind::Byte => u8::EXPECTED.to_owned(),
            ValueKind::Boolean => "boolean".to_owned(),
            ValueKind::List => "list".to_owned(),
            ValueKind::Enum(choices) => format!("one of {}", to_english(choices.iter())),
        }
    }

    /// Convert `text` to a value of this kind.
    ///
    /// With `strict`, numeric text must not carry surrounding whitespace.
    pub fn convert(&self, text: &str, strict: bool) -> Option<Value> {
        let numeric = matches!(
            self,
            ValueKind::Integer | ValueKind::Wide | ValueKind::UWide | ValueKind::Byte | ValueKind::Boolean
        );
        if strict && numeric && text.trim() != text {
            return None;
        }
        match self {
            ValueKind::None | ValueKind::String => Some(Value::Str(text.to_owned())),
            ValueKind::Integer => i32::parse_value(text).map(Value::Int),
            ValueKind::Wide => i64::parse_value(text).map(Value::Wide),
            ValueKind::UWide => u64::parse_value(text).map(Value::UWide),
            ValueKind::Byte => u8::parse_value(text).map(Value::Byte),
            ValueKind::Boolean => parse_boolean(text.trim()).map(Value::Bool),
            ValueKind::List => List::parse(text).ok().map(Value::List),
            ValueKind::Enum(choices) => choices
                .iter()
                .find(|c| c.as_str() == text)
                .map(|c| Value::Str(c.clone())),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            ValueKind::None => "none",
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Wide => "wide",
            ValueKind::UWide => "uwide",
            ValueKind::Byte => "byte",
            ValueKind::Boolean => "boolean",
            ValueKind::List => "list",
            ValueKind::Enum(choices) => {
                let mut words = vec!["enum"];
                words.extend(choices.iter().map(String::as_str));
                return f.write_str(&list::format::join(words, " ", None));
            }
        };
        f.write_str(word)
    }
}
