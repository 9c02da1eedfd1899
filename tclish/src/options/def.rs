//! A single option definition plus its per-scan state.

use crate::error::OptionError;
use crate::list::{self, typed::parse_integer};
use crate::options::flags::OptionFlags;
use crate::options::value::{Value, ValueKind};

/// The conventional end-of-options token.
pub const END_OF_OPTIONS: &str = "--";
/// The token that asks for the list of available options.
pub const LIST_OF_OPTIONS: &str = "---";

/// Flags an option specification may name.
const SPEC_FLAGS: [OptionFlags; 8] = [
    OptionFlags::MUST_HAVE_VALUE,
    OptionFlags::END_OF_OPTIONS,
    OptionFlags::NO_CASE,
    OptionFlags::UNSAFE,
    OptionFlags::IGNORED,
    OptionFlags::DISABLED,
    OptionFlags::UNSUPPORTED,
    OptionFlags::STRICT,
];

/// A named option.
///
/// The definition part (`name`, `kind`, `flags`, `group`) is fixed at
/// registration; presence, value and argument index are filled in while an
/// argument list is scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDef {
    name: String,
    kind: ValueKind,
    flags: OptionFlags,
    group: Option<usize>,
    value: Option<Value>,
    index: Option<usize>,
}

impl OptionDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::None,
            flags: OptionFlags::NONE,
            group: None,
            value: None,
            index: None,
        }
    }

    /// The `--` option.
    pub fn end_of_options() -> Self {
        Self::new(END_OF_OPTIONS).with_flags(OptionFlags::END_OF_OPTIONS)
    }

    /// The `---` option.
    pub fn list_of_options() -> Self {
        Self::new(LIST_OF_OPTIONS).with_flags(OptionFlags::LIST_OF_OPTIONS | OptionFlags::SYSTEM)
    }

    /// Set the value kind; any kind but `None` makes the option take a value.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        if kind.takes_value() {
            self.flags |= OptionFlags::MUST_HAVE_VALUE;
        }
        self.kind = kind;
        self
    }

    pub fn with_flags(mut self, flags: OptionFlags) -> Self {
        self.flags |= flags & !OptionFlags::PRESENT;
        if self.flags.contains(OptionFlags::MUST_HAVE_VALUE) && !self.kind.takes_value() {
            self.kind = ValueKind::String;
        }
        self
    }

    /// Put the option in a mutually exclusive group.
    pub fn in_group(mut self, group: usize) -> Self {
        self.group = Some(group);
        self
    }

    /// Parse `name ?kind? ?flags? ?group?`.
    pub fn from_spec(spec: &str) -> Result<Self, OptionError> {
        let words = list::split(spec).map_err(|_| OptionError::IncompleteSpec { spec: spec.to_owned() })?;
        let mut words = words.into_iter();
        let Some(name) = words.next() else {
            return Err(OptionError::IncompleteSpec { spec: spec.to_owned() });
        };
        let mut def = Self::new(name);
        if let Some(kind) = words.next() {
            def = def.with_kind(ValueKind::from_spec(&kind)?);
        }
        if let Some(flags) = words.next() {
            let names = list::split(&flags).map_err(|_| OptionError::UnknownFlag { flag: flags.clone() })?;
            for flag in names {
                match OptionFlags::from_name(&flag) {
                    Some(f) if SPEC_FLAGS.contains(&f) => def = def.with_flags(f),
                    _ => return Err(OptionError::UnknownFlag { flag }),
                }
            }
        }
        if let Some(group) = words.next() {
            match parse_integer(&group).and_then(|g| usize::try_from(g).ok()) {
                Some(g) => def = def.in_group(g),
                None => return Err(OptionError::BadGroup { group }),
            }
        }
        if words.next().is_some() {
            return Err(OptionError::ExtraSpecWords { spec: spec.to_owned() });
        }
        if def.name == END_OF_OPTIONS {
            def.flags |= OptionFlags::END_OF_OPTIONS;
        } else if def.name == LIST_OF_OPTIONS {
            def.flags |= OptionFlags::LIST_OF_OPTIONS | OptionFlags::SYSTEM;
        }
        Ok(def)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    pub fn group(&self) -> Option<usize> {
        self.group
    }

    /// Argument index of the option name, when present.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.flags.contains(OptionFlags::PRESENT)
    }

    pub fn must_have_value(&self) -> bool {
        self.flags.contains(OptionFlags::MUST_HAVE_VALUE)
    }

    pub fn is_no_case(&self) -> bool {
        self.flags.contains(OptionFlags::NO_CASE)
    }

    pub fn is_unsafe(&self) -> bool {
        self.flags.contains(OptionFlags::UNSAFE)
    }

    pub fn is_ignored(&self) -> bool {
        self.flags.contains(OptionFlags::IGNORED)
    }

    pub fn is_strict(&self) -> bool {
        self.flags.contains(OptionFlags::STRICT)
    }

    pub fn is_end_of_options(&self) -> bool {
        self.flags.contains(OptionFlags::END_OF_OPTIONS)
    }

    pub fn is_list_of_options(&self) -> bool {
        self.flags.contains(OptionFlags::LIST_OF_OPTIONS)
    }

    /// Whether the option may be used at all on this host.
    pub fn can_be_present(&self) -> Result<(), OptionError> {
        if self.flags.contains(OptionFlags::UNSUPPORTED) {
            return Err(OptionError::Unsupported { name: self.name.clone() });
        }
        if self.flags.contains(OptionFlags::DISABLED) {
            return Err(OptionError::Disabled { name: self.name.clone() });
        }
        Ok(())
    }

    /// Value as seen by callers: only options that take a value have one.
    pub(crate) fn present_value(&self) -> Option<&Value> {
        if self.must_have_value() {
            self.value.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn mark(&mut self, present: bool, index: Option<usize>, value: Option<Value>) {
        if present {
            self.flags |= OptionFlags::PRESENT;
            self.index = index;
            self.value = value;
        } else {
            self.clear();
        }
    }

    /// Forget presence only; used when a group sibling becomes present.
    pub(crate) fn unmark(&mut self) {
        self.flags = self.flags & !OptionFlags::PRESENT;
    }

    pub(crate) fn clear(&mut self) {
        self.flags = self.flags & !OptionFlags::PRESENT;
        self.index = None;
        self.value = None;
    }

    /// The specification list that [`from_spec`](Self::from_spec) reads back.
    pub fn to_spec(&self) -> String {
        let flags: Vec<&str> = self
            .flags
            .names()
            .into_iter()
            .filter(|n| {
                OptionFlags::from_name(n).is_some_and(|f| SPEC_FLAGS.contains(&f))
                    && *n != "MustHaveValue"
            })
            .collect();
        let mut words = vec![self.name.clone(), self.kind.to_string()];
        if !flags.is_empty() || self.group.is_some() {
            words.push(list::format::join(&flags, " ", None));
        }
        if let Some(g) = self.group {
            words.push(g.to_string());
        }
        list::format::join(&words, " ", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_with_everything() {
        let d = OptionDef::from_spec("-level integer {nocase unsafe} 2").unwrap();
        assert_eq!(d.name(), "-level");
        assert_eq!(d.kind(), &ValueKind::Integer);
        assert!(d.must_have_value());
        assert!(d.is_no_case());
        assert!(d.is_unsafe());
        assert_eq!(d.group(), Some(2));
        assert_eq!(d.to_spec(), "-level integer {NoCase Unsafe} 2");
    }

    #[test]
    fn bare_name_takes_no_value() {
        let d = OptionDef::from_spec("-force").unwrap();
        assert!(!d.must_have_value());
        assert_eq!(d.to_spec(), "-force none");
    }

    #[test]
    fn double_dash_is_end_of_options() {
        assert!(OptionDef::from_spec("--").unwrap().is_end_of_options());
        assert!(OptionDef::end_of_options().is_end_of_options());
        assert!(OptionDef::list_of_options().is_list_of_options());
    }

    #[test]
    fn spec_errors() {
        assert!(matches!(OptionDef::from_spec(""), Err(OptionError::IncompleteSpec { .. })));
        assert!(matches!(OptionDef::from_spec("-a none present"), Err(OptionError::UnknownFlag { .. })));
        assert!(matches!(OptionDef::from_spec("-a none {} -1"), Err(OptionError::BadGroup { .. })));
        assert!(matches!(OptionDef::from_spec("-a none {} 1 x"), Err(OptionError::ExtraSpecWords { .. })));
        assert!(matches!(OptionDef::from_spec("-a real"), Err(OptionError::UnknownKind { .. })));
    }

    #[test]
    fn presence_checks() {
        let d = OptionDef::new("-x").with_flags(OptionFlags::DISABLED);
        assert_eq!(d.can_be_present().unwrap_err().to_string(), "option \"-x\" is disabled");
        let d = OptionDef::new("-x").with_flags(OptionFlags::UNSUPPORTED | OptionFlags::DISABLED);
        assert_eq!(
            d.can_be_present().unwrap_err().to_string(),
            "option \"-x\" not supported for this platform"
        );
        assert!(OptionDef::new("-x").can_be_present().is_ok());
    }

    #[test]
    fn mark_and_clear() {
        let mut d = OptionDef::new("-v").with_kind(ValueKind::String);
        d.mark(true, Some(3), Some(Value::Str("x".into())));
        assert!(d.is_present());
        assert_eq!(d.index(), Some(3));
        assert_eq!(d.present_value(), Some(&Value::Str("x".into())));
        d.mark(false, None, None);
        assert!(!d.is_present());
        assert_eq!(d.value(), None);
    }
}
