//! The option registry: registration, name resolution, presence.

use std::collections::HashMap;

use log::debug;

use crate::error::{DuplicateOption, Error, OptionError, ResolveError};
use crate::list::{self, List};
use crate::options::def::{OptionDef, LIST_OF_OPTIONS};
use crate::options::message;
use crate::options::value::Value;
use crate::pattern::{fold, Pattern};

/// Defaults applied while resolving names and scanning argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Unknown names are errors rather than the end of the options.
    pub strict: bool,
    /// Name matching ignores case for every option.
    pub nocase: bool,
    /// Unsafe option names may appear in diagnostics.
    pub allow_unsafe: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            strict: true,
            nocase: false,
            allow_unsafe: false,
        }
    }
}

/// What [`OptionSet::is_present`] reports for a present option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presence<'a> {
    /// The option's value, when it takes one.
    pub value: Option<&'a Value>,
    /// Argument index of the option name, when it came from a scan.
    pub index: Option<usize>,
}

/// A set of named options, kept in registration order.
#[derive(Debug, Clone)]
pub struct OptionSet {
    options: Vec<OptionDef>,
    by_name: HashMap<String, usize>,
    strict: bool,
}

fn starts_with_nocase(key: &str, prefix: &str) -> bool {
    let mut key = key.chars();
    prefix
        .chars()
        .all(|p| key.next().is_some_and(|k| fold(k) == fold(p)))
}

fn eq_nocase(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && starts_with_nocase(a, b)
}

impl OptionSet {
    /// A set holding only the `---` list-of-options entry.
    pub fn new() -> Self {
        let mut set = Self::empty();
        set.options.push(OptionDef::list_of_options());
        set.by_name.insert(LIST_OF_OPTIONS.to_owned(), 0);
        set
    }

    /// A set with nothing registered.
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
            by_name: HashMap::new(),
            strict: true,
        }
    }

    /// Build a set from a list of option specifications
    /// (`name ?kind? ?flags? ?group?` each).
    pub fn from_list(text: &str) -> Result<Self, Error> {
        let mut set = Self::new();
        for spec in list::split(text)? {
            let option = OptionDef::from_spec(&spec)?;
            if option.name() == LIST_OF_OPTIONS {
                set.replace(option)?;
            } else {
                set.register(option)?;
            }
        }
        Ok(set)
    }

    /// Whether [`is_present`](Self::is_present) reports unknown names.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Add `option`.  Fails when the name is taken or when a second
    /// end-of-options option would be registered.
    pub fn register(&mut self, option: OptionDef) -> Result<(), DuplicateOption> {
        if self.by_name.contains_key(option.name()) {
            return Err(DuplicateOption::Name { name: option.name().to_owned() });
        }
        self.check_end_of_options(&option)?;
        self.by_name.insert(option.name().to_owned(), self.options.len());
        self.options.push(option);
        Ok(())
    }

    /// Add `option` unless its name is already registered.  Returns whether
    /// it was added.
    pub fn maybe_add(&mut self, option: OptionDef) -> Result<bool, DuplicateOption> {
        if self.by_name.contains_key(option.name()) {
            return Ok(false);
        }
        self.register(option).map(|()| true)
    }

    /// Overwrite the definition registered under `option`'s name, keeping
    /// its position, or add it when the name is new.  Returns the previous
    /// definition.
    pub fn replace(&mut self, option: OptionDef) -> Result<Option<OptionDef>, DuplicateOption> {
        let Some(&i) = self.by_name.get(option.name()) else {
            self.register(option)?;
            return Ok(None);
        };
        self.check_end_of_options(&option)?;
        Ok(Some(std::mem::replace(&mut self.options[i], option)))
    }

    fn check_end_of_options(&self, option: &OptionDef) -> Result<(), DuplicateOption> {
        if !option.is_end_of_options() {
            return Ok(());
        }
        match self
            .options
            .iter()
            .find(|o| o.is_end_of_options() && o.name() != option.name())
        {
            Some(existing) => Err(DuplicateOption::EndOfOptions {
                name: option.name().to_owned(),
                existing: existing.name().to_owned(),
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Options in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionDef> {
        self.options.iter()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.by_name.get(name).map(|&i| &self.options[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve `name` with unsafe names hidden from diagnostics.
    ///
    /// See [`resolve_with`](Self::resolve_with).
    pub fn resolve(&self, name: &str, strict: bool, nocase: bool) -> Result<Option<&OptionDef>, ResolveError> {
        let settings = ScanSettings {
            strict,
            nocase,
            allow_unsafe: false,
        };
        self.resolve_with(name, &settings)
    }

    /// Map a caller-supplied name onto a registered option.
    ///
    /// An exact match always wins, even when `name` is also a prefix of
    /// other options.  Otherwise a unique prefix match is accepted.  An
    /// option flagged `NO_CASE` matches case-insensitively even when
    /// `settings.nocase` is off.  The empty name is only ever an exact
    /// match.  With `settings.strict` off an unknown name yields
    /// `Ok(None)`.
    pub fn resolve_with(&self, name: &str, settings: &ScanSettings) -> Result<Option<&OptionDef>, ResolveError> {
        if let Some(&i) = self.by_name.get(name) {
            return Ok(Some(&self.options[i]));
        }

        let mut exact = None;
        let mut matches = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            let key = option.name();
            let nocase = settings.nocase || option.is_no_case();
            let hit = if nocase {
                starts_with_nocase(key, name)
            } else {
                key.starts_with(name)
            };
            if !hit {
                continue;
            }
            let is_exact = if nocase { eq_nocase(key, name) } else { key == name };
            if !is_exact && option.is_list_of_options() {
                continue;
            }
            if is_exact && exact.is_none() {
                exact = Some(i);
            }
            if is_exact || !name.is_empty() {
                matches.push(i);
            }
        }

        if let Some(i) = exact {
            return Ok(Some(&self.options[i]));
        }
        match matches.as_slice() {
            [only] => Ok(Some(&self.options[*only])),
            [] if settings.strict => Err(ResolveError::Unknown {
                name: name.to_owned(),
                message: self.bad_option(name, settings.allow_unsafe),
            }),
            [] => Ok(None),
            many => {
                let candidates =
                    message::visible_names(many.iter().map(|&i| &self.options[i]), settings.allow_unsafe);
                Err(ResolveError::Ambiguous {
                    name: name.to_owned(),
                    message: message::ambiguous_option(name, &candidates),
                    candidates: candidates.into_iter().map(str::to_owned).collect(),
                })
            }
        }
    }

    // ── Presence ──────────────────────────────────────────────────────────

    /// Report whether `name` is present.
    ///
    /// With `nocase` every option whose name starts with `name`, ignoring
    /// case, is a candidate in registration order and the first present one
    /// wins; the empty name only matches an empty option name.  Otherwise
    /// the name must match exactly.
    pub fn is_present(&self, name: &str, nocase: bool) -> Option<Presence<'_>> {
        let found = if nocase {
            let mut known = false;
            let hit = self.options.iter().find(|o| {
                let same = if name.is_empty() {
                    o.name().is_empty()
                } else {
                    starts_with_nocase(o.name(), name)
                };
                known |= same;
                same && o.is_present()
            });
            if hit.is_none() && !known {
                self.report_unknown(name);
            }
            hit
        } else {
            match self.get(name) {
                Some(o) => Some(o).filter(|o| o.is_present()),
                None => {
                    self.report_unknown(name);
                    None
                }
            }
        };
        found.map(|o| Presence {
            value: o.present_value(),
            index: o.index(),
        })
    }

    /// Presence only; a value the option carries is dropped.
    pub fn has(&self, name: &str, nocase: bool) -> bool {
        match self.is_present(name, nocase) {
            Some(p) => {
                if p.value.is_some() {
                    debug!(target: "tclish::options", "option \"{name}\" value will be discarded by caller");
                }
                true
            }
            None => false,
        }
    }

    fn report_unknown(&self, name: &str) {
        if self.strict {
            debug!(target: "tclish::options", "is_present: {}", self.bad_option(name, true));
        }
    }

    /// Mark `name` present (or not).  Other options in the same group
    /// stop being present.  Returns `false` when `name` is not registered.
    pub fn set_present(&mut self, name: &str, present: bool, index: Option<usize>, value: Option<Value>) -> bool {
        let Some(&i) = self.by_name.get(name) else {
            return false;
        };
        self.options[i].mark(present, index, value);
        if let Some(group) = self.options[i].group() {
            for (j, other) in self.options.iter_mut().enumerate() {
                if j != i && other.group() == Some(group) {
                    other.unmark();
                }
            }
        }
        true
    }

    /// Forget every option's presence.
    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.clear();
        }
    }

    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|o| o.is_present()).and_then(OptionDef::present_value)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.get(name).filter(|o| o.is_present()).and_then(OptionDef::index)
    }

    // ── Output ────────────────────────────────────────────────────────────

    /// Present options as an argument list: each name followed by its value
    /// when it takes one, in registration order, with the end-of-options
    /// option last.
    pub fn to_argument_list(&self) -> Result<List, OptionError> {
        let mut args = List::new();
        let mut end = None;
        for option in &self.options {
            if option.is_ignored() || option.is_list_of_options() {
                continue;
            }
            if option.is_end_of_options() {
                end = Some(option);
                continue;
            }
            Self::emit(option, &mut args)?;
        }
        if let Some(option) = end {
            Self::emit(option, &mut args)?;
        }
        Ok(args)
    }

    fn emit(option: &OptionDef, args: &mut List) -> Result<(), OptionError> {
        if !option.is_present() {
            return Ok(());
        }
        option.can_be_present()?;
        args.push(option.name());
        if option.must_have_value() {
            args.push(option.value().map(Value::to_string).unwrap_or_default());
        }
        Ok(())
    }

    /// Registered names as list text, optionally filtered by a glob.
    pub fn to_list_string(&self, pattern: Option<&str>, nocase: bool) -> String {
        let filter = pattern.map(|p| Pattern::glob(p, nocase));
        list::format::join(self.options.iter().map(OptionDef::name), " ", filter.as_ref())
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// `bad option "x": must be ...`
    pub fn bad_option(&self, name: &str, allow_unsafe: bool) -> String {
        message::bad_option(name, &message::visible_names(&self.options, allow_unsafe))
    }

    /// `ambiguous option "x": must be ...`, listing only `candidates`.
    pub fn ambiguous_option(&self, name: &str, candidates: &[&str], allow_unsafe: bool) -> String {
        let defs = candidates.iter().filter_map(|c| self.get(c));
        message::ambiguous_option(name, &message::visible_names(defs, allow_unsafe))
    }

    /// `available options are ...`
    pub fn list_options(&self, allow_unsafe: bool) -> String {
        message::list_options(&message::visible_names(&self.options, allow_unsafe))
    }
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::new()
    }
}
