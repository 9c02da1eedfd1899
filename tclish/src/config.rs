//! `.tclishrc` configuration file parser.
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | set a variable |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! Arguments to `/set` are split with the list codec, so `{...}` and
//! `"..."` quoting both work (`/set separator {, }`).
//!
//! Recognised variables feed [`Settings`]; every variable, recognised or
//! not, is kept in [`Config::vars`].

use std::path::Path;

use crate::dict::StringDictionary;
use crate::list;
use crate::options::value::parse_boolean;
use crate::options::ScanSettings;
use crate::path::PathTranslation;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Typed defaults for formatting, matching and option resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Separator used when joining list output.
    pub separator: String,
    /// Default case-insensitivity for patterns and option names.
    pub nocase: bool,
    /// Unknown option names are errors.
    pub strict: bool,
    /// Unsafe option names may appear in messages.
    pub allow_unsafe: bool,
    pub translation: PathTranslation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: list::CANONICAL_SEPARATOR.to_owned(),
            nocase: false,
            strict: true,
            allow_unsafe: false,
            translation: PathTranslation::default(),
        }
    }
}

impl Settings {
    /// Apply one variable.  Names not listed here are accepted and ignored.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), String> {
        let flag = |v: &str| parse_boolean(v).ok_or_else(|| format!("/set {name}: expected boolean but got \"{v}\""));
        match name {
            "separator" => self.separator = value.to_owned(),
            "nocase" => self.nocase = flag(value)?,
            "strict" => self.strict = flag(value)?,
            "unsafe" => self.allow_unsafe = flag(value)?,
            "translation" => self.translation = value.parse().map_err(|e| format!("/set {name}: {e}"))?,
            _ => {}
        }
        Ok(())
    }

    pub fn scan(&self) -> ScanSettings {
        ScanSettings {
            strict: self.strict,
            nocase: self.nocase,
            allow_unsafe: self.allow_unsafe,
        }
    }
}

/// Parsed configuration.
#[derive(Debug, Default)]
pub struct Config {
    pub settings: Settings,
    pub vars: StringDictionary,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string.
    ///
    /// Unknown directives are silently skipped.  Returns the config and the
    /// errors found on recognised lines; a bad line leaves earlier settings
    /// untouched.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let Some(rest) = line.strip_prefix('/') else { continue };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));

            if cmd == "set" {
                if let Err(message) = config.parse_set(args_str.trim()) {
                    errors.push(ConfigError { line: lineno, message });
                }
            }
        }

        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    fn parse_set(&mut self, args: &str) -> Result<(), String> {
        let (name, value) = split_set(args)?;
        if name.is_empty() {
            return Err("/set: variable name cannot be empty".into());
        }
        self.settings.apply(&name, &value)?;
        self.vars.insert(name, value);
        Ok(())
    }
}

// ── /set ──────────────────────────────────────────────────────────────────────

/// `name=value` takes everything after `=` verbatim; `name value ...`
/// splits as a list and rejoins the values with single spaces.
fn split_set(args: &str) -> Result<(String, String), String> {
    let tokens = list::split(args).map_err(|e| format!("/set: {e}"))?;
    let Some(first) = tokens.first() else {
        return Err("/set: requires an argument".into());
    };
    if let Some((name, _)) = first.split_once('=') {
        let value = args.split_once('=').map_or("", |(_, v)| v.trim());
        return Ok((name.to_owned(), value.to_owned()));
    }
    if tokens.len() < 2 {
        return Err(format!("/set: missing value for '{first}'"));
    }
    Ok((first.clone(), tokens[1..].join(" ")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
