//! Command-line argument parsing and the `tclish` command itself.
//!
//! Usage:
//!   tclish [-mode list|pairs|paths|options] [-separator <sep>]
//!          [-pattern <glob> | -regexp <re>] [-nocase] [-reverse]
//!          [-translation none|unix|windows|native] [-strict <bool>]
//!          [-config <file> | -noconfig] [--] ?text ...?
//!
//! Options are resolved by the crate's own [`OptionSet`], so any unique
//! prefix works (`-sep`, `-rev`).

use std::path::PathBuf;

use directories::BaseDirs;

use crate::config::Settings;
use crate::error::Error;
use crate::list::{self, format, FormatOptions, List, PairList};
use crate::options::{OptionSet, ScanSettings, Value};
use crate::path::{PathTable, PathTranslation};
use crate::pattern::{MatchMode, Pattern};

/// Option specifications for the binary's own argument list.
const CLI_OPTIONS: &str = "\
    {-mode {enum list pairs paths options}} \
    {-separator string} \
    {-pattern string {} 0} \
    {-regexp string {} 0} \
    -nocase \
    -reverse \
    {-translation {enum none unix windows native}} \
    {-strict boolean} \
    {-config string {} 1} \
    {-noconfig none {} 1} \
    --";

// ── Public types ──────────────────────────────────────────────────────────────

/// What to do with the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the canonical list.
    #[default]
    List,
    /// Validate a name/value list; print one pair per line.
    Pairs,
    /// Load elements into an ordered path table; print its keys.
    Paths,
    /// First element is an option-spec list, the rest an argument list.
    Options,
}

/// How to choose the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Search `~/.tclishrc` then `./.tclishrc` (default).
    #[default]
    Search,
    /// `-noconfig`: load nothing.
    Skip,
    /// `-config <file>`: load this specific file.
    Explicit(PathBuf),
}

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub mode: Mode,
    /// `-separator`; falls back to the configured separator.
    pub separator: Option<String>,
    pub pattern: Option<String>,
    pub regexp: Option<String>,
    pub nocase: bool,
    pub reverse: bool,
    pub translation: Option<PathTranslation>,
    /// `-strict`; falls back to the configured default.
    pub strict: Option<bool>,
    pub config: ConfigFile,
    /// Text arguments; joined with spaces to form the input.
    pub positional: Vec<String>,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, Error> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    parse_argv(&raw)
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, Error> {
    let mut options = OptionSet::from_list(CLI_OPTIONS)?;
    let next = options.parse_options(argv, 0, &ScanSettings::default())?;

    let text = |name: &str| options.value_of(name).map(Value::to_string);
    let mut args = CliArgs {
        separator: text("-separator"),
        pattern: text("-pattern"),
        regexp: text("-regexp"),
        nocase: options.has("-nocase", false),
        reverse: options.has("-reverse", false),
        strict: options.value_of("-strict").and_then(Value::as_bool),
        positional: argv[next..].to_vec(),
        ..CliArgs::default()
    };
    args.mode = match text("-mode").as_deref() {
        Some("pairs") => Mode::Pairs,
        Some("paths") => Mode::Paths,
        Some("options") => Mode::Options,
        _ => Mode::List,
    };
    if let Some(t) = text("-translation") {
        args.translation = t.parse().ok();
    }
    if options.has("-noconfig", false) {
        args.config = ConfigFile::Skip;
    } else if let Some(path) = text("-config") {
        args.config = ConfigFile::Explicit(PathBuf::from(path));
    }
    Ok(args)
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Produce the command's output for `input`.
pub fn run(args: &CliArgs, input: &str, settings: &Settings) -> Result<String, Error> {
    let separator = args.separator.as_deref().unwrap_or(&settings.separator);
    let nocase = args.nocase || settings.nocase;
    let filter = match (&args.pattern, &args.regexp) {
        (_, Some(re)) => Some(Pattern::new(re, MatchMode::Regexp, nocase)?),
        (Some(glob), None) => Some(Pattern::glob(glob, nocase)),
        (None, None) => None,
    };

    match args.mode {
        Mode::List => {
            let mut list = List::parse(input)?;
            if args.reverse {
                list.reverse();
            }
            let options = FormatOptions::new().separator(separator).filter(filter);
            Ok(list.to_string_with(&options))
        }
        Mode::Pairs => {
            let pairs = PairList::parse(input)?;
            let mut lines: Vec<String> = pairs
                .iter()
                .filter(|(name, _)| filter.as_ref().map_or(true, |p| p.matches(name)))
                .map(|(name, value)| format::join([name, value], separator, None))
                .collect();
            if args.reverse {
                lines.reverse();
            }
            Ok(lines.join("\n"))
        }
        Mode::Paths => {
            let translation = args.translation.unwrap_or(settings.translation);
            let table: PathTable<()> = PathTable::from_paths(list::split(input)?, translation);
            let keys = table.keys_in_order(args.reverse)?;
            Ok(format::join(keys, separator, filter.as_ref()))
        }
        Mode::Options => {
            let elements = list::split(input)?;
            let Some((specs, rest)) = elements.split_first() else {
                return Ok(String::new());
            };
            let mut options = OptionSet::from_list(specs)?;
            let scan = ScanSettings {
                strict: args.strict.unwrap_or(settings.strict),
                nocase,
                ..settings.scan()
            };
            options.set_strict(scan.strict);
            let next = options.parse_options(rest, 0, &scan)?;
            let mut out = options.to_argument_list()?;
            out.extend(rest[next..].iter().map(String::as_str));
            Ok(out.to_string_with(&FormatOptions::new().separator(separator)))
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the user config file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    let home = BaseDirs::new().map(|d| d.home_dir().join(".tclishrc"));
    home.into_iter()
        .chain(std::iter::once(PathBuf::from("./.tclishrc")))
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
