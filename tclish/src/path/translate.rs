//! Path spelling normalisation for [`PathTable`](super::PathTable) keys.

use std::fmt;
use std::str::FromStr;

/// How path keys are canonicalised before every table operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathTranslation {
    /// Keys are used exactly as given.
    None,
    /// `\` becomes `/`; comparison is case-sensitive.
    Unix,
    /// `/` becomes `\`; comparison folds ASCII case.
    Windows,
    /// `Windows` on Windows hosts, `Unix` everywhere else.
    #[default]
    Native,
}

impl PathTranslation {
    /// Replace `Native` with the concrete host translation.
    pub fn resolve(self) -> Self {
        match self {
            PathTranslation::Native if cfg!(windows) => PathTranslation::Windows,
            PathTranslation::Native => PathTranslation::Unix,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathTranslation::None => "none",
            PathTranslation::Unix => "unix",
            PathTranslation::Windows => "windows",
            PathTranslation::Native => "native",
        }
    }

    fn separator(self) -> Option<char> {
        match self.resolve() {
            PathTranslation::Unix => Some('/'),
            PathTranslation::Windows => Some('\\'),
            _ => None,
        }
    }

    /// The display spelling of `path`: separators canonicalised and
    /// trailing separators trimmed (a root keeps its separator).
    pub fn translate(self, path: &str) -> String {
        let Some(sep) = self.separator() else {
            return path.to_owned();
        };
        let other = if sep == '/' { '\\' } else { '/' };
        let converted: String = path.chars().map(|c| if c == other { sep } else { c }).collect();

        let trimmed = converted.trim_end_matches(sep);
        if trimmed.len() == converted.len() {
            return converted;
        }
        if trimmed.is_empty() {
            // Nothing but separators: the root itself.
            return sep.to_string();
        }
        if sep == '\\' && is_drive(trimmed) {
            return format!("{trimmed}{sep}");
        }
        trimmed.to_owned()
    }

    /// The key used for lookups: the display spelling, case-folded when the
    /// translation compares case-insensitively.
    pub fn lookup_key(self, path: &str) -> String {
        let display = self.translate(path);
        if self.resolve() == PathTranslation::Windows {
            display.to_ascii_lowercase()
        } else {
            display
        }
    }
}

fn is_drive(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

impl fmt::Display for PathTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathTranslation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PathTranslation::None),
            "unix" => Ok(PathTranslation::Unix),
            "windows" => Ok(PathTranslation::Windows),
            "native" => Ok(PathTranslation::Native),
            _ => Err(format!(
                "bad translation \"{s}\": must be none, unix, windows, or native"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        assert_eq!(PathTranslation::None.translate("A\\b/"), "A\\b/");
        assert_eq!(PathTranslation::None.lookup_key("A"), "A");
    }

    #[test]
    fn unix_converts_backslashes_and_trims() {
        let t = PathTranslation::Unix;
        assert_eq!(t.translate("a\\b\\"), "a/b");
        assert_eq!(t.translate("/usr/lib//"), "/usr/lib");
        assert_eq!(t.translate("/"), "/");
        assert_eq!(t.translate("//"), "/");
        assert_eq!(t.lookup_key("/Usr"), "/Usr");
    }

    #[test]
    fn windows_folds_case() {
        let t = PathTranslation::Windows;
        assert_eq!(t.translate("C:/Tcl/Lib/"), "C:\\Tcl\\Lib");
        assert_eq!(t.translate("C:/"), "C:\\");
        assert_eq!(t.lookup_key("C:/Tcl/LIB"), "c:\\tcl\\lib");
        assert_eq!(t.lookup_key("c:\\tcl\\lib\\"), "c:\\tcl\\lib");
    }

    #[test]
    fn native_resolves_for_host() {
        let resolved = PathTranslation::Native.resolve();
        if cfg!(windows) {
            assert_eq!(resolved, PathTranslation::Windows);
        } else {
            assert_eq!(resolved, PathTranslation::Unix);
        }
    }

    #[test]
    fn names_round_trip() {
        for t in [
            PathTranslation::None,
            PathTranslation::Unix,
            PathTranslation::Windows,
            PathTranslation::Native,
        ] {
            assert_eq!(t.name().parse::<PathTranslation>(), Ok(t));
        }
        assert!("dos".parse::<PathTranslation>().is_err());
        assert_eq!("UNIX".parse::<PathTranslation>(), Ok(PathTranslation::Unix));
    }
}
