//! Pattern matching: Tcl glob, regex, and exact modes.
//!
//! ## Match modes
//!
//! | Mode | Description |
//! |------|-------------|
//! | [`MatchMode::Glob`]   | Tcl `string match` (`*`, `?`, `[…]`, `\x`) |
//! | [`MatchMode::Regexp`] | [`regex`] crate, unanchored search |
//! | [`MatchMode::Exact`]  | whole-string equality |
//!
//! Every mode takes an explicit `nocase` flag.

use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

// ── Public types ─────────────────────────────────────────────────────────────

/// Which matching algorithm a [`Pattern`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Glob,
    Regexp,
    Exact,
}

/// Error returned when a pattern cannot be compiled.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("couldn't compile regular expression pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

// Arc wrapper makes Clone a reference-count increment instead of a recompile.
#[derive(Clone)]
enum Compiled {
    Regex(Arc<Regex>),
    Glob,
    Exact,
}

/// A compiled pattern ready for matching.
#[derive(Clone)]
pub struct Pattern {
    src: String,
    mode: MatchMode,
    nocase: bool,
    compiled: Compiled,
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("src", &self.src)
            .field("mode", &self.mode)
            .field("nocase", &self.nocase)
            .finish()
    }
}

impl Pattern {
    /// Compile `src` using `mode`.
    ///
    /// Only [`MatchMode::Regexp`] can fail; glob syntax has no invalid forms
    /// (a malformed class simply never matches).
    pub fn new(src: &str, mode: MatchMode, nocase: bool) -> Result<Self, PatternError> {
        let compiled = match mode {
            MatchMode::Regexp => Compiled::Regex(Arc::new(
                regex::RegexBuilder::new(src)
                    .case_insensitive(nocase)
                    .build()?,
            )),
            MatchMode::Glob => Compiled::Glob,
            MatchMode::Exact => Compiled::Exact,
        };
        Ok(Self {
            src: src.to_owned(),
            mode,
            nocase,
            compiled,
        })
    }

    /// Shorthand for a glob pattern.
    pub fn glob(src: &str, nocase: bool) -> Self {
        Self {
            src: src.to_owned(),
            mode: MatchMode::Glob,
            nocase,
            compiled: Compiled::Glob,
        }
    }

    /// The original source string.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn nocase(&self) -> bool {
        self.nocase
    }

    /// Returns `true` if this pattern matches `text`.
    pub fn matches(&self, text: &str) -> bool {
        match &self.compiled {
            Compiled::Regex(re) => re.is_match(text),
            Compiled::Glob => string_match(text, &self.src, self.nocase),
            Compiled::Exact => {
                if self.nocase {
                    text.chars().map(fold).eq(self.src.chars().map(fold))
                } else {
                    text == self.src
                }
            }
        }
    }
}

// ── Glob matching ─────────────────────────────────────────────────────────────
//
// Tcl `string match` rules:
//   *       : any sequence of characters, including none
//   ?       : any single character
//   [...]   : one character from the set; `a-z` ranges may be given in
//             either order; there is no negation
//   \x      : literal x
// A class that is still open at the end of the pattern extends to the end;
// an empty class `[]` or a trailing `\` can never match.

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Star,
    Any,
    Literal(char),
    Class(Vec<(char, char)>),
    /// Never matches.
    Fail,
}

/// Lowercase a single character the way `-nocase` comparisons fold it.
#[inline]
pub(crate) fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn tokenize(pattern: &str, nocase: bool) -> Vec<Token> {
    let f = |c: char| if nocase { fold(c) } else { c };
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        let tok = match c {
            '*' => {
                // Collapse runs; `**` behaves as `*`.
                if tokens.last() == Some(&Token::Star) {
                    continue;
                }
                Token::Star
            }
            '?' => Token::Any,
            '\\' => match chars.next() {
                Some(lit) => Token::Literal(f(lit)),
                None => Token::Fail,
            },
            '[' => {
                let mut ranges = Vec::new();
                while let Some(start) = chars.next() {
                    if start == ']' {
                        break;
                    }
                    if chars.peek() == Some(&'-') {
                        chars.next();
                        match chars.next() {
                            Some(end) => ranges.push((f(start), f(end))),
                            None => ranges.push((f(start), f(start))),
                        }
                    } else {
                        ranges.push((f(start), f(start)));
                    }
                }
                if ranges.is_empty() {
                    Token::Fail
                } else {
                    Token::Class(ranges)
                }
            }
            other => Token::Literal(f(other)),
        };
        tokens.push(tok);
    }
    tokens
}

fn token_matches(tok: &Token, c: char) -> bool {
    match tok {
        Token::Any => true,
        Token::Literal(l) => *l == c,
        Token::Class(ranges) => ranges
            .iter()
            .any(|&(a, b)| (a <= c && c <= b) || (b <= c && c <= a)),
        Token::Star | Token::Fail => false,
    }
}

/// Tcl `string match`: does `text` match glob `pattern`?
///
/// Uses single-point backtracking on the most recent `*`, so the cost is
/// bounded by `O(len(text) * len(pattern))`.
pub fn string_match(text: &str, pattern: &str, nocase: bool) -> bool {
    let tokens = tokenize(pattern, nocase);
    let text: Vec<char> = if nocase {
        text.chars().map(fold).collect()
    } else {
        text.chars().collect()
    };

    let (mut t, mut p) = (0usize, 0usize);
    // (pattern index after the star, text index the star currently covers up to)
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Star) => {
                p += 1;
                if p == tokens.len() {
                    return true;
                }
                backtrack = Some((p, t));
            }
            Some(tok) if token_matches(tok, text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((bp, bt)) => {
                    p = bp;
                    t = bt + 1;
                    backtrack = Some((bp, bt + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|tok| *tok == Token::Star)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- Regex ----------------------------------------------------------------

    #[test]
    fn regex_basic_match() {
        let p = Pattern::new("hel+o", MatchMode::Regexp, false).unwrap();
        assert!(p.matches("say hello world"));
        assert!(!p.matches("HELLO"));
    }

    #[test]
    fn regex_nocase() {
        let p = Pattern::new("hello", MatchMode::Regexp, true).unwrap();
        assert!(p.matches("HELLO"));
    }

    #[test]
    fn regex_invalid() {
        assert!(matches!(
            Pattern::new("(", MatchMode::Regexp, false),
            Err(PatternError::InvalidRegex(_))
        ));
    }

    // -- Exact ----------------------------------------------------------------

    #[test]
    fn exact_mode() {
        let p = Pattern::new("Hello", MatchMode::Exact, false).unwrap();
        assert!(p.matches("Hello"));
        assert!(!p.matches("hello"));
        let p = Pattern::new("Hello", MatchMode::Exact, true).unwrap();
        assert!(p.matches("hELLO"));
        assert!(!p.matches("hello world"));
    }

    // -- Glob ----------------------------------------------------------------

    #[test]
    fn glob_star_matches_anything() {
        assert!(string_match("hello world", "*", false));
        assert!(string_match("", "*", false));
        assert!(string_match("abc", "**", false));
    }

    #[test]
    fn empty_glob_matches_only_empty() {
        assert!(string_match("", "", false));
        assert!(!string_match("x", "", false));
    }

    #[test]
    fn glob_question_mark() {
        assert!(string_match("hello", "h?llo", false));
        assert!(!string_match("hllo", "h?llo", false));
    }

    #[test]
    fn glob_case_sensitivity_is_explicit() {
        assert!(!string_match("HELLO", "hello", false));
        assert!(string_match("HELLO", "hello", true));
        assert!(!string_match("Straße", "STRASSE", true));
    }

    #[test]
    fn glob_star_prefix_suffix() {
        assert!(string_match("hello world!", "*world*", false));
        assert!(!string_match("hello earth!", "*world*", false));
        assert!(string_match("abcbc", "a*bc", false));
        assert!(string_match("mississippi", "*sip*", false));
    }

    #[test]
    fn glob_character_class() {
        assert!(string_match("once", "[aeiou]nce", false));
        assert!(!string_match("bnce", "[aeiou]nce", false));
        assert!(string_match("hello", "[a-z]ello", false));
        assert!(string_match("hello", "[z-a]ello", false));
        assert!(!string_match("1ello", "[a-z]ello", false));
        assert!(string_match("Hello", "[a-z]ello", true));
    }

    #[test]
    fn glob_malformed_classes() {
        assert!(!string_match("a", "[]", false));
        // An unclosed class runs to the end of the pattern.
        assert!(string_match("b", "[abc", false));
    }

    #[test]
    fn glob_escape() {
        assert!(string_match("a*b", r"a\*b", false));
        assert!(!string_match("axb", r"a\*b", false));
        assert!(!string_match("a", "a\\", false));
    }

    #[test]
    fn glob_pathological_pattern_is_fast() {
        let pattern = "*a".repeat(20) + "b";
        let text = "a".repeat(200);
        assert!(!string_match(&text, &pattern, false));
    }

    #[test]
    fn glob_non_ascii() {
        assert!(string_match("naïve", "na?ve", false));
        assert!(string_match("ÉCOLE", "école", true));
    }
}
