//! Elements → canonical list text.
//!
//! Each element is emitted in one of three shapes, picked by [`scan`]:
//! bare when nothing in it is special, brace-quoted when braces suffice,
//! backslash-escaped when braces cannot carry it (unbalanced braces, a
//! trailing backslash, or an embedded backslash-newline).

use crate::list::parse::is_list_space;
use crate::pattern::Pattern;

/// How a single element must be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Bare,
    Braces,
    Backslash,
}

/// Decide how `element` must be quoted.
///
/// `first` is `true` for the first emitted element (a leading `#` would be
/// read as a comment there).  `separator` is the join separator; any of its
/// non-whitespace characters also force quoting.
pub fn scan(element: &str, first: bool, separator: &str) -> Quoting {
    if element.is_empty() {
        return Quoting::Braces;
    }

    let mut needs_quote = element.starts_with(['{', '"']) || (first && element.starts_with('#'));
    let mut force_escape = false;
    let mut depth: i64 = 0;

    let mut chars = element.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                needs_quote = true;
                depth += 1;
            }
            '}' => {
                needs_quote = true;
                depth -= 1;
                if depth < 0 {
                    force_escape = true;
                }
            }
            '[' | '$' | ';' => needs_quote = true,
            '\\' => {
                needs_quote = true;
                match chars.next() {
                    None | Some('\n') => force_escape = true,
                    Some(_) => {}
                }
            }
            c if is_list_space(c) => needs_quote = true,
            c if separator.contains(c) => needs_quote = true,
            _ => {}
        }
    }

    if depth != 0 {
        force_escape = true;
    }
    match (needs_quote, force_escape) {
        (false, _) => Quoting::Bare,
        (true, false) => Quoting::Braces,
        (true, true) => Quoting::Backslash,
    }
}

/// Append `element` to `out` quoted as `mode` requires.
pub fn convert(element: &str, mode: Quoting, first: bool, out: &mut String) {
    match mode {
        Quoting::Bare => out.push_str(element),
        Quoting::Braces => {
            out.push('{');
            out.push_str(element);
            out.push('}');
        }
        Quoting::Backslash => {
            if first && element.starts_with('#') {
                out.push('\\');
            }
            for c in element.chars() {
                match c {
                    '{' | '}' | '[' | ']' | '$' | ';' | ' ' | '\\' | '"' => {
                        out.push('\\');
                        out.push(c);
                    }
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\x0b' => out.push_str("\\v"),
                    '\x0c' => out.push_str("\\f"),
                    _ => out.push(c),
                }
            }
        }
    }
}

/// Quote a single element so that it parses back as exactly one element.
pub fn quote(element: &str) -> String {
    let mut out = String::with_capacity(element.len() + 2);
    convert(element, scan(element, true, " "), true, &mut out);
    out
}

/// Join `elements` into list text.
///
/// Only elements accepted by `filter` (if any) are emitted.  Quoting is
/// decided per emitted element, so a filtered-out first element does not
/// affect `#` handling of the next one.
pub fn join<I, S>(elements: I, separator: &str, filter: Option<&Pattern>) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    let mut first = true;
    for element in elements {
        let element = element.as_ref();
        if let Some(p) = filter {
            if !p.matches(element) {
                continue;
            }
        }
        if !first {
            out.push_str(separator);
        }
        convert(element, scan(element, first, separator), first, &mut out);
        first = false;
    }
    out
}

/// Join `elements` verbatim, with no quoting at all.
pub fn raw_join<I, S>(elements: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, element) in elements.into_iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(element.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::parse::split;
    use crate::pattern::MatchMode;

    fn fmt(elements: &[&str]) -> String {
        join(elements, " ", None)
    }

    #[test]
    fn bare_elements_stay_bare() {
        assert_eq!(fmt(&["a", "b", "c"]), "a b c");
        assert_eq!(fmt(&["x#", "a\"b"]), "x# a\"b");
    }

    #[test]
    fn empty_element_and_empty_list() {
        assert_eq!(fmt(&[""]), "{}");
        assert_eq!(fmt(&[]), "");
        assert_eq!(fmt(&["a", ""]), "a {}");
    }

    #[test]
    fn braces_for_whitespace_and_specials() {
        assert_eq!(fmt(&["a b"]), "{a b}");
        assert_eq!(fmt(&["a\tb"]), "{a\tb}");
        assert_eq!(fmt(&["$x"]), "{$x}");
        assert_eq!(fmt(&["[cmd]"]), "{[cmd]}");
        assert_eq!(fmt(&["a;b"]), "{a;b}");
        assert_eq!(fmt(&["a {b} c"]), "{a {b} c}");
        assert_eq!(fmt(&["{x}"]), "{{x}}");
        assert_eq!(fmt(&["\"q"]), "{\"q}");
        assert_eq!(fmt(&[r"a\nb"]), r"{a\nb}");
    }

    #[test]
    fn leading_hash_only_quoted_first() {
        assert_eq!(fmt(&["#x", "#y"]), "{#x} #y");
    }

    #[test]
    fn backslash_when_braces_cannot_help() {
        assert_eq!(fmt(&["{"]), r"\{");
        assert_eq!(fmt(&["}a{"]), r"\}a\{");
        assert_eq!(fmt(&["a b{"]), r"a\ b\{");
        assert_eq!(fmt(&["a\\"]), r"a\\");
        assert_eq!(fmt(&["a\\\nb"]), r"a\\\nb");
        assert_eq!(fmt(&["#{"]), r"\#\{");
    }

    #[test]
    fn separator_characters_force_quoting() {
        assert_eq!(join(["a,b", "c"], ",", None), "{a,b},c");
        assert_eq!(join(["a", "b"], ", ", None), "a, b");
    }

    #[test]
    fn filter_skips_elements() {
        let p = Pattern::new("a*", MatchMode::Glob, false).unwrap();
        assert_eq!(join(["abc", "b c", "a d"], " ", Some(&p)), "abc {a d}");
    }

    #[test]
    fn quoting_round_trips() {
        for e in ["", "a b", "{", "}", "a\\", "\\{", "#", "x\ny", "\"", "a}b{c", "é ü"] {
            let text = quote(e);
            assert_eq!(split(&text).unwrap(), [e], "element {e:?} quoted as {text:?}");
        }
    }

    #[test]
    fn raw_join_does_not_quote() {
        assert_eq!(raw_join(["a b", "c"], "|"), "a b|c");
    }
}
