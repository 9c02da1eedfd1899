//! Natural-language diagnostics for option lookup.

use crate::options::def::OptionDef;

/// Join words the way an English sentence lists alternatives:
/// `a`, `a or b`, `a, b, or c`.
pub fn to_english<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    match items.as_slice() {
        [] => String::new(),
        [one] => one.as_ref().to_owned(),
        [a, b] => format!("{} or {}", a.as_ref(), b.as_ref()),
        [init @ .., last] => {
            let mut out = String::new();
            for item in init {
                out.push_str(item.as_ref());
                out.push_str(", ");
            }
            out.push_str("or ");
            out.push_str(last.as_ref());
            out
        }
    }
}

/// Sorted option names, leaving out unsafe ones unless `allow_unsafe`.
pub(crate) fn visible_names<'a, I>(options: I, allow_unsafe: bool) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a OptionDef>,
{
    let mut names: Vec<&str> = options
        .into_iter()
        .filter(|o| allow_unsafe || !o.is_unsafe())
        .map(OptionDef::name)
        .collect();
    names.sort_unstable();
    names
}

pub(crate) fn bad_option(name: &str, available: &[&str]) -> String {
    format!("bad option \"{name}\": must be {}", to_english(available))
}

pub(crate) fn ambiguous_option(name: &str, candidates: &[&str]) -> String {
    format!("ambiguous option \"{name}\": must be {}", to_english(candidates))
}

pub(crate) fn list_options(available: &[&str]) -> String {
    format!("available options are {}", to_english(available))
}
