//! Scanning an argument list against an [`OptionSet`].

use log::trace;

use crate::error::{Error, OptionError};
use crate::options::set::{OptionSet, ScanSettings};

impl OptionSet {
    /// Consume leading options from `args[first..]`, marking each one
    /// present.
    ///
    /// Scanning stops at the first token that does not start with `-`, at
    /// an unknown name when `settings.strict` is off, or after the
    /// end-of-options token (which is consumed).  Returns the index of the
    /// first positional argument.
    pub fn parse_options<S: AsRef<str>>(
        &mut self,
        args: &[S],
        first: usize,
        settings: &ScanSettings,
    ) -> Result<usize, Error> {
        let mut i = first;
        while i < args.len() {
            let arg = args[i].as_ref();
            if !arg.starts_with('-') {
                break;
            }
            let Some(option) = self.resolve_with(arg, settings)? else {
                trace!(target: "tclish::options", "\"{arg}\" is not an option, stopping at {i}");
                break;
            };
            if option.is_list_of_options() {
                return Err(OptionError::Listing(self.list_options(settings.allow_unsafe)).into());
            }
            option.can_be_present()?;

            let name = option.name().to_owned();
            let at = i;
            let value = if option.must_have_value() {
                i += 1;
                let Some(text) = args.get(i).map(AsRef::as_ref) else {
                    return Err(OptionError::MissingValue { name }.into());
                };
                let converted = option.kind().convert(text, option.is_strict()).ok_or_else(|| {
                    OptionError::BadValue {
                        name: name.clone(),
                        value: text.to_owned(),
                        expected: option.kind().expected(),
                    }
                })?;
                Some(converted)
            } else {
                None
            };
            let ignored = option.is_ignored();
            let end = option.is_end_of_options();
            i += 1;

            if !ignored {
                self.set_present(&name, true, Some(at), value);
            }
            if end {
                break;
            }
        }
        Ok(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::options::def::OptionDef;
    use crate::options::flags::OptionFlags;
    use crate::options::value::{Value, ValueKind};

    fn options() -> OptionSet {
        OptionSet::from_list(
            "{-count integer} {-name string} -force -format {-old none disabled} \
             {-quiet none ignored} {-mode {enum fast slow}} --",
        )
        .unwrap()
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn options_then_positionals() {
        let mut s = options();
        let a = args(&["-count", "3", "-forc", "file", "-name", "x"]);
        let next = s.parse_options(&a, 0, &ScanSettings::default()).unwrap();
        assert_eq!(next, 3);
        assert_eq!(s.value_of("-count"), Some(&Value::Int(3)));
        assert_eq!(s.index_of("-force"), Some(2));
        assert!(!s.has("-name", false));
    }

    #[test]
    fn end_of_options_is_consumed() {
        let mut s = options();
        let a = args(&["cmd", "-force", "--", "-count"]);
        let next = s.parse_options(&a, 1, &ScanSettings::default()).unwrap();
        assert_eq!(next, 3);
        assert!(s.has("--", false));
        assert_eq!(s.to_argument_list().unwrap().to_canonical(), "-force --");
    }

    #[test]
    fn value_errors() {
        let mut s = options();
        let err = s.parse_options(&args(&["-count"]), 0, &ScanSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "value for \"-count\" missing");

        let err = s.parse_options(&args(&["-count", "many"]), 0, &ScanSettings::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad value for option \"-count\": expected integer but got \"many\""
        );

        let err = s.parse_options(&args(&["-mode", "medium"]), 0, &ScanSettings::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad value for option \"-mode\": expected one of fast or slow but got \"medium\""
        );
    }

    #[test]
    fn resolution_errors_propagate() {
        let mut s = options();
        let err = s.parse_options(&args(&["-fo"]), 0, &ScanSettings::default()).unwrap_err();
        assert!(matches!(err, Error::Resolve(ResolveError::Ambiguous { .. })));
        let err = s.parse_options(&args(&["-old"]), 0, &ScanSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "option \"-old\" is disabled");
    }

    #[test]
    fn lenient_scan_stops_at_unknown() {
        let mut s = options();
        let lenient = ScanSettings {
            strict: false,
            ..ScanSettings::default()
        };
        let next = s.parse_options(&args(&["-force", "-bogus", "-format"]), 0, &lenient).unwrap();
        assert_eq!(next, 1);
        assert!(!s.has("-format", false));
    }

    #[test]
    fn ignored_options_consume_but_do_not_mark() {
        let mut s = options();
        let next = s.parse_options(&args(&["-quiet", "-force"]), 0, &ScanSettings::default()).unwrap();
        assert_eq!(next, 2);
        assert!(!s.has("-quiet", false));
    }

    #[test]
    fn listing_token() {
        let mut s = OptionSet::new();
        s.register(OptionDef::new("-b")).unwrap();
        s.register(OptionDef::new("-a")).unwrap();
        s.register(OptionDef::new("-hidden").with_flags(OptionFlags::UNSAFE)).unwrap();
        let err = s.parse_options(&args(&["---"]), 0, &ScanSettings::default()).unwrap_err();
        assert!(matches!(err, Error::Option(OptionError::Listing(_))));
        assert_eq!(err.to_string(), "available options are ---, -a, or -b");

        // without a registered `--`, the token is a bad option, not `---`
        let err = s.parse_options(&args(&["--", "x"]), 0, &ScanSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "bad option \"--\": must be ---, -a, or -b");
    }

    #[test]
    fn nocase_scan() {
        let mut s = OptionSet::empty();
        s.register(OptionDef::new("-Level").with_kind(ValueKind::Wide)).unwrap();
        let nocase = ScanSettings {
            nocase: true,
            ..ScanSettings::default()
        };
        assert_eq!(s.parse_options(&["-lev", "0x10"], 0, &nocase).unwrap(), 2);
        assert_eq!(s.value_of("-Level"), Some(&Value::Wide(16)));
    }
}
