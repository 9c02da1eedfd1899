//! Option behaviour flags.
//!
//! An [`OptionFlags`] value packs every per-option switch into one `u32`.
//! Flags set by the caller when registering an option live in the low
//! bits; `PRESENT` is runtime state owned by the scanner.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Per-option flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptionFlags(u32);

impl OptionFlags {
    pub const NONE: Self = Self(0);

    // ── Definition flags ──────────────────────────────────────────────────
    /// The option consumes the following argument as its value.
    pub const MUST_HAVE_VALUE: Self = Self(0x0001);
    /// `--`: stops option scanning; always emitted last.
    pub const END_OF_OPTIONS: Self  = Self(0x0002);
    /// `---`: asks for the list of available options.
    pub const LIST_OF_OPTIONS: Self = Self(0x0004);
    /// Name matching for this option ignores case.
    pub const NO_CASE: Self         = Self(0x0008);
    /// Hidden from diagnostics unless the caller allows unsafe names.
    pub const UNSAFE: Self          = Self(0x0010);
    /// Accepted and scanned, but never recorded as present.
    pub const IGNORED: Self         = Self(0x0020);
    pub const DISABLED: Self        = Self(0x0040);
    pub const UNSUPPORTED: Self     = Self(0x0080);
    /// Values must convert exactly (no surrounding whitespace).
    pub const STRICT: Self          = Self(0x0100);
    /// Registered by the set itself rather than by the caller.
    pub const SYSTEM: Self          = Self(0x0200);

    // ── Runtime state ─────────────────────────────────────────────────────
    pub const PRESENT: Self         = Self(0x1000_0000);

    /// Every named flag, in display order.
    const NAMED: [(&'static str, Self); 11] = [
        ("MustHaveValue", Self::MUST_HAVE_VALUE),
        ("EndOfOptions", Self::END_OF_OPTIONS),
        ("ListOfOptions", Self::LIST_OF_OPTIONS),
        ("NoCase", Self::NO_CASE),
        ("Unsafe", Self::UNSAFE),
        ("Ignored", Self::IGNORED),
        ("Disabled", Self::DISABLED),
        ("Unsupported", Self::UNSUPPORTED),
        ("Strict", Self::STRICT),
        ("System", Self::SYSTEM),
        ("Present", Self::PRESENT),
    ];

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Look up a flag by name, ignoring case (`"nocase"`, `"NoCase"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, f)| f)
    }

    /// Names of the flags set in `self`.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|&&(_, f)| self.contains(f))
            .map(|&(n, _)| n)
            .collect()
    }
}

impl BitOr for OptionFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OptionFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OptionFlags {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for OptionFlags {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for OptionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}
