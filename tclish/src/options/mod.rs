//! Command option binding.
//!
//! An [`OptionSet`] holds named options ([`OptionDef`]).  Caller-supplied
//! names resolve by exact match first, then by unique prefix:
//!
//! | Requested | Registered                  | Result |
//! |-----------|-----------------------------|--------|
//! | `-verbose` | `-verbose`, `-verboseLevel` | `-verbose` (exact wins) |
//! | `-f`       | `-force`, `-nocase`         | `-force` |
//! | `-fo`      | `-force`, `-format`         | ambiguous |
//! | `-q`       | `-force`, `-format`         | unknown (strict) / no-op |
//!
//! [`OptionSet::parse_options`] scans an argument list, converting values
//! according to each option's [`ValueKind`].  Options sharing a group are
//! mutually exclusive.

pub mod def;
pub mod flags;
pub mod message;
mod scan;
pub mod set;
pub mod value;

pub use def::{OptionDef, END_OF_OPTIONS, LIST_OF_OPTIONS};
pub use flags::OptionFlags;
pub use message::to_english;
pub use set::{OptionSet, Presence, ScanSettings};
pub use value::{Value, ValueKind};
