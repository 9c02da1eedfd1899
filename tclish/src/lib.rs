//! `tclish`: the structured-value and argument-binding layer of a
//! Tcl-compatible scripting runtime.
//!
//! Three pieces live here:
//!
//! | Module | Role |
//! |--------|------|
//! | [`list`] | Tcl list codec: parse, canonical format, typed and pair lists |
//! | [`path`] | Ordered path table with a stable insertion-order side index |
//! | [`options`] | Option registry with exact / unique-prefix resolution |
//!
//! [`pattern`] supplies the glob (`string match`) and regex filters used by
//! formatting and key queries; [`dict`] is a string dictionary built from
//! list text; [`config`] and [`cli`] back the `tclish` binary.

pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod list;
pub mod options;
pub mod path;
pub mod pattern;

pub use error::{Error, Result};
pub use list::{Element, FormatOptions, List};
pub use options::{OptionDef, OptionFlags, OptionSet};
pub use path::{PathTable, PathTranslation};
