use std::io::Read;
use std::path::Path;

use log::debug;

use tclish::cli::{self, ConfigFile};
use tclish::config::{Config, Settings};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("tclish: {message}");
    std::process::exit(1);
}

fn load_config(path: &Path, explicit: bool) -> Settings {
    match Config::load_file(path) {
        Ok((config, errors)) => {
            debug!(target: "tclish::config", "loaded {}", path.display());
            for e in errors {
                eprintln!("tclish: warning: {}: {e}", path.display());
            }
            config.settings
        }
        Err(e) if explicit => fail(format!("{}: {e}", path.display())),
        Err(e) => {
            eprintln!("tclish: warning: {}: {e}", path.display());
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("tclish: {e}");
            eprintln!("Usage: tclish [-mode list|pairs|paths|options] [-separator <sep>]");
            eprintln!("              [-pattern <glob> | -regexp <re>] [-nocase] [-reverse]");
            eprintln!("              [-translation <t>] [-strict <bool>] [-config <file> | -noconfig]");
            eprintln!("              [--] ?text ...?");
            std::process::exit(1);
        }
    };

    // ── Load config ───────────────────────────────────────────────────────────
    let settings = match &args.config {
        ConfigFile::Skip => Settings::default(),
        ConfigFile::Explicit(path) => load_config(path, true),
        ConfigFile::Search => match cli::find_user_config() {
            Some(path) => load_config(&path, false),
            None => Settings::default(),
        },
    };

    // ── Input: arguments, else stdin ──────────────────────────────────────────
    let input = if args.positional.is_empty() {
        let mut s = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut s) {
            fail(e);
        }
        s
    } else {
        args.positional.join(" ")
    };

    match cli::run(&args, &input, &settings) {
        Ok(out) => println!("{out}"),
        Err(e) => fail(e),
    }
}
