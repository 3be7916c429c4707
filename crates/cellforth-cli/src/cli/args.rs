//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands can compose the same
//! definition, hiding the ones they accept but ignore.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Script file, or `-` for stdin (positional).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Script file (`-` reads stdin)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Heap size in bytes (--heap-size).
pub fn heap_size_arg() -> Arg {
    Arg::new("heap_size")
        .long("heap-size")
        .value_name("BYTES")
        .value_parser(value_parser!(usize))
        .help("Heap capacity in bytes (default: 1 MiB)")
}

/// Data stack depth limit (--stack-limit).
pub fn stack_limit_arg() -> Arg {
    Arg::new("stack_limit")
        .long("stack-limit")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Maximum data stack depth (default: 1024)")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Machine readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print layouts as JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v adds the stack, -vv adds literals and variables)")
}
