//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` mirror the command `*Args` but keep clap-level types
//! (`ColorChoice`, raw counts); the `From` impls resolve them.

use std::path::PathBuf;

use cellforth_vm::{Limits, Verbosity};
use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::layout::LayoutArgs;
use crate::commands::run::RunArgs;
use crate::commands::trace::TraceArgs;

pub struct RunParams {
    pub file: PathBuf,
    pub heap_size: Option<usize>,
    pub stack_limit: Option<usize>,
    pub color: ColorChoice,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: parse_file(m),
            heap_size: m.get_one::<usize>("heap_size").copied(),
            stack_limit: m.get_one::<usize>("stack_limit").copied(),
            color: parse_color(m),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            file: p.file,
            limits: build_limits(p.heap_size, p.stack_limit),
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub file: PathBuf,
    pub strict: bool,
    pub color: ColorChoice,
    // Note: heap_size and stack_limit are parsed but not extracted
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: parse_file(m),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            file: p.file,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct LayoutParams {
    pub file: PathBuf,
    pub json: bool,
    pub color: ColorChoice,
}

impl LayoutParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: parse_file(m),
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<LayoutParams> for LayoutArgs {
    fn from(p: LayoutParams) -> Self {
        Self {
            file: p.file,
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub file: PathBuf,
    pub verbose: u8,
    pub heap_size: Option<usize>,
    pub stack_limit: Option<usize>,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: parse_file(m),
            verbose: m.get_count("verbose"),
            heap_size: m.get_one::<usize>("heap_size").copied(),
            stack_limit: m.get_one::<usize>("stack_limit").copied(),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            file: p.file,
            limits: build_limits(p.heap_size, p.stack_limit),
            verbosity,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_file(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("file")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Defaults for whatever was not given on the command line.
fn build_limits(heap_size: Option<usize>, stack_limit: Option<usize>) -> Limits {
    let mut limits = Limits::default();
    if let Some(bytes) = heap_size {
        limits = limits.heap_capacity(bytes);
    }
    if let Some(depth) = stack_limit {
        limits = limits.stack_limit(depth);
    }
    limits
}
