//! Command builders for the CLI.
//!
//! `check` and `layout` never allocate, but accept the limit flags (hidden)
//! so a `run` invocation can be turned into either by swapping the
//! subcommand.

use clap::Command;

use super::args::*;

/// Add hidden limit args (for commands that don't execute).
fn with_hidden_limit_args(cmd: Command) -> Command {
    cmd.arg(heap_size_arg().hide(true))
        .arg(stack_limit_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("cellforth")
        .about("Stack language with typed struct layouts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(run_command())
        .subcommand(check_command())
        .subcommand(layout_command())
        .subcommand(trace_command())
}

pub fn run_command() -> Command {
    Command::new("run")
        .about("Execute a script")
        .after_help(
            r#"EXAMPLES:
  cellforth run shapes.fs                   # run a script
  cellforth run - < shapes.fs               # read from stdin
  cellforth run shapes.fs --heap-size 4096  # smaller heap"#,
        )
        .arg(file_arg())
        .arg(heap_size_arg())
        .arg(stack_limit_arg())
        .arg(color_arg())
}

/// Validate a script without running it.
///
/// Struct declarations are compiled so that unknown types and duplicate
/// fields are reported too.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate a script and its struct declarations")
        .after_help(
            r#"EXAMPLES:
  cellforth check shapes.fs           # errors only
  cellforth check shapes.fs --strict  # warnings fail too"#,
        )
        .arg(file_arg())
        .arg(strict_arg())
        .arg(color_arg());

    with_hidden_limit_args(cmd)
}

pub fn layout_command() -> Command {
    let cmd = Command::new("layout")
        .about("Show the memory layout of declared structs")
        .after_help(
            r#"EXAMPLES:
  cellforth layout shapes.fs          # annotated text
  cellforth layout shapes.fs --json   # JSON"#,
        )
        .arg(file_arg())
        .arg(json_arg())
        .arg(color_arg());

    with_hidden_limit_args(cmd)
}

pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Execute a script and show what it did")
        .after_help(
            r#"EXAMPLES:
  cellforth trace shapes.fs           # words, declarations, allocations
  cellforth trace shapes.fs -v        # also the stack after each word
  cellforth trace shapes.fs -vv       # also literals and variables"#,
        )
        .arg(file_arg())
        .arg(verbose_arg())
        .arg(heap_size_arg())
        .arg(stack_limit_arg())
        .arg(color_arg())
}
