//! Execute a script with tracing.

use std::path::PathBuf;

use cellforth_core::Colors;
use cellforth_vm::{Limits, PrintTracer, VM, Verbosity};

use super::script;

pub struct TraceArgs {
    pub file: PathBuf,
    pub limits: Limits,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let loaded = script::load(&args.file, args.color, false);
    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(args.verbosity, colors);

    // Script output is held back so it does not interleave with the trace
    let mut output = Vec::new();
    let mut vm = VM::builder().limits(args.limits).output(&mut output).build();
    let result = vm.run_traced(&loaded.script, &mut tracer);
    drop(vm);

    tracer.print();
    println!("{}---{}", colors.meta, colors.reset);
    print!("{}", String::from_utf8_lossy(&output));

    if let Err(err) = result {
        loaded.fail(&err);
    }
}
