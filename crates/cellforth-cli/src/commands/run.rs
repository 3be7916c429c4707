use std::path::PathBuf;

use cellforth_vm::{Limits, VM};

use super::script;

pub struct RunArgs {
    pub file: PathBuf,
    pub limits: Limits,
    pub color: bool,
}

pub fn run(args: RunArgs) {
    let loaded = script::load(&args.file, args.color, false);

    let mut vm = VM::builder().limits(args.limits).build();
    if let Err(err) = vm.run(&loaded.script) {
        loaded.fail(&err);
    }
}
