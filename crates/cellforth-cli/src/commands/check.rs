use std::path::PathBuf;

use cellforth_vm::VM;

use super::script;

pub struct CheckArgs {
    pub file: PathBuf,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let loaded = script::load(&args.file, args.color, args.strict);

    let mut vm = VM::builder().build();
    if let Err(err) = vm.declare_all(&loaded.script) {
        loaded.fail(&err);
    }

    // Silent on success (like cargo check)
}
