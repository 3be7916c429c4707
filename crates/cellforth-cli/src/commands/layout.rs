//! Show the compiled layout of every declared struct.

use std::path::PathBuf;

use cellforth_core::Colors;
use cellforth_structs::dump::{self, TypeLayout};
use cellforth_vm::VM;
use serde::Serialize;

use super::script;

pub struct LayoutArgs {
    pub file: PathBuf,
    pub json: bool,
    pub color: bool,
}

#[derive(Serialize)]
struct LayoutDocument {
    types: Vec<TypeLayout>,
}

pub fn run(args: LayoutArgs) {
    let loaded = script::load(&args.file, args.color, false);

    let mut vm = VM::builder().build();
    if let Err(err) = vm.declare_all(&loaded.script) {
        loaded.fail(&err);
    }

    if args.json {
        let document = LayoutDocument {
            types: dump::layouts(vm.registry()),
        };
        match serde_json::to_string_pretty(&document) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    print!("{}", dump::render(vm.registry(), Colors::new(args.color)));
}
