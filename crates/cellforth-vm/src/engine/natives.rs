//! Built-in words.

use std::io::Write;

use cellforth_core::{Address, Value};
use cellforth_structs::{Heap, StructError, address_of};

use super::dictionary::{Dictionary, NativeFn};
use super::error::ErrorKind;
use super::vm::VM;

/// Flag pushed by comparisons: all bits set.
pub const TRUE: Value = Value::Int(-1);
pub const FALSE: Value = Value::Int(0);

pub(crate) fn flag(value: bool) -> Value {
    if value { TRUE } else { FALSE }
}

struct Native {
    name: &'static str,
    f: NativeFn,
    description: &'static str,
    signature: &'static str,
}

const NATIVES: &[Native] = &[
    // stack
    Native {
        name: "dup",
        f: word_dup,
        description: "Duplicate the top value on the data stack.",
        signature: "value -- value value",
    },
    Native {
        name: "drop",
        f: word_drop,
        description: "Discard the top value on the data stack.",
        signature: "value -- ",
    },
    Native {
        name: "swap",
        f: word_swap,
        description: "Swap the top 2 values on the data stack.",
        signature: "a b -- b a",
    },
    Native {
        name: "over",
        f: word_over,
        description: "Copy the second value onto the top.",
        signature: "a b -- a b a",
    },
    Native {
        name: "rot",
        f: word_rot,
        description: "Rotate the third value to the top.",
        signature: "a b c -- b c a",
    },
    Native {
        name: "stack.depth",
        f: word_stack_depth,
        description: "Get the current depth of the stack.",
        signature: " -- depth",
    },
    // arithmetic
    Native {
        name: "+",
        f: word_add,
        description: "Add 2 numbers, join 2 strings, or offset an address.",
        signature: "a b -- result",
    },
    Native {
        name: "-",
        f: word_subtract,
        description: "Subtract 2 numbers.",
        signature: "a b -- result",
    },
    Native {
        name: "*",
        f: word_multiply,
        description: "Multiply 2 numbers.",
        signature: "a b -- result",
    },
    Native {
        name: "/",
        f: word_divide,
        description: "Divide 2 numbers, truncating toward zero.",
        signature: "a b -- result",
    },
    Native {
        name: "%",
        f: word_mod,
        description: "Remainder of dividing 2 numbers.",
        signature: "a b -- result",
    },
    Native {
        name: "=",
        f: word_equal,
        description: "Are 2 values equal?",
        signature: "a b -- bool",
    },
    // output
    Native {
        name: ".",
        f: word_print,
        description: "Print the top value followed by a space.",
        signature: "value -- ",
    },
    Native {
        name: "cr",
        f: word_cr,
        description: "Print a newline.",
        signature: " -- ",
    },
    Native {
        name: ".cr",
        f: word_print_cr,
        description: "Print the top value followed by a newline.",
        signature: "value -- ",
    },
    Native {
        name: ".s",
        f: word_print_stack,
        description: "Print out the data stack without changing it.",
        signature: " -- ",
    },
    // memory
    Native {
        name: "!",
        f: word_store,
        description: "Store a value at an address.",
        signature: "value addr -- ",
    },
    Native {
        name: "@",
        f: word_fetch,
        description: "Fetch the value stored at an address.",
        signature: "addr -- value",
    },
    // dictionary
    Native {
        name: "defined?",
        f: word_is_defined,
        description: "Is the word with the given name defined?",
        signature: "name -- bool",
    },
];

pub(crate) fn install(dictionary: &mut Dictionary) {
    for native in NATIVES {
        let installed =
            dictionary.define_native(native.name, native.f, native.description, native.signature);
        debug_assert!(installed.is_ok(), "duplicate native `{}`", native.name);
    }
}

fn word_dup(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let top = vm.stack.peek(0)?;
    vm.stack.push(top)
}

fn word_drop(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.pop().map(drop)
}

fn word_swap(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.require(2)?;
    let b = vm.stack.pop()?;
    let a = vm.stack.pop()?;
    vm.stack.push(b)?;
    vm.stack.push(a)
}

fn word_over(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let a = vm.stack.peek(1)?;
    vm.stack.push(a)
}

fn word_rot(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.require(3)?;
    let c = vm.stack.pop()?;
    let b = vm.stack.pop()?;
    let a = vm.stack.pop()?;
    vm.stack.push(b)?;
    vm.stack.push(c)?;
    vm.stack.push(a)
}

fn word_stack_depth(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let depth = vm.stack.len() as i64;
    vm.stack.push(Value::Int(depth))
}

fn word_add(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.require(2)?;
    let b = vm.stack.pop()?;
    let a = vm.stack.pop()?;

    let result = match (a, b) {
        (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
        (Value::Str(a), Value::Str(b)) => {
            let joined = format!("{}{}", vm.interner.resolve(a), vm.interner.resolve(b));
            Value::Str(vm.interner.intern_owned(joined))
        }
        (Value::Addr(addr), Value::Int(n)) | (Value::Int(n), Value::Addr(addr)) => {
            let moved = u32::try_from(n)
                .ok()
                .and_then(|n| addr.offset(n))
                .ok_or(StructError::InvalidAddress { address: addr })?;
            Value::Addr(moved)
        }
        (a, b) => return Err(mismatch(a, b)),
    };
    vm.stack.push(result)
}

fn word_subtract(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    binary_int(vm, |a, b| Ok(a.wrapping_sub(b)))
}

fn word_multiply(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    binary_int(vm, |a, b| Ok(a.wrapping_mul(b)))
}

fn word_divide(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    binary_int(vm, |a, b| {
        if b == 0 {
            return Err(ErrorKind::DivisionByZero);
        }
        Ok(a.wrapping_div(b))
    })
}

fn word_mod(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    binary_int(vm, |a, b| {
        if b == 0 {
            return Err(ErrorKind::DivisionByZero);
        }
        Ok(a.wrapping_rem(b))
    })
}

fn word_equal(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.require(2)?;
    let b = vm.stack.pop()?;
    let a = vm.stack.pop()?;
    vm.stack.push(flag(a == b))
}

fn word_print(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let value = vm.stack.pop()?;
    write!(vm.out, "{} ", value.display(&vm.interner))?;
    Ok(())
}

fn word_cr(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    writeln!(vm.out)?;
    Ok(())
}

fn word_print_cr(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let value = vm.stack.pop()?;
    writeln!(vm.out, "{}", value.display(&vm.interner))?;
    Ok(())
}

fn word_print_stack(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    write!(vm.out, "<{}>", vm.stack.len())?;
    for value in vm.stack.as_slice() {
        write!(vm.out, " {}", value.display(&vm.interner))?;
    }
    writeln!(vm.out)?;
    Ok(())
}

fn word_store(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    vm.stack.require(2)?;
    let addr = pop_address(vm)?;
    let value = vm.stack.pop()?;
    vm.heap.store(addr, value)?;
    Ok(())
}

fn word_fetch(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let addr = pop_address(vm)?;
    let value = vm.heap.load(addr)?;
    vm.stack.push(value)
}

fn word_is_defined(vm: &mut VM<'_>) -> Result<(), ErrorKind> {
    let sym = vm.stack.pop_str()?;
    let defined = vm.dictionary.contains(vm.interner.resolve(sym));
    vm.stack.push(flag(defined))
}

fn binary_int(
    vm: &mut VM<'_>,
    op: impl FnOnce(i64, i64) -> Result<i64, ErrorKind>,
) -> Result<(), ErrorKind> {
    vm.stack.require(2)?;
    let b = vm.stack.pop()?;
    let a = vm.stack.pop()?;
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => vm.stack.push(Value::Int(op(a, b)?)),
        (a, b) => Err(mismatch(a, b)),
    }
}

/// Mismatch naming the first operand that is not an integer.
fn mismatch(a: Value, b: Value) -> ErrorKind {
    let found = if a.as_int().is_none() { a } else { b };
    ErrorKind::TypeMismatch {
        expected: "integer",
        found: found.kind_name(),
    }
}

/// Pop an address. Null and zero are null references, anything else that is
/// not an address is a type error.
fn pop_address(vm: &mut VM<'_>) -> Result<Address, ErrorKind> {
    let value = vm.stack.pop()?;
    Ok(address_of(value)?)
}
