//! Execution tracing.
//!
//! The VM reports what it does through the [`Tracer`] trait. [`NoopTracer`]
//! has empty `#[inline(always)]` methods so untraced runs pay nothing;
//! [`PrintTracer`] formats each event into a line and keeps them for the
//! caller to print.

use cellforth_core::{Address, Colors, Interner, Value};
use cellforth_structs::StructType;

use super::error::RuntimeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Words, declarations, allocations and errors.
    #[default]
    Default,
    /// Also the stack after every word (-v).
    Verbose,
    /// Also literal pushes and variable declarations (-vv).
    VeryVerbose,
}

/// Each method receives the raw data the VM already has; formatting happens
/// in the implementation.
pub trait Tracer {
    /// Before a word executes.
    fn trace_word(&mut self, name: &str);

    /// After a literal was pushed.
    fn trace_literal(&mut self, value: Value, interner: &Interner);

    /// After a struct declaration was committed.
    fn trace_declare(&mut self, ty: &StructType);

    /// After a `variable` declaration.
    fn trace_variable(&mut self, name: &str, addr: Address);

    /// After `S.new` produced an instance.
    fn trace_allocate(&mut self, ty: &StructType, addr: Address);

    /// After a word finished, with the stack bottom to top.
    fn trace_stack(&mut self, stack: &[Value], interner: &Interner);

    /// When execution stops on an error.
    fn trace_error(&mut self, error: &RuntimeError);
}

pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_word(&mut self, _name: &str) {}

    #[inline(always)]
    fn trace_literal(&mut self, _value: Value, _interner: &Interner) {}

    #[inline(always)]
    fn trace_declare(&mut self, _ty: &StructType) {}

    #[inline(always)]
    fn trace_variable(&mut self, _name: &str, _addr: Address) {}

    #[inline(always)]
    fn trace_allocate(&mut self, _ty: &StructType, _addr: Address) {}

    #[inline(always)]
    fn trace_stack(&mut self, _stack: &[Value], _interner: &Interner) {}

    #[inline(always)]
    fn trace_error(&mut self, _error: &RuntimeError) {}
}

/// Tracer that collects one formatted line per event.
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push(&mut self, tag: &str, content: String) {
        let c = self.colors;
        self.lines
            .push(format!("{} {content}", c.paint(c.meta, format_args!("{tag:<7}"))));
    }
}

impl Tracer for PrintTracer {
    fn trace_word(&mut self, name: &str) {
        let c = self.colors;
        self.push("word", c.paint(c.name, name));
    }

    fn trace_literal(&mut self, value: Value, interner: &Interner) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        let c = self.colors;
        self.push("push", c.paint(c.literal, value.display(interner)));
    }

    fn trace_declare(&mut self, ty: &StructType) {
        let c = self.colors;
        let content = format!(
            "{} {}",
            c.paint(c.name, &ty.name),
            c.paint(c.meta, format_args!("({} bytes)", ty.total_size))
        );
        self.push("declare", content);
    }

    fn trace_variable(&mut self, name: &str, addr: Address) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        let c = self.colors;
        self.push("var", format!("{} {}", c.paint(c.name, name), c.paint(c.literal, addr)));
    }

    fn trace_allocate(&mut self, ty: &StructType, addr: Address) {
        let c = self.colors;
        let content = format!(
            "{} {} {}",
            c.paint(c.name, &ty.name),
            c.paint(c.literal, addr),
            c.paint(c.meta, format_args!("({} bytes)", ty.total_size))
        );
        self.push("alloc", content);
    }

    fn trace_stack(&mut self, stack: &[Value], interner: &Interner) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let c = self.colors;
        let values: Vec<_> = stack
            .iter()
            .map(|v| c.paint(c.literal, v.display(interner)))
            .collect();
        self.push("stack", format!("[{}]", values.join(" ")));
    }

    fn trace_error(&mut self, error: &RuntimeError) {
        self.push("error", error.to_string());
    }
}
