//! The host interpreter.

use std::io::{self, Write};

use cellforth_compiler::{Declaration, ItemKind, Script};
use cellforth_core::{Address, Interner, Value};
use cellforth_structs::{
    AccessorKind, AccessorOp, CellHeap, DEFAULT_HEAP_CAPACITY, InstanceAllocator, StructError,
    TypeRegistry, TypeToken, declare,
};
use rowan::TextRange;

use super::dictionary::{Dictionary, Word};
use super::error::{ErrorKind, RuntimeError};
use super::natives::{self, flag};
use super::stack::DataStack;
use super::trace::{NoopTracer, Tracer};
use super::variables::Variables;

/// Resource limits for a VM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Heap size in bytes (default: 1 MiB).
    pub(crate) heap_capacity: usize,
    /// Maximum data stack depth (default: 1,024).
    pub(crate) stack_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            heap_capacity: DEFAULT_HEAP_CAPACITY,
            stack_limit: 1024,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heap_capacity(mut self, bytes: usize) -> Self {
        self.heap_capacity = bytes;
        self
    }

    pub fn stack_limit(mut self, depth: usize) -> Self {
        self.stack_limit = depth;
        self
    }

    pub fn get_heap_capacity(&self) -> usize {
        self.heap_capacity
    }

    pub fn get_stack_limit(&self) -> usize {
        self.stack_limit
    }
}

pub struct VMBuilder<'o> {
    limits: Limits,
    output: Option<Box<dyn Write + 'o>>,
}

impl<'o> VMBuilder<'o> {
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            output: None,
        }
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn heap_capacity(mut self, bytes: usize) -> Self {
        self.limits = self.limits.heap_capacity(bytes);
        self
    }

    pub fn stack_limit(mut self, depth: usize) -> Self {
        self.limits = self.limits.stack_limit(depth);
        self
    }

    /// Where `.`, `cr` and friends write. Defaults to stdout.
    pub fn output(mut self, out: impl Write + 'o) -> Self {
        self.output = Some(Box::new(out));
        self
    }

    pub fn build(self) -> VM<'o> {
        let mut dictionary = Dictionary::new();
        natives::install(&mut dictionary);

        VM {
            stack: DataStack::new(self.limits.stack_limit),
            dictionary,
            registry: TypeRegistry::new(),
            heap: CellHeap::with_capacity(self.limits.heap_capacity),
            variables: Variables::new(),
            interner: Interner::new(),
            out: self
                .output
                .unwrap_or_else(|| Box::new(io::stdout()) as Box<dyn Write + 'o>),
            limits: self.limits,
        }
    }
}

impl Default for VMBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpreter state: everything a script can observe or change.
///
/// Items run in source order against one data stack. The first error stops
/// the run; state changed before it stays changed.
pub struct VM<'o> {
    pub(crate) stack: DataStack,
    pub(crate) dictionary: Dictionary,
    pub(crate) registry: TypeRegistry,
    pub(crate) heap: CellHeap,
    pub(crate) variables: Variables,
    pub(crate) interner: Interner,
    pub(crate) out: Box<dyn Write + 'o>,
    limits: Limits,
}

impl<'o> VM<'o> {
    pub fn builder() -> VMBuilder<'o> {
        VMBuilder::new()
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn heap(&self) -> &CellHeap {
        &self.heap
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Current value of a declared variable.
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables.fetch(&self.heap, name)?.ok()
    }

    /// Render a value the way `.` prints it.
    pub fn format_value(&self, value: Value) -> String {
        value.display(&self.interner).to_string()
    }

    pub fn run(&mut self, script: &Script) -> Result<(), RuntimeError> {
        self.run_traced(script, &mut NoopTracer)
    }

    pub fn run_traced<T: Tracer>(
        &mut self,
        script: &Script,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        let result = self.execute(script, tracer);
        let flushed = self.out.flush();

        if let Err(err) = &result {
            tracer.trace_error(err);
        }
        result?;
        flushed.map_err(|e| RuntimeError::new(e.into(), TextRange::default()))
    }

    /// Commit the declarations of `script` and nothing else.
    pub fn declare_all(&mut self, script: &Script) -> Result<(), RuntimeError> {
        for (decl, span) in script.declarations() {
            self.declare(decl, &mut NoopTracer)
                .map_err(|kind| RuntimeError::new(kind.kind, span_or(kind.span, span)))?;
        }
        Ok(())
    }

    fn execute<T: Tracer>(&mut self, script: &Script, tracer: &mut T) -> Result<(), RuntimeError> {
        for item in &script.items {
            let span = item.span;
            match &item.kind {
                ItemKind::Declare(decl) => {
                    self.declare(decl, tracer)
                        .map_err(|e| RuntimeError::new(e.kind, span_or(e.span, span)))?;
                }
                ItemKind::Int(v) => self.push_literal(Value::Int(*v), span, tracer)?,
                ItemKind::Str(s) => {
                    let sym = self.interner.intern(s);
                    self.push_literal(Value::Str(sym), span, tracer)?;
                }
                ItemKind::Word(name) => {
                    tracer.trace_word(name);
                    self.dispatch(name, tracer)
                        .map_err(|kind| RuntimeError::new(kind, span))?;
                    tracer.trace_stack(self.stack.as_slice(), &self.interner);
                }
                ItemKind::Variable(name) => {
                    let addr = self
                        .declare_variable(name)
                        .map_err(|kind| RuntimeError::new(kind, span))?;
                    tracer.trace_variable(name, addr);
                }
            }
        }
        Ok(())
    }

    fn push_literal<T: Tracer>(
        &mut self,
        value: Value,
        span: TextRange,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        self.stack
            .push(value)
            .map_err(|kind| RuntimeError::new(kind, span))?;
        tracer.trace_literal(value, &self.interner);
        Ok(())
    }

    /// Run the word named `name`.
    pub fn execute_word(&mut self, name: &str) -> Result<(), ErrorKind> {
        self.dispatch(name, &mut NoopTracer)
    }

    fn dispatch<T: Tracer>(&mut self, name: &str, tracer: &mut T) -> Result<(), ErrorKind> {
        let word = match self.dictionary.get(name) {
            Some(entry) => entry.word.clone(),
            None => {
                return Err(ErrorKind::UnknownWord {
                    name: name.to_owned(),
                });
            }
        };

        match word {
            Word::Native(f) => f(self),
            Word::Accessor(op) => self.execute_accessor(&op, tracer),
            Word::Variable(addr) => self.stack.push(Value::Addr(addr)),
        }
    }

    fn execute_accessor<T: Tracer>(
        &mut self,
        op: &AccessorOp,
        tracer: &mut T,
    ) -> Result<(), ErrorKind> {
        let kind = op.kind();
        self.stack.require(kind.arity())?;

        match kind {
            AccessorKind::New => {
                let addr = InstanceAllocator::new(&self.registry)
                    .allocate_type(&mut self.heap, op.struct_type())?;
                tracer.trace_allocate(op.struct_type(), addr);
                self.stack.push(Value::Addr(addr))
            }
            AccessorKind::ScalarGet | AccessorKind::NestedGet => {
                let base = self.stack.pop()?;
                let value = op.read(&self.heap, base)?;
                self.stack.push(value)
            }
            AccessorKind::ScalarSet | AccessorKind::NestedSet => {
                let base = self.stack.pop()?;
                let value = self.stack.pop()?;
                op.write(&mut self.heap, base, value)?;
                Ok(())
            }
            AccessorKind::IndexGet => {
                let base = self.stack.pop()?;
                let index = self.stack.pop_int()?;
                let value = op.read_index(&self.heap, base, index)?;
                self.stack.push(value)
            }
            AccessorKind::IndexSet => {
                let base = self.stack.pop()?;
                let index = self.stack.pop_int()?;
                let value = self.stack.pop()?;
                op.write_index(&mut self.heap, base, index, value)?;
                Ok(())
            }
            AccessorKind::Equal => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                let equal = op.equal(&self.registry, &self.heap, a, b)?;
                self.stack.push(flag(equal))
            }
            AccessorKind::FieldExists => {
                let name = self.stack.pop_str()?;
                let exists = op.field_exists(self.interner.resolve(name));
                self.stack.push(flag(exists))
            }
            AccessorKind::Iterate => self.iterate(op, tracer),
            AccessorKind::Show => {
                let base = self.stack.pop()?;
                let interner = &self.interner;
                let text = op.show(&self.registry, &self.heap, base, &|v| shown(v, interner))?;
                writeln!(self.out, "{text}")?;
                Ok(())
            }
        }
    }

    /// `S.iterate`: push each field's name and value, then run the word.
    fn iterate<T: Tracer>(&mut self, op: &AccessorOp, tracer: &mut T) -> Result<(), ErrorKind> {
        let base = self.stack.pop()?;
        let word = self.stack.pop_str()?;
        let word = self.interner.resolve(word).to_owned();
        if !self.dictionary.contains(&word) {
            return Err(ErrorKind::UnknownWord { name: word });
        }

        for (name, value) in op.entries(&self.heap, base)? {
            let name = self.interner.intern(name);
            self.stack.push(Value::Str(name))?;
            self.stack.push(value)?;
            tracer.trace_word(&word);
            self.dispatch(&word, tracer)?;
        }
        Ok(())
    }

    fn declare<T: Tracer>(
        &mut self,
        decl: &Declaration,
        tracer: &mut T,
    ) -> Result<(), SpannedKind> {
        let declared = declare(&mut self.registry, &self.dictionary, &decl.decl)
            .map_err(|err| SpannedKind::at(declaration_span(decl, &err), err.into()))?;

        tracer.trace_declare(&declared.struct_type);
        for op in declared.accessors {
            self.dictionary
                .define_accessor(op)
                .map_err(|kind| SpannedKind::at(Some(decl.name_span), kind))?;
        }
        Ok(())
    }

    fn declare_variable(&mut self, name: &str) -> Result<Address, ErrorKind> {
        if self.dictionary.contains(name) {
            return Err(ErrorKind::WordRedefined {
                name: name.to_owned(),
            });
        }
        let addr = self.variables.declare(&mut self.heap, name)?;
        self.dictionary.define_variable(name, addr)?;
        Ok(addr)
    }
}

/// Cell text inside `S.show`: strings are quoted so field boundaries stay
/// readable.
fn shown(value: Value, interner: &Interner) -> String {
    match value {
        Value::Str(sym) => format!("{:?}", interner.resolve(sym)),
        other => other.display(interner).to_string(),
    }
}

/// An error kind with an optional narrower span than the whole item.
struct SpannedKind {
    kind: ErrorKind,
    span: Option<TextRange>,
}

impl SpannedKind {
    fn at(span: Option<TextRange>, kind: ErrorKind) -> Self {
        Self { kind, span }
    }
}

fn span_or(narrow: Option<TextRange>, item: TextRange) -> TextRange {
    narrow.unwrap_or(item)
}

/// Point a declaration error at the part of the declaration that caused it.
fn declaration_span(decl: &Declaration, err: &StructError) -> Option<TextRange> {
    let fields = &decl.decl.fields;
    let index = match err {
        StructError::DuplicateType { .. } | StructError::AccessorNameConflict { .. } => {
            return Some(decl.name_span);
        }
        // the second occurrence is the offending one
        StructError::DuplicateField { field, .. } => fields
            .iter()
            .enumerate()
            .filter(|(_, f)| &f.name == field)
            .nth(1)
            .map(|(i, _)| i),
        StructError::UnknownType { name } => fields.iter().position(|f| {
            matches!(&f.ty, TypeToken::Struct { name: ty, .. } if ty == name)
        }),
        _ => None,
    };
    index.and_then(|i| decl.field_spans.get(i).copied())
}
