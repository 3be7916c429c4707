//! Parser: tokens to [`Script`].
//!
//! Parsing never stops at the first problem. Every issue becomes a diagnostic
//! and the parser resynchronizes at the next token; a declaration with any
//! error is dropped from the script so later stages never see a half-read
//! layout.

use cellforth_structs::{FieldDecl, StructDecl, TypeToken};
use rowan::{TextRange, TextSize};

use crate::ast::{Declaration, Item, ItemKind, Script};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::{Token, lex, token_text};
use crate::SyntaxKind;

/// Suffix on a field type that requests auto-construction.
const CONSTRUCT_SUFFIX: &str = ".new";

#[derive(Debug, Clone, Default)]
pub struct Parse {
    pub script: Script,
    pub diagnostics: Diagnostics,
}

impl Parse {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

pub fn parse(source: &str) -> Parse {
    let mut parser = Parser::new(source);
    parser.script();
    Parse {
        script: Script {
            items: parser.items,
        },
        diagnostics: parser.diagnostics,
    }
}

/// Whether `text` can name a struct or a field.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    items: Vec<Item>,
    diagnostics: Diagnostics,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        let tokens = lex(source)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            source,
            tokens,
            pos: 0,
            items: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn text(&self, token: &Token) -> &'s str {
        token_text(self.source, token)
    }

    fn push(&mut self, kind: ItemKind, span: TextRange) {
        self.items.push(Item { kind, span });
    }

    fn script(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                SyntaxKind::Hash => self.declaration(),
                SyntaxKind::KwVariable => self.variable(),
                _ => {
                    self.pos += 1;
                    self.atom(token);
                }
            }
        }
    }

    fn atom(&mut self, token: Token) {
        let span = token.span;
        match token.kind {
            SyntaxKind::Int => {
                if let Some(value) = self.int(&token) {
                    self.push(ItemKind::Int(value), span);
                }
            }
            SyntaxKind::StringLiteral => {
                let value = self.string(&token);
                self.push(ItemKind::Str(value), span);
            }
            SyntaxKind::Word => {
                let word = self.text(&token).to_owned();
                self.push(ItemKind::Word(word), span);
            }
            SyntaxKind::Semicolon => self
                .diagnostics
                .report(DiagnosticKind::UnexpectedToken, span)
                .message("`;` outside a declaration")
                .emit(),
            SyntaxKind::UnclosedString => self
                .diagnostics
                .report(DiagnosticKind::UnclosedString, first_char(span))
                .emit(),
            SyntaxKind::UnclosedComment => self
                .diagnostics
                .report(DiagnosticKind::UnclosedComment, first_char(span))
                .emit(),
            SyntaxKind::Garbage => self
                .diagnostics
                .report(DiagnosticKind::UnrecognizedInput, span)
                .emit(),
            kind => self
                .diagnostics
                .report(DiagnosticKind::UnexpectedToken, span)
                .message(kind.describe())
                .emit(),
        }
    }

    fn int(&mut self, token: &Token) -> Option<i64> {
        let text = self.text(token);
        let (sign, magnitude) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        let (digits, radix) = match magnitude
            .strip_prefix("0x")
            .or_else(|| magnitude.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (magnitude, 10),
        };

        match i64::from_str_radix(&format!("{sign}{digits}"), radix) {
            Ok(value) => Some(value),
            Err(_) => {
                self.diagnostics
                    .report(DiagnosticKind::IntegerOverflow, token.span)
                    .message(text)
                    .emit();
                None
            }
        }
    }

    fn string(&mut self, token: &Token) -> String {
        let text = self.text(token);
        let inner = &text[1..text.len() - 1];
        let inner_start = token.span.start() + TextSize::from(1);

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.char_indices();
        while let Some((at, c)) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some((_, escaped)) = chars.next() else {
                break;
            };
            match escaped {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => {
                    let len = 1 + other.len_utf8();
                    let range = TextRange::at(inner_start + offset(at), offset(len));
                    self.diagnostics
                        .report(DiagnosticKind::InvalidEscape, range)
                        .message(&inner[at..at + len])
                        .emit();
                    out.push(other);
                }
            }
        }
        out
    }

    fn variable(&mut self) {
        let Some(keyword) = self.bump() else {
            return;
        };
        match self.peek() {
            Some(name) if name.kind == SyntaxKind::Word => {
                self.pos += 1;
                let text = self.text(&name).to_owned();
                self.push(
                    ItemKind::Variable(text),
                    keyword.span.cover(name.span),
                );
            }
            _ => self
                .diagnostics
                .report(DiagnosticKind::ExpectedVariableName, keyword.span)
                .emit(),
        }
    }

    fn declaration(&mut self) {
        let Some(hash) = self.bump() else {
            return;
        };

        let name = match self.peek() {
            Some(t) if matches!(t.kind, SyntaxKind::Word | SyntaxKind::KwVariable) => {
                self.pos += 1;
                t
            }
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::ExpectedStructName, hash.span)
                    .emit();
                self.skip_declaration();
                return;
            }
        };
        let name_text = self.text(&name);
        let mut valid = self.check_identifier(name_text, name.span);

        let mut decl = StructDecl::new(name_text);
        let mut field_spans = Vec::new();

        let end = loop {
            let Some(token) = self.peek() else {
                self.diagnostics
                    .report(DiagnosticKind::UnclosedDeclaration, hash.span)
                    .related_to(format!("struct `{name_text}` starts here"), name.span)
                    .emit();
                return;
            };
            match token.kind {
                SyntaxKind::Semicolon => {
                    self.pos += 1;
                    break token.span;
                }
                SyntaxKind::Hash => {
                    // leave the `#` for the next declaration
                    self.diagnostics
                        .report(DiagnosticKind::UnclosedDeclaration, hash.span)
                        .related_to("next declaration starts here", token.span)
                        .emit();
                    return;
                }
                SyntaxKind::Word | SyntaxKind::KwVariable => {
                    self.pos += 1;
                    match self.field(&token) {
                        Some(field) => {
                            decl.fields.push(field);
                            field_spans.push(token.span);
                        }
                        None => valid = false,
                    }
                }
                kind => {
                    self.pos += 1;
                    valid = false;
                    self.diagnostics
                        .report(DiagnosticKind::UnexpectedToken, token.span)
                        .message(format!("{} in field list", kind.describe()))
                        .emit();
                }
            }
        };

        if !valid {
            return;
        }
        if decl.fields.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::EmptyDeclaration, name.span)
                .message(name_text)
                .emit();
        }

        self.push(
            ItemKind::Declare(Declaration {
                decl,
                name_span: name.span,
                field_spans,
            }),
            hash.span.cover(end),
        );
    }

    /// `name`, `name:Type` or `name:Type.new`.
    fn field(&mut self, token: &Token) -> Option<FieldDecl> {
        let text = self.text(token);
        let start = token.span.start();

        let Some((name, ty)) = text.split_once(':') else {
            return self
                .check_identifier(text, token.span)
                .then(|| FieldDecl {
                    name: text.to_owned(),
                    ty: TypeToken::Plain,
                });
        };

        let name_range = TextRange::at(start, offset(name.len()));
        let ty_range = TextRange::at(start + offset(name.len() + 1), offset(ty.len()));
        let name_ok = self.check_identifier(name, name_range);

        let (type_name, construct) = match ty.strip_suffix(CONSTRUCT_SUFFIX) {
            Some(base) => (base, true),
            None => (ty, false),
        };
        let ty_ok = if type_name.is_empty() {
            let colon = TextRange::at(start + offset(name.len()), offset(1));
            self.diagnostics
                .report(DiagnosticKind::InvalidFieldType, colon.cover(ty_range))
                .message("missing type name after `:`")
                .emit();
            false
        } else if !is_identifier(type_name) {
            let report = self
                .diagnostics
                .report(DiagnosticKind::InvalidFieldType, ty_range)
                .message(format!("expected `Type` or `Type.new`, found `{ty}`"));
            match misspelled_constructor(ty) {
                Some(base) => report
                    .fix("construct with `.new`", format!("{base}{CONSTRUCT_SUFFIX}"))
                    .emit(),
                None => report.emit(),
            }
            false
        } else {
            true
        };

        (name_ok && ty_ok).then(|| FieldDecl {
            name: name.to_owned(),
            ty: TypeToken::Struct {
                name: type_name.to_owned(),
                construct,
            },
        })
    }

    fn check_identifier(&mut self, text: &str, range: TextRange) -> bool {
        if is_identifier(text) {
            return true;
        }
        self.diagnostics
            .report(DiagnosticKind::InvalidIdentifier, range)
            .message(text)
            .emit();
        false
    }

    /// Skip to just past the next `;`, stopping early at a `#`.
    fn skip_declaration(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                SyntaxKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                SyntaxKind::Hash => return,
                _ => self.pos += 1,
            }
        }
    }
}

/// `bar` for `bar.make`: a valid type name followed by some other suffix.
fn misspelled_constructor(ty: &str) -> Option<&str> {
    let (base, _) = ty.rsplit_once('.')?;
    is_identifier(base).then_some(base)
}

fn offset(n: usize) -> TextSize {
    TextSize::from(n as u32)
}

fn first_char(span: TextRange) -> TextRange {
    TextRange::at(span.start(), TextSize::from(1))
}
