//! Renders diagnostics against the script they point into.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{Annotation, AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::{DiagnosticMessage, Diagnostics, Severity};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, source: &'s str) -> Self {
        Self {
            diagnostics,
            source,
            path: None,
            colored: false,
        }
    }

    /// File name shown in the ` --> path:line:col` header.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.format(&mut out);
        out
    }

    /// One report per diagnostic, separated by a blank line.
    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&self.report(diag)))?;
        }
        Ok(())
    }

    /// The title carries the message, so the primary caret stays unlabeled.
    fn report<'a>(&'a self, diag: &'a DiagnosticMessage) -> Vec<Group<'a>> {
        let range = self.clamp(diag.range);

        let mut snippet = self
            .snippet()
            .annotation(AnnotationKind::Primary.span(range.clone()));
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(self.clamp(related.range))
                    .label(&related.message),
            );
        }

        let title = level(diag.severity()).primary_title(&diag.message);
        let mut groups = vec![title.element(snippet)];

        if let Some(fix) = &diag.fix {
            let patched = Snippet::source(self.source)
                .line_start(1)
                .patch(Patch::new(range, &fix.replacement));
            groups.push(Level::HELP.secondary_title(&fix.description).element(patched));
        }
        groups
    }

    fn snippet<'a>(&'a self) -> Snippet<'a, Annotation<'a>> {
        let snippet = Snippet::source(self.source).line_start(1);
        match self.path {
            Some(path) => snippet.path(path),
            None => snippet,
        }
    }

    /// Zero-width spans are widened to one character so the caret is visible.
    fn clamp(&self, range: TextRange) -> Range<usize> {
        let start: usize = range.start().into();
        let end: usize = range.end().into();
        if start == end {
            start..(start + 1).min(self.source.len())
        } else {
            start..end
        }
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}
