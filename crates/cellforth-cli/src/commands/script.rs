//! Shared logic for loading, parsing and reporting on a script.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cellforth_compiler::{DiagnosticKind, Diagnostics, Script, parse};
use cellforth_vm::RuntimeError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(io::Error),
}

/// A script that parsed without errors, with what is needed to report on it.
pub struct LoadedScript {
    /// Shown in diagnostics; `<stdin>` for `-`.
    pub label: String,
    pub source: String,
    pub script: Script,
    pub diagnostics: Diagnostics,
    pub color: bool,
}

impl LoadedScript {
    /// Render `diagnostics` against this script on stderr.
    pub fn eprint(&self, diagnostics: &Diagnostics) {
        eprint!(
            "{}",
            diagnostics
                .printer(&self.source)
                .path(&self.label)
                .colored(self.color)
                .render()
        );
    }

    /// Report a runtime failure at its span and exit.
    pub fn fail(&self, err: &RuntimeError) -> ! {
        self.eprint(&runtime_diagnostics(err));
        std::process::exit(1);
    }
}

pub fn read_source(path: &Path) -> Result<String, LoadError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(LoadError::Stdin)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

pub fn label(path: &Path) -> String {
    if path.as_os_str() == "-" {
        return "<stdin>".to_owned();
    }
    path.display().to_string()
}

/// Read and parse `path`, printing diagnostics. Exits when the script has
/// errors (or warnings, when `strict`).
pub fn load(path: &Path, color: bool, strict: bool) -> LoadedScript {
    let source = read_source(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let parsed = parse(&source);
    let loaded = LoadedScript {
        label: label(path),
        source,
        script: parsed.script,
        diagnostics: parsed.diagnostics,
        color,
    };

    if !loaded.diagnostics.is_empty() {
        loaded.eprint(&loaded.diagnostics);
    }
    let failed = loaded.diagnostics.has_errors() || (strict && loaded.diagnostics.has_warnings());
    if failed {
        std::process::exit(1);
    }
    loaded
}

/// A runtime failure as a single diagnostic at the failing item.
pub fn runtime_diagnostics(err: &RuntimeError) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::Runtime, err.span)
        .message(err.to_string())
        .emit();
    diagnostics
}
