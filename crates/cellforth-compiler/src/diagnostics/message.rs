use rowan::TextRange;

/// What went wrong while reading a script.
///
/// Declaration-level problems that need the registry (unknown nested types,
/// duplicate fields) are not found by the parser: they surface when the
/// declaration is committed and are reported as [`DiagnosticKind::Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Unterminated constructs swallow the rest of the input
    UnclosedDeclaration,
    UnclosedString,
    UnclosedComment,

    // Something required is missing
    ExpectedStructName,
    ExpectedVariableName,

    // Something is malformed
    InvalidIdentifier,
    InvalidFieldType,
    InvalidEscape,
    IntegerOverflow,
    UnexpectedToken,
    UnrecognizedInput,

    // Legal but suspicious
    EmptyDeclaration,

    // Raised while executing, rendered against the script
    Runtime,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::EmptyDeclaration => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedDeclaration => "declaration is missing its closing `;`",
            Self::UnclosedString => "missing closing `\"`",
            Self::UnclosedComment => "missing closing `)`",

            Self::ExpectedStructName => "expected struct name after `#`",
            Self::ExpectedVariableName => "expected variable name",

            Self::InvalidIdentifier => "invalid identifier",
            Self::InvalidFieldType => "invalid field type",
            Self::InvalidEscape => "unknown escape sequence",
            Self::IntegerOverflow => "integer literal out of range",
            Self::UnexpectedToken => "unexpected token",
            Self::UnrecognizedInput => "unrecognized input",

            Self::EmptyDeclaration => "struct has no fields",

            Self::Runtime => "execution failed",
        }
    }

    /// Template for messages with caller detail; `{}` is the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InvalidIdentifier => "`{}` is not a valid identifier".to_string(),
            Self::InvalidEscape => "unknown escape sequence `{}`".to_string(),
            Self::IntegerOverflow => "`{}` does not fit in a cell".to_string(),
            Self::EmptyDeclaration => "struct `{}` has no fields".to_string(),
            Self::Runtime => "{}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A suggested replacement for the diagnostic's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
