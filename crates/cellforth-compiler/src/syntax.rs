//! Token kinds.
//!
//! Words are anything up to the next whitespace, so the kinds below only carve
//! out the handful of lexemes the parser treats specially. Literal tokens win
//! over `Word` on equal length through explicit priorities.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Opens a struct declaration.
    #[token("#", priority = 10)]
    Hash = 0,

    /// Closes a struct declaration.
    #[token(";", priority = 10)]
    Semicolon,

    #[token("variable", priority = 10)]
    KwVariable,

    #[regex(r"-?[0-9]+", priority = 5)]
    #[regex(r"-?0[xX][0-9a-fA-F]+", priority = 5)]
    Int,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    StringLiteral,

    /// A string missing its closing quote; runs to end of input.
    #[regex(r#""(?:[^"\\]|\\.)*\\?"#, allow_greedy = true, priority = 0)]
    UnclosedString,

    /// Any other run of printable, non-space characters.
    #[regex(r#"[^\s"\x00-\x1f\x7f]+"#, allow_greedy = true, priority = 1)]
    Word,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    /// `\ rest of line`
    #[regex(r"\\[ \t][^\n]*", allow_greedy = true, priority = 10)]
    #[token("\\", priority = 10)]
    LineComment,

    /// `( comment )`
    #[regex(r"\([ \t\r\n][^)]*\)", allow_greedy = true, priority = 10)]
    ParenComment,

    /// `( comment` with no closing paren.
    #[regex(r"\([ \t\r\n][^)]*", allow_greedy = true, priority = 9)]
    UnclosedComment,

    /// Coalesced unrecognized characters.
    Garbage,
}

impl SyntaxKind {
    /// Whitespace and comments: skipped by the parser.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::ParenComment
        )
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Hash => "`#`",
            Self::Semicolon => "`;`",
            Self::KwVariable => "`variable`",
            Self::Int => "integer literal",
            Self::StringLiteral | Self::UnclosedString => "string literal",
            Self::Word => "word",
            Self::Whitespace | Self::Newline => "whitespace",
            Self::LineComment | Self::ParenComment | Self::UnclosedComment => "comment",
            Self::Garbage => "unrecognized input",
        }
    }
}
