use std::fmt::Display;

use crate::Span;

/// Lexical token kinds.
///
/// Keywords are not a separate class: `let`, `def`, `end` and friends all
/// lex as `Identifier` and are recognized contextually by the parser. A
/// `Symbol` is `:name` with no space after the colon; its `value` holds the
/// name without the leading colon.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,
    Symbol,

    // Interpolated string structure (s"..${expr}..")
    InterpolatedStringStart,
    StringPart,
    EscapedDollar,
    InterpolationStart,
    InterpolationEnd,
    InterpolatedStringEnd,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,
    Pipe,

    ColonColon,
    DotDot,
    Dot,
    Comma,
    Colon,
    Semicolon,

    PipeEquals,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,
    SlashSlashEquals,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{ kind: {}, value: {} }}", self.kind, self.value)
    }
}
