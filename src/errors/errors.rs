use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

use crate::Span;

/// Error categories from the parsing pipeline.
///
/// `Lex` errors come from the tokenizer, `Syntax` errors from the
/// statement/expression/pattern parsers, and `UnbalancedDelimiter` covers
/// unmatched `(`/`[`/`{` and unterminated `${...}` interpolations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Syntax,
    UnbalancedDelimiter,
}

#[derive(Debug, Clone, Error)]
#[error("{file}:{}:{}: {kind}", .span.start.line, .span.start.column)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    file: Rc<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span, file: Rc<String>) -> Self {
        Error { kind, span, file }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            ErrorKind::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorKind::UnterminatedString { .. } => "UnterminatedString",
            ErrorKind::UnterminatedInterpolation => "UnterminatedInterpolation",
            ErrorKind::UnbalancedDelimiter { .. } => "UnbalancedDelimiter",
            ErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorKind::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorKind::MissingTerminator { .. } => "MissingTerminator",
            ErrorKind::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            ErrorKind::InvalidPattern { .. } => "InvalidPattern",
            ErrorKind::VariadicParameterNotLast { .. } => "VariadicParameterNotLast",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.kind {
            ErrorKind::UnrecognisedCharacter { .. } | ErrorKind::UnterminatedString { .. } => {
                ErrorCategory::Lex
            }
            ErrorKind::UnterminatedInterpolation | ErrorKind::UnbalancedDelimiter { .. } => {
                ErrorCategory::UnbalancedDelimiter
            }
            ErrorKind::UnexpectedToken { .. }
            | ErrorKind::UnexpectedTokenDetailed { .. }
            | ErrorKind::MissingTerminator { .. }
            | ErrorKind::InvalidAssignmentTarget { .. }
            | ErrorKind::InvalidPattern { .. }
            | ErrorKind::VariadicParameterNotLast { .. } => ErrorCategory::Syntax,
        }
    }

    pub fn tip(&self) -> ErrorTip {
        match &self.kind {
            ErrorKind::UnrecognisedCharacter { .. } => ErrorTip::None,
            ErrorKind::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("Did you forget a closing `\"`?"))
            }
            ErrorKind::UnterminatedInterpolation => ErrorTip::Suggestion(String::from(
                "Interpolations opened with `${` must be closed with `}`",
            )),
            ErrorKind::UnbalancedDelimiter { delimiter } => {
                ErrorTip::Suggestion(format!("`{}` here is never closed", delimiter))
            }
            ErrorKind::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorKind::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorKind::MissingTerminator {
                construct,
                expected,
            } => ErrorTip::Suggestion(format!(
                "`{}` is missing its closing `{}`",
                construct, expected
            )),
            ErrorKind::InvalidAssignmentTarget { found } => ErrorTip::Suggestion(format!(
                "Cannot assign to {}; only identifiers and selector chains are assignable",
                found
            )),
            ErrorKind::InvalidPattern { token } => {
                ErrorTip::Suggestion(format!("`{}` is not a valid match pattern", token))
            }
            ErrorKind::VariadicParameterNotLast { name } => ErrorTip::Suggestion(format!(
                "Variadic parameter `..{}` must be the final parameter",
                name
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorKind {
    #[error("unrecognised character: {character:?}")]
    UnrecognisedCharacter { character: char },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated interpolation")]
    UnterminatedInterpolation,
    #[error("unbalanced delimiter: {delimiter:?}")]
    UnbalancedDelimiter { delimiter: char },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("missing {expected:?} to terminate {construct}")]
    MissingTerminator { construct: String, expected: String },
    #[error("invalid assignment target: {found}")]
    InvalidAssignmentTarget { found: String },
    #[error("invalid pattern: {token:?}")]
    InvalidPattern { token: String },
    #[error("variadic parameter {name:?} is not in last position")]
    VariadicParameterNotLast { name: String },
}
