//! Unit tests for error handling.

use std::rc::Rc;

use crate::{Position, Span};

use super::errors::{Error, ErrorCategory, ErrorKind, ErrorTip};

fn span_at(offset: u32, line: u32, column: u32) -> Span {
    Span::point(Position {
        offset,
        line,
        column,
    })
}

#[test]
fn test_error_name() {
    let error = Error::new(
        ErrorKind::UnrecognisedCharacter { character: '@' },
        span_at(10, 2, 3),
        Rc::new(String::from("test.mq")),
    );

    assert_eq!(error.name(), "UnrecognisedCharacter");
}

#[test]
fn test_error_display_includes_location() {
    let error = Error::new(
        ErrorKind::UnexpectedToken {
            token: String::from(")"),
        },
        span_at(4, 1, 5),
        Rc::new(String::from("query.mq")),
    );

    assert_eq!(error.to_string(), "query.mq:1:5: unexpected token: \")\"");
}

#[test]
fn test_error_categories() {
    let file = Rc::new(String::from("test.mq"));

    let lex = Error::new(
        ErrorKind::UnterminatedString,
        span_at(0, 1, 1),
        Rc::clone(&file),
    );
    assert_eq!(lex.category(), ErrorCategory::Lex);

    let syntax = Error::new(
        ErrorKind::InvalidAssignmentTarget {
            found: String::from("a literal"),
        },
        span_at(0, 1, 1),
        Rc::clone(&file),
    );
    assert_eq!(syntax.category(), ErrorCategory::Syntax);

    let unbalanced = Error::new(
        ErrorKind::UnbalancedDelimiter { delimiter: '(' },
        span_at(0, 1, 1),
        file,
    );
    assert_eq!(unbalanced.category(), ErrorCategory::UnbalancedDelimiter);
}

#[test]
fn test_error_tips() {
    let error = Error::new(
        ErrorKind::MissingTerminator {
            construct: String::from("def"),
            expected: String::from("; or end"),
        },
        span_at(0, 1, 1),
        Rc::new(String::from("test.mq")),
    );

    let ErrorTip::Suggestion(tip) = error.tip() else {
        panic!("expected a suggestion");
    };
    assert!(tip.contains("def"));

    let error = Error::new(
        ErrorKind::UnrecognisedCharacter { character: '@' },
        span_at(0, 1, 1),
        Rc::new(String::from("test.mq")),
    );
    assert!(matches!(error.tip(), ErrorTip::None));
}
