//! Unit tests for the lexer module.
//!
//! Covers tokenization of identifiers, numbers, strings, symbols,
//! operators, comments, interpolated strings, and error cases.

use std::rc::Rc;

use crate::errors::errors::ErrorKind;

use super::{lexer::tokenize, tokens::TokenKind};

fn lex(source: &str) -> Vec<super::tokens::Token> {
    tokenize(source, Rc::new(String::from("test.mq"))).unwrap()
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo bar_2 _underscore CamelCase");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar_2");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "_underscore");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "CamelCase");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_keywords_lex_as_identifiers() {
    let tokens = lex("def let while end if");

    for token in &tokens[..5] {
        assert_eq!(token.kind, TokenKind::Identifier);
    }
    assert_eq!(tokens[0].value, "def");
    assert_eq!(tokens[4].value, "if");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 0 100.5");

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "with \"quotes\"" "tab\there""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "with \"quotes\"");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "tab\there");
}

#[test]
fn test_tokenize_symbols() {
    let tokens = lex(":string :h1 :foo_bar");

    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[0].value, "string");
    assert_eq!(tokens[1].kind, TokenKind::Symbol);
    assert_eq!(tokens[1].value, "h1");
    assert_eq!(tokens[2].kind, TokenKind::Symbol);
    assert_eq!(tokens[2].value, "foo_bar");
}

#[test]
fn test_colon_with_space_is_not_a_symbol() {
    let tokens = lex(": x");

    assert_eq!(tokens[0].kind, TokenKind::Colon);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn test_tokenize_operators() {
    let tokens = lex("+ - * / % == != <= >= < > && || ! = .. :: | .");

    let expected = [
        TokenKind::Plus,
        TokenKind::Dash,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Equals,
        TokenKind::NotEquals,
        TokenKind::LessEquals,
        TokenKind::GreaterEquals,
        TokenKind::Less,
        TokenKind::Greater,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Assignment,
        TokenKind::DotDot,
        TokenKind::ColonColon,
        TokenKind::Pipe,
        TokenKind::Dot,
    ];
    for (token, kind) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
    }
}

#[test]
fn test_tokenize_compound_assignment_operators() {
    let tokens = lex("|= += -= *= /= %= //=");

    let expected = [
        TokenKind::PipeEquals,
        TokenKind::PlusEquals,
        TokenKind::MinusEquals,
        TokenKind::StarEquals,
        TokenKind::SlashEquals,
        TokenKind::PercentEquals,
        TokenKind::SlashSlashEquals,
    ];
    for (token, kind) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
    }
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("1 # a comment\n2");

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_position_tracking() {
    let tokens = lex("foo\n  bar");

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[1].span.start.line, 2);
    assert_eq!(tokens[1].span.start.column, 3);
    assert_eq!(tokens[1].span.start.offset, 6);
}

#[test]
fn test_tokenize_interpolated_string() {
    let tokens = lex(r#"s"a${x}b""#);

    assert_eq!(tokens[0].kind, TokenKind::InterpolatedStringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringPart);
    assert_eq!(tokens[1].value, "a");
    assert_eq!(tokens[2].kind, TokenKind::InterpolationStart);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "x");
    assert_eq!(tokens[4].kind, TokenKind::InterpolationEnd);
    assert_eq!(tokens[5].kind, TokenKind::StringPart);
    assert_eq!(tokens[5].value, "b");
    assert_eq!(tokens[6].kind, TokenKind::InterpolatedStringEnd);
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_interpolation_with_nested_braces() {
    let tokens = lex(r#"s"${{a: 1}}""#);

    assert_eq!(tokens[0].kind, TokenKind::InterpolatedStringStart);
    assert_eq!(tokens[1].kind, TokenKind::InterpolationStart);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::Colon);
    assert_eq!(tokens[5].kind, TokenKind::Number);
    assert_eq!(tokens[6].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[7].kind, TokenKind::InterpolationEnd);
    assert_eq!(tokens[8].kind, TokenKind::InterpolatedStringEnd);
}

#[test]
fn test_escaped_dollar() {
    let tokens = lex(r#"s"price: $$100""#);

    assert_eq!(tokens[0].kind, TokenKind::InterpolatedStringStart);
    assert_eq!(tokens[1].kind, TokenKind::StringPart);
    assert_eq!(tokens[1].value, "price: ");
    assert_eq!(tokens[2].kind, TokenKind::EscapedDollar);
    assert_eq!(tokens[3].kind, TokenKind::StringPart);
    assert_eq!(tokens[3].value, "100");
    assert_eq!(tokens[4].kind, TokenKind::InterpolatedStringEnd);
}

#[test]
fn test_unterminated_string() {
    let result = tokenize("\"abc", Rc::new(String::from("test.mq")));

    let error = result.unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnterminatedString));
}

#[test]
fn test_unterminated_interpolation() {
    let result = tokenize("s\"a${1 + ", Rc::new(String::from("test.mq")));

    let error = result.unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::UnterminatedInterpolation));
}

#[test]
fn test_unrecognised_character() {
    let result = tokenize("let x = @", Rc::new(String::from("test.mq")));

    let error = result.unwrap_err();
    assert!(matches!(
        error.kind(),
        ErrorKind::UnrecognisedCharacter { .. }
    ));
}
