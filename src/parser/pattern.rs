use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::{
        arena::NodeId,
        node::{Literal, NodeKind, TypeName},
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

lazy_static! {
    static ref TYPE_NAME_LOOKUP: HashMap<&'static str, TypeName> = HashMap::from([
        ("string", TypeName::String),
        ("number", TypeName::Number),
        ("array", TypeName::Array),
        ("dict", TypeName::Dict),
        ("bool", TypeName::Bool),
        ("none", TypeName::None),
        ("markdown", TypeName::Markdown),
    ]);
}

/// Parses one match-arm pattern. Patterns are a restricted sub-grammar:
/// literals, `:type` tests, `_`, binding names, and array/dict
/// destructuring.
pub fn parse_pattern(parser: &mut Parser) -> Result<NodeId, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance();
            // the lexeme is [0-9]+(\.[0-9]+)?; out-of-range values
            // saturate to infinity, so this cannot fail
            let value = token.value.parse::<f64>().unwrap_or_default();
            Ok(parser.alloc(
                NodeKind::LiteralPattern(Literal::Number(value)),
                token.span,
            ))
        }
        TokenKind::String => {
            let token = parser.advance();
            Ok(parser.alloc(
                NodeKind::LiteralPattern(Literal::String(token.value)),
                token.span,
            ))
        }
        TokenKind::Symbol => {
            let token = parser.advance();
            let Some(type_name) = TYPE_NAME_LOOKUP.get(token.value.as_str()) else {
                return Err(parser.error(
                    ErrorKind::InvalidPattern {
                        token: format!(":{}", token.value),
                    },
                    token.span,
                ));
            };
            Ok(parser.alloc(NodeKind::TypePattern(*type_name), token.span))
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            let kind = match token.value.as_str() {
                "true" => NodeKind::LiteralPattern(Literal::Bool(true)),
                "false" => NodeKind::LiteralPattern(Literal::Bool(false)),
                "None" => NodeKind::LiteralPattern(Literal::None),
                "_" => NodeKind::WildcardPattern,
                _ => NodeKind::VariablePattern { name: token.value },
            };
            Ok(parser.alloc(kind, token.span))
        }
        TokenKind::OpenBracket => parse_array_pattern(parser),
        TokenKind::OpenCurly => parse_dict_pattern(parser),
        _ => {
            let token = parser.current_token();
            Err(parser.error(
                ErrorKind::InvalidPattern {
                    token: token.value.clone(),
                },
                token.span,
            ))
        }
    }
}

fn parse_array_pattern(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // [

    let mut elements = vec![];
    let mut rest_span: Option<Span> = None;
    while parser.current_token_kind() != TokenKind::CloseBracket && parser.has_tokens() {
        if !elements.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        // A rest element anywhere but last leaves nothing for the tail
        // bindings to match
        if let Some(span) = rest_span {
            return Err(parser.error(
                ErrorKind::InvalidPattern {
                    token: String::from(".."),
                },
                span,
            ));
        }

        if parser.current_token_kind() == TokenKind::DotDot {
            let dots = parser.advance();
            let name = parser
                .expect_detailed(TokenKind::Identifier, "expected a name after `..`")?
                .value;
            let span = Span::new(dots.span.start, parser.prev_span().end);
            elements.push(parser.alloc(NodeKind::RestPattern { name }, span));
            rest_span = Some(span);
        } else {
            // Elements are binding names only; literals, type tests, and
            // nested destructuring are not part of the array sub-grammar
            if parser.current_token_kind() != TokenKind::Identifier {
                let token = parser.current_token();
                return Err(parser.error(
                    ErrorKind::InvalidPattern {
                        token: token.value.clone(),
                    },
                    token.span,
                ));
            }
            let token = parser.advance();
            let kind = if token.value == "_" {
                NodeKind::WildcardPattern
            } else {
                NodeKind::VariablePattern { name: token.value }
            };
            elements.push(parser.alloc(kind, token.span));
        }
    }

    let end = parser
        .expect_closing(TokenKind::CloseBracket, '[')?
        .span
        .end;
    Ok(parser.alloc(NodeKind::ArrayPattern { elements }, Span::new(start, end)))
}

fn parse_dict_pattern(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // {

    let mut keys = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        if !keys.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        let key = parser
            .expect_detailed(TokenKind::Identifier, "expected a dict key to bind")?
            .value;
        keys.push(key);
    }

    let end = parser
        .expect_closing(TokenKind::CloseCurly, '{')?
        .span
        .end;
    Ok(parser.alloc(NodeKind::DictPattern { keys }, Span::new(start, end)))
}
