use crate::{
    ast::{
        arena::NodeId,
        node::{DefBody, NodeKind, Param},
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Position, Span,
};

use super::{
    expr::{parse_expr, parse_primary},
    lookups::BindingPower,
    parser::Parser,
    pattern::parse_pattern,
};

/// A statement is either a keyword-introduced construct or a bare
/// expression. Keywords are contextual: every word lexes as an
/// identifier, and only the leading position of a statement gives it
/// keyword meaning, so `let` remains usable as a function argument.
pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    if parser.current_token_kind() == TokenKind::Identifier {
        let keyword = parser.current_token().value.clone();
        if let Some(handler) = parser.stmt_handler(&keyword) {
            return handler(parser);
        }
    }

    parse_expr(parser, BindingPower::Default)
}

/// Statements up to a closing `end`, which is consumed.
fn parse_block_body(parser: &mut Parser, construct: &str) -> Result<Vec<NodeId>, Error> {
    let mut body = vec![];
    while !parser.at_keyword("end") {
        if !parser.has_tokens() {
            let span = parser.current_token().span;
            return Err(parser.error(
                ErrorKind::MissingTerminator {
                    construct: String::from(construct),
                    expected: String::from("end"),
                },
                span,
            ));
        }
        body.push(parse_stmt(parser)?);
    }
    parser.advance(); // end
    Ok(body)
}

pub fn parse_module_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // module

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected a module name")?
        .value;
    let body = parse_block_body(parser, "module")?;

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Module { name, body }, span))
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // import

    let token = parser.expect_detailed(TokenKind::String, "expected a quoted path")?;
    let span = Span::new(start, token.span.end);
    Ok(parser.alloc(NodeKind::Import { path: token.value }, span))
}

pub fn parse_include_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // include

    let token = parser.expect_detailed(TokenKind::String, "expected a quoted path")?;
    let span = Span::new(start, token.span.end);
    Ok(parser.alloc(NodeKind::Include { path: token.value }, span))
}

pub fn parse_def_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let (start, name, params, body) = parse_definition(parser, "def")?;
    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Def { name, params, body }, span))
}

pub fn parse_macro_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let (start, name, params, body) = parse_definition(parser, "macro")?;
    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Macro { name, params, body }, span))
}

/// Shared by `def` and `macro`: name, optional parameter list, `:`, then
/// either a single expression closed by `;` or a statement block closed
/// by `end`.
fn parse_definition(
    parser: &mut Parser,
    construct: &str,
) -> Result<(Position, String, Vec<Param>, DefBody), Error> {
    let start = parser.advance().span.start;

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected a function name")?
        .value;

    let params = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_parameter_list(parser)?
    } else {
        vec![]
    };

    parser.expect_colon()?;

    if parser.at_keyword("end") {
        parser.advance();
        return Ok((start, name, params, DefBody::Block(vec![])));
    }

    let first = parse_stmt(parser)?;
    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok((start, name, params, DefBody::Expr(first)));
    }

    let mut body = vec![first];
    while !parser.at_keyword("end") {
        if !parser.has_tokens() {
            let span = parser.current_token().span;
            return Err(parser.error(
                ErrorKind::MissingTerminator {
                    construct: String::from(construct),
                    expected: String::from("; or end"),
                },
                span,
            ));
        }
        body.push(parse_stmt(parser)?);
    }
    parser.advance(); // end

    Ok((start, name, params, DefBody::Block(body)))
}

pub fn parse_parameter_list(parser: &mut Parser) -> Result<Vec<Param>, Error> {
    let open_span = parser.expect(TokenKind::OpenParen)?.span;

    let mut params: Vec<Param> = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        if !params.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        if parser.current_token_kind() == TokenKind::DotDot {
            parser.advance();
            let name = parser
                .expect_detailed(TokenKind::Identifier, "expected a name after `..`")?
                .value;
            params.push(Param {
                name,
                default: None,
                variadic: true,
            });
            continue;
        }

        let name = parser
            .expect_detailed(TokenKind::Identifier, "expected a parameter name")?
            .value;
        let default = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_primary(parser)?)
        } else {
            None
        };
        params.push(Param {
            name,
            default,
            variadic: false,
        });
    }

    if parser.current_token_kind() != TokenKind::CloseParen {
        return Err(parser.error(
            ErrorKind::UnbalancedDelimiter { delimiter: '(' },
            open_span,
        ));
    }
    let close_span = parser.advance().span;

    // A variadic parameter swallows the rest of the arguments, so it can
    // only come last
    if let Some(index) = params.iter().position(|p| p.variadic) {
        if index != params.len() - 1 {
            return Err(parser.error(
                ErrorKind::VariadicParameterNotLast {
                    name: params[index].name.clone(),
                },
                close_span,
            ));
        }
    }

    Ok(params)
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // let

    let name = parser
        .expect_detailed(
            TokenKind::Identifier,
            "expected identifier during variable declaration",
        )?
        .value;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = Span::new(start, parser.node_span(value).end);
    Ok(parser.alloc(NodeKind::Let { name, value }, span))
}

pub fn parse_var_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // var

    let name = parser
        .expect_detailed(
            TokenKind::Identifier,
            "expected identifier during variable declaration",
        )?
        .value;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = Span::new(start, parser.node_span(value).end);
    Ok(parser.alloc(NodeKind::Var { name, value }, span))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // if

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_colon()?;
    let then_body = parse_primary(parser)?;

    let mut elif_clauses = vec![];
    while parser.at_keyword("elif") {
        parser.advance();
        let cond = parse_expr(parser, BindingPower::Default)?;
        parser.expect_colon()?;
        let body = parse_primary(parser)?;
        elif_clauses.push((cond, body));
    }

    let else_body = if parser.at_keyword("else") {
        parser.advance();
        parser.expect_colon()?;
        Some(parse_primary(parser)?)
    } else {
        None
    };

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(
        NodeKind::If {
            condition,
            then_body,
            elif_clauses,
            else_body,
        },
        span,
    ))
}

pub fn parse_match_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // match

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_colon()?;

    let mut arms = vec![];
    while parser.current_token_kind() == TokenKind::Pipe {
        let arm_start = parser.advance().span.start;
        let pattern = parse_pattern(parser)?;

        let guard = if parser.at_keyword("if") {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        parser.expect_colon()?;
        let body = parse_primary(parser)?;

        let span = Span::new(arm_start, parser.node_span(body).end);
        arms.push(parser.alloc(
            NodeKind::MatchArm {
                pattern,
                guard,
                body,
            },
            span,
        ));
    }

    if arms.is_empty() {
        let span = parser.current_token().span;
        return Err(parser.error(
            ErrorKind::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("a match needs at least one `|` arm"),
            },
            span,
        ));
    }

    if !parser.at_keyword("end") {
        let span = parser.current_token().span;
        return Err(parser.error(
            ErrorKind::MissingTerminator {
                construct: String::from("match"),
                expected: String::from("end"),
            },
            span,
        ));
    }
    let end = parser.advance().span.end;

    Ok(parser.alloc(NodeKind::Match { value, arms }, Span::new(start, end)))
}

pub fn parse_foreach_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // foreach

    parser.expect(TokenKind::OpenParen)?;
    let variable = parser
        .expect_detailed(TokenKind::Identifier, "expected a loop variable")?
        .value;
    parser.expect(TokenKind::Comma)?;
    let iterable = parse_expr(parser, BindingPower::Default)?;
    parser.expect_closing(TokenKind::CloseParen, '(')?;
    parser.expect_colon()?;

    // foreach alone also closes with `;`
    let mut body = vec![];
    loop {
        if parser.at_keyword("end") || parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            break;
        }
        if !parser.has_tokens() {
            let span = parser.current_token().span;
            return Err(parser.error(
                ErrorKind::MissingTerminator {
                    construct: String::from("foreach"),
                    expected: String::from("end or ;"),
                },
                span,
            ));
        }
        body.push(parse_stmt(parser)?);
    }

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(
        NodeKind::Foreach {
            variable,
            iterable,
            body,
        },
        span,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // while

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_colon()?;

    let body = parse_block_body(parser, "while")?;

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::While { condition, body }, span))
}

pub fn parse_until_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // until

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_colon()?;

    let body = parse_block_body(parser, "until")?;

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Until { condition, body }, span))
}

pub fn parse_loop_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // loop

    parser.expect_colon()?;
    let body = parse_block_body(parser, "loop")?;

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Loop { body }, span))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let span = parser.advance().span;
    Ok(parser.alloc(NodeKind::Break, span))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let span = parser.advance().span;
    Ok(parser.alloc(NodeKind::Continue, span))
}

pub fn parse_do_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // do

    let body = parse_block_body(parser, "do")?;

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(NodeKind::Block { body }, span))
}
