use crate::{
    ast::{
        arena::NodeId,
        node::{AssignOp, BinaryOp, Literal, NodeKind, SelectorSuffix, StringPart, UnaryOp},
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_parameter_list};

pub fn parse_expr(parser: &mut Parser, floor: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.nud_handler(token_kind) else {
        let token = parser.current_token();
        return Err(parser.error(
            ErrorKind::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span,
        ));
    };

    let mut left = nud(parser)?;

    // While the next token is an infix operator binding tighter than the
    // floor, continue extending the left-hand side
    loop {
        let token_kind = parser.current_token_kind();
        let bp = parser.binding_power(token_kind);
        if bp <= floor {
            break;
        }
        let Some(led) = parser.led_handler(token_kind) else {
            break;
        };
        left = led(parser, left, bp)?;
    }

    Ok(left)
}

/// Parses a primary expression: anything that can stand as one stage of a
/// pipe. Excludes pipes themselves and assignments.
pub fn parse_primary(parser: &mut Parser) -> Result<NodeId, Error> {
    parse_expr(parser, BindingPower::Pipeline)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance();
            // the lexeme is [0-9]+(\.[0-9]+)?; out-of-range values
            // saturate to infinity, so this cannot fail
            let value = token.value.parse::<f64>().unwrap_or_default();
            Ok(parser.alloc(NodeKind::Literal(Literal::Number(value)), token.span))
        }
        TokenKind::String => {
            let token = parser.advance();
            Ok(parser.alloc(NodeKind::Literal(Literal::String(token.value)), token.span))
        }
        TokenKind::Symbol => {
            let token = parser.advance();
            Ok(parser.alloc(NodeKind::Literal(Literal::Symbol(token.value)), token.span))
        }
        _ => {
            let token = parser.current_token();
            Err(parser.error(
                ErrorKind::UnexpectedToken {
                    token: token.value.clone(),
                },
                token.span,
            ))
        }
    }
}

/// Identifiers carry the contextual word-like literals: `true`, `false`,
/// `None`, `self`, `nodes`, and the `fn` introducing a function literal.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    if parser.current_token().value == "fn" && fn_literal_follows(parser) {
        return parse_function_literal(parser);
    }

    let token = parser.advance();
    let kind = match token.value.as_str() {
        "true" => NodeKind::Literal(Literal::Bool(true)),
        "false" => NodeKind::Literal(Literal::Bool(false)),
        "None" => NodeKind::Literal(Literal::None),
        "self" => NodeKind::SelfValue,
        "nodes" => NodeKind::Nodes,
        _ => NodeKind::Identifier { name: token.value },
    };
    Ok(parser.alloc(kind, token.span))
}

fn parse_function_literal(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // fn

    let params = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_parameter_list(parser)?
    } else {
        vec![]
    };

    parser.expect_colon()?;
    let body = parse_primary(parser)?;

    if parser.current_token_kind() != TokenKind::Semicolon {
        let span = parser.current_token().span;
        return Err(parser.error(
            ErrorKind::MissingTerminator {
                construct: String::from("function literal"),
                expected: String::from(";"),
            },
            span,
        ));
    }
    let end = parser.advance().span.end;

    Ok(parser.alloc(
        NodeKind::FunctionLiteral { params, body },
        Span::new(start, end),
    ))
}

/// `fn` commits to a function literal only when a `:` body marker follows
/// the (optional) parameter list. Anything else leaves `fn` an ordinary
/// identifier, so a function named `fn` stays callable.
fn fn_literal_follows(parser: &Parser) -> bool {
    match parser.peek_kind(1) {
        TokenKind::Colon | TokenKind::Symbol => true,
        TokenKind::OpenParen => {
            let mut depth = 0;
            let mut n = 1;
            loop {
                match parser.peek_kind(n) {
                    TokenKind::OpenParen => depth += 1,
                    TokenKind::CloseParen => {
                        depth -= 1;
                        if depth == 0 {
                            return matches!(
                                parser.peek_kind(n + 1),
                                TokenKind::Colon | TokenKind::Symbol
                            );
                        }
                    }
                    TokenKind::EOF => return false,
                    _ => {}
                }
                n += 1;
            }
        }
        _ => false,
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let op = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::Neg,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = Span::new(operator_token.span.start, parser.node_span(operand).end);

    Ok(parser.alloc(NodeKind::Unary { op, operand }, span))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let op = binary_op_for(operator_token.kind);

    // Same floor as the operator: equal-power operators associate left
    let right = parse_expr(parser, bp)?;
    let span = Span::new(
        parser.node_span(left).start,
        parser.node_span(right).end,
    );

    Ok(parser.alloc(NodeKind::Binary { op, left, right }, span))
}

fn binary_op_for(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEquals => BinaryOp::Ge,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => BinaryOp::Range,
    }
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    if !matches!(
        parser.node(left).kind,
        NodeKind::Identifier { .. } | NodeKind::Selector { .. }
    ) {
        let span = parser.node_span(left);
        let found = parser.node(left).kind.name();
        return Err(parser.error(
            ErrorKind::InvalidAssignmentTarget {
                found: String::from(found),
            },
            span,
        ));
    }

    let operator_token = parser.advance();
    let op = assign_op_for(operator_token.kind);

    // Floor below Assignment makes `a = b = c` associate right
    let value = parse_expr(parser, BindingPower::Default)?;
    let span = Span::new(
        parser.node_span(left).start,
        parser.node_span(value).end,
    );

    Ok(parser.alloc(
        NodeKind::Assignment {
            op,
            target: left,
            value,
        },
        span,
    ))
}

fn assign_op_for(kind: TokenKind) -> AssignOp {
    match kind {
        TokenKind::PipeEquals => AssignOp::PipeAssign,
        TokenKind::PlusEquals => AssignOp::AddAssign,
        TokenKind::MinusEquals => AssignOp::SubAssign,
        TokenKind::StarEquals => AssignOp::MulAssign,
        TokenKind::SlashEquals => AssignOp::DivAssign,
        TokenKind::PercentEquals => AssignOp::ModAssign,
        TokenKind::SlashSlashEquals => AssignOp::FloorDivAssign,
        _ => AssignOp::Assign,
    }
}

/// Collects every `|`-separated stage into one flat pipe node, so
/// `a | b | c` has three stages rather than nested pipes.
pub fn parse_pipe_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let mut stages = vec![left];
    let mut end = parser.node_span(left).end;

    while parser.current_token_kind() == TokenKind::Pipe {
        parser.advance();
        let stage = parse_primary(parser)?;
        end = parser.node_span(stage).end;
        stages.push(stage);
    }

    let span = Span::new(parser.node_span(left).start, end);
    Ok(parser.alloc(NodeKind::Pipe { stages }, span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start;
    let inner = parse_primary(parser)?;
    let end = parser
        .expect_closing(TokenKind::CloseParen, '(')?
        .span
        .end;

    Ok(parser.alloc(NodeKind::Group { inner }, Span::new(start, end)))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let NodeKind::Identifier { name } = &parser.node(left).kind else {
        let span = parser.current_token().span;
        return Err(parser.error(
            ErrorKind::UnexpectedTokenDetailed {
                token: String::from("("),
                message: String::from("only a named function can be called"),
            },
            span,
        ));
    };
    let name = name.clone();

    // The identifier node folds into the call; the arena slot it occupied
    // simply goes unreferenced
    let arguments = parse_argument_list(parser)?;
    let span = Span::new(parser.node_span(left).start, parser.prev_span().end);

    Ok(parser.alloc(NodeKind::Call { name, arguments }, span))
}

fn parse_argument_list(parser: &mut Parser) -> Result<Vec<NodeId>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_primary(parser)?);
    }

    parser.expect_closing(TokenKind::CloseParen, '(')?;
    Ok(arguments)
}

/// `mod::name`, with one token of lookahead deciding between a reference
/// and a call. No backtracking: either `(` immediately follows the
/// qualified name or it does not.
pub fn parse_qualified_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let NodeKind::Identifier { name: module } = &parser.node(left).kind else {
        let span = parser.node_span(left);
        let found = parser.node(left).kind.name();
        return Err(parser.error(
            ErrorKind::UnexpectedTokenDetailed {
                token: String::from("::"),
                message: format!("qualified access requires a module name, found {}", found),
            },
            span,
        ));
    };
    let module = module.clone();

    parser.advance(); // ::
    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected a function name after `::`")?
        .value;

    let arguments = if parser.current_token_kind() == TokenKind::OpenParen {
        Some(parse_argument_list(parser)?)
    } else {
        None
    };

    let span = Span::new(parser.node_span(left).start, parser.prev_span().end);
    Ok(parser.alloc(
        NodeKind::QualifiedAccess {
            module,
            name,
            arguments,
        },
        span,
    ))
}

/// A selector chain starting with `.` and an implicit receiver, e.g.
/// `.title`, `.[0]`, `.items[1:3]`.
pub fn parse_selector_root_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // .

    let suffix = match parser.current_token_kind() {
        TokenKind::Identifier => SelectorSuffix::Property(parser.advance().value),
        TokenKind::OpenBracket => parse_bracket_suffix(parser)?,
        _ => {
            let token = parser.current_token();
            return Err(parser.error(
                ErrorKind::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: String::from("expected a property or index after `.`"),
                },
                token.span,
            ));
        }
    };

    let span = Span::new(start, parser.prev_span().end);
    Ok(parser.alloc(
        NodeKind::Selector {
            base: None,
            suffixes: vec![suffix],
        },
        span,
    ))
}

/// Extends a selector chain with one more suffix; chains stay flat, each
/// suffix transforming the result of the previous one.
pub fn parse_selector_suffix_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let suffix = match parser.current_token_kind() {
        TokenKind::Dot => {
            parser.advance();
            let name = parser
                .expect_detailed(TokenKind::Identifier, "expected a property name after `.`")?
                .value;
            SelectorSuffix::Property(name)
        }
        _ => parse_bracket_suffix(parser)?,
    };

    let end = parser.prev_span().end;
    if matches!(parser.node(left).kind, NodeKind::Selector { .. }) {
        let node = parser.node_mut(left);
        if let NodeKind::Selector { suffixes, .. } = &mut node.kind {
            suffixes.push(suffix);
        }
        node.span.end = end;
        return Ok(left);
    }

    let span = Span::new(parser.node_span(left).start, end);
    Ok(parser.alloc(
        NodeKind::Selector {
            base: Some(left),
            suffixes: vec![suffix],
        },
        span,
    ))
}

fn parse_bracket_suffix(parser: &mut Parser) -> Result<SelectorSuffix, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        return Ok(SelectorSuffix::Index(None));
    }

    let first = parse_primary(parser)?;

    if matches!(
        parser.current_token_kind(),
        TokenKind::Colon | TokenKind::Symbol
    ) {
        parser.expect_colon()?;
        let end = parse_primary(parser)?;
        parser.expect_closing(TokenKind::CloseBracket, '[')?;
        return Ok(SelectorSuffix::Slice(first, end));
    }

    parser.expect_closing(TokenKind::CloseBracket, '[')?;
    Ok(SelectorSuffix::Index(Some(first)))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start;

    let mut elements = vec![];
    while parser.current_token_kind() != TokenKind::CloseBracket && parser.has_tokens() {
        if !elements.is_empty() {
            parser.expect(TokenKind::Comma)?;
            // Trailing comma
            if parser.current_token_kind() == TokenKind::CloseBracket {
                break;
            }
        }
        elements.push(parse_primary(parser)?);
    }

    let end = parser
        .expect_closing(TokenKind::CloseBracket, '[')?
        .span
        .end;
    Ok(parser.alloc(NodeKind::Array { elements }, Span::new(start, end)))
}

pub fn parse_dict_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start;

    let mut entries = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        if !entries.is_empty() {
            parser.expect(TokenKind::Comma)?;
            if parser.current_token_kind() == TokenKind::CloseCurly {
                break;
            }
        }

        let key = match parser.current_token_kind() {
            TokenKind::Identifier => {
                let token = parser.advance();
                parser.alloc(NodeKind::Identifier { name: token.value }, token.span)
            }
            TokenKind::String => {
                let token = parser.advance();
                parser.alloc(NodeKind::Literal(Literal::String(token.value)), token.span)
            }
            _ => {
                let token = parser.current_token();
                return Err(parser.error(
                    ErrorKind::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from("expected an identifier or string dict key"),
                    },
                    token.span,
                ));
            }
        };

        parser.expect_colon()?;
        let value = parse_primary(parser)?;

        let span = Span::new(parser.node_span(key).start, parser.node_span(value).end);
        entries.push(parser.alloc(NodeKind::DictEntry { key, value }, span));
    }

    let end = parser
        .expect_closing(TokenKind::CloseCurly, '{')?
        .span
        .end;
    Ok(parser.alloc(NodeKind::Dict { entries }, Span::new(start, end)))
}

pub fn parse_interpolated_string_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start; // s"

    let mut parts = vec![];
    let end;
    loop {
        match parser.current_token_kind() {
            TokenKind::StringPart => {
                parts.push(StringPart::Text(parser.advance().value));
            }
            TokenKind::EscapedDollar => {
                parser.advance();
                parts.push(StringPart::Dollar);
            }
            TokenKind::InterpolationStart => {
                parser.advance();
                let expr = parse_primary(parser)?;
                if parser.current_token_kind() != TokenKind::InterpolationEnd {
                    let token = parser.current_token();
                    let error = if token.kind == TokenKind::EOF {
                        parser.error(ErrorKind::UnterminatedInterpolation, token.span)
                    } else {
                        parser.error(
                            ErrorKind::UnexpectedTokenDetailed {
                                token: token.value.clone(),
                                message: String::from("expected `}` to close the interpolation"),
                            },
                            token.span,
                        )
                    };
                    return Err(error);
                }
                parser.advance();
                parts.push(StringPart::Expr(expr));
            }
            TokenKind::InterpolatedStringEnd => {
                end = parser.advance().span.end;
                break;
            }
            _ => {
                let token = parser.current_token();
                return Err(parser.error(
                    ErrorKind::UnterminatedString,
                    token.span,
                ));
            }
        }
    }

    Ok(parser.alloc(NodeKind::InterpolatedString { parts }, Span::new(start, end)))
}
