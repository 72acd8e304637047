use std::collections::HashMap;

use crate::{ast::arena::NodeId, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence levels, weakest first.
///
/// `Default` is the floor for a full expression (pipes and assignments
/// included); `Pipeline` is the floor for a primary expression, i.e.
/// everything that may appear as one stage of a pipe.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Pipeline,
    Or,
    And,
    Equality,
    Relational,
    Range,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Qualified,
    Member,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<NodeId, Error>;
pub type NudHandler = fn(&mut Parser) -> Result<NodeId, Error>;
pub type LedHandler = fn(&mut Parser, NodeId, BindingPower) -> Result<NodeId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment (right-associative, binds weakest of all operators)
    parser.led(
        TokenKind::Assignment,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::PipeEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::PlusEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::MinusEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::StarEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::SlashEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::PercentEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );
    parser.led(
        TokenKind::SlashSlashEquals,
        BindingPower::Assignment,
        parse_assignment_expr,
    );

    // Pipe sits below every other infix operator so pipelines can span
    // lines and stages stay primary expressions
    parser.led(TokenKind::Pipe, BindingPower::Pipeline, parse_pipe_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::Or, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::And, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    parser.led(
        TokenKind::NotEquals,
        BindingPower::Equality,
        parse_binary_expr,
    );
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(
        TokenKind::LessEquals,
        BindingPower::Relational,
        parse_binary_expr,
    );
    parser.led(
        TokenKind::Greater,
        BindingPower::Relational,
        parse_binary_expr,
    );
    parser.led(
        TokenKind::GreaterEquals,
        BindingPower::Relational,
        parse_binary_expr,
    );

    // Range
    parser.led(TokenKind::DotDot, BindingPower::Range, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(
        TokenKind::Star,
        BindingPower::Multiplicative,
        parse_binary_expr,
    );
    parser.led(
        TokenKind::Slash,
        BindingPower::Multiplicative,
        parse_binary_expr,
    );
    parser.led(
        TokenKind::Percent,
        BindingPower::Multiplicative,
        parse_binary_expr,
    );

    // Calls and qualified access
    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    parser.led(
        TokenKind::ColonColon,
        BindingPower::Qualified,
        parse_qualified_expr,
    );

    // Selector suffixes
    parser.led(TokenKind::Dot, BindingPower::Member, parse_selector_suffix_expr);
    parser.led(
        TokenKind::OpenBracket,
        BindingPower::Member,
        parse_selector_suffix_expr,
    );

    // Literals and primaries
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Symbol, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::OpenCurly, parse_dict_expr);
    parser.nud(TokenKind::Dot, parse_selector_root_expr);
    parser.nud(
        TokenKind::InterpolatedStringStart,
        parse_interpolated_string_expr,
    );

    // Statements, dispatched on contextual keywords
    parser.stmt("module", parse_module_stmt);
    parser.stmt("import", parse_import_stmt);
    parser.stmt("include", parse_include_stmt);
    parser.stmt("def", parse_def_stmt);
    parser.stmt("macro", parse_macro_stmt);
    parser.stmt("let", parse_let_stmt);
    parser.stmt("var", parse_var_stmt);
    parser.stmt("if", parse_if_stmt);
    parser.stmt("match", parse_match_stmt);
    parser.stmt("foreach", parse_foreach_stmt);
    parser.stmt("while", parse_while_stmt);
    parser.stmt("until", parse_until_stmt);
    parser.stmt("loop", parse_loop_stmt);
    parser.stmt("break", parse_break_stmt);
    parser.stmt("continue", parse_continue_stmt);
    parser.stmt("do", parse_do_stmt);
}

// Lookup tables inside the parser struct
pub type StmtLookup = HashMap<&'static str, StmtHandler>;
pub type NudLookup = HashMap<TokenKind, NudHandler>;
pub type LedLookup = HashMap<TokenKind, LedHandler>;
pub type BpLookup = HashMap<TokenKind, BindingPower>;
