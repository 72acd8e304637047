//! Parser implementation for building the mq abstract syntax tree.
//!
//! The parser uses a Pratt approach with NUD/LED handlers for expression
//! parsing and keyword-dispatched functions for statement parsing. It
//! maintains lookup tables for:
//! - Statement handlers, keyed by keyword text (keywords are contextual,
//!   so the key is the identifier's value, not a token kind)
//! - NUD (null denotation) handlers for prefix positions
//! - LED (left denotation) handlers for infix operators
//! - Binding powers for operator precedence
//!
//! Nodes are allocated into an index-based arena as they are parsed; the
//! finished [`Program`] owns the arena and the ordered top-level roots.

use std::rc::Rc;

use crate::{
    ast::{
        arena::{Arena, NodeId, Program},
        node::{Node, NodeKind},
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    lookups::{
        create_token_lookups, BindingPower, BpLookup, LedHandler, LedLookup, NudHandler, NudLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: Rc<String>,
    arena: Arena,
    stmt_lookup: StmtLookup,
    nud_lookup: NudLookup,
    led_lookup: LedLookup,
    binding_power_lookup: BpLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            arena: Arena::new(),
            stmt_lookup: StmtLookup::new(),
            nud_lookup: NudLookup::new(),
            led_lookup: LedLookup::new(),
            binding_power_lookup: BpLookup::new(),
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    /// Advances past the current token and returns it. The trailing EOF
    /// token is never consumed.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// Kind of the token `n` positions ahead of the cursor.
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        let index = usize::min(self.pos + n, self.tokens.len() - 1);
        self.tokens[index].kind
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            let token = self.current_token();
            return Err(self.error(
                ErrorKind::UnexpectedToken {
                    token: token.value.clone(),
                },
                token.span,
            ));
        }
        Ok(self.advance())
    }

    pub fn expect_detailed(
        &mut self,
        expected_kind: TokenKind,
        message: &str,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            let token = self.current_token();
            return Err(self.error(
                ErrorKind::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: String::from(message),
                },
                token.span,
            ));
        }
        Ok(self.advance())
    }

    /// Consumes a structural `:`.
    ///
    /// `:x` with no intervening space lexes as a symbol, so wherever the
    /// grammar wants a bare colon a symbol token is split back into `:`
    /// plus an identifier that becomes the new current token.
    pub fn expect_colon(&mut self) -> Result<(), Error> {
        match self.current_token_kind() {
            TokenKind::Colon => {
                self.advance();
                Ok(())
            }
            TokenKind::Symbol => {
                let token = &mut self.tokens[self.pos];
                token.kind = TokenKind::Identifier;
                token.span.start.offset += 1;
                token.span.start.column += 1;
                Ok(())
            }
            _ => {
                let token = self.current_token();
                Err(self.error(
                    ErrorKind::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from("expected `:`"),
                    },
                    token.span,
                ))
            }
        }
    }

    /// Consumes a closing delimiter, reporting an unbalanced-delimiter
    /// error when the input ends before it appears.
    pub fn expect_closing(
        &mut self,
        expected_kind: TokenKind,
        open_delimiter: char,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }
        if self.current_token_kind() == TokenKind::EOF {
            let span = self.current_token().span;
            return Err(self.error(
                ErrorKind::UnbalancedDelimiter {
                    delimiter: open_delimiter,
                },
                span,
            ));
        }
        let token = self.current_token();
        Err(self.error(
            ErrorKind::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span,
        ))
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// True when the current token is the given contextual keyword.
    pub fn at_keyword(&self, keyword: &str) -> bool {
        let token = self.current_token();
        token.kind == TokenKind::Identifier && token.value == keyword
    }

    /// Span of the most recently consumed token.
    pub fn prev_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_token().span;
        }
        self.tokens[self.pos - 1].span
    }

    pub fn error(&self, kind: ErrorKind, span: Span) -> Error {
        Error::new(kind, span, Rc::clone(&self.file))
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.arena.alloc(kind, span)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.arena.get_mut(id)
    }

    pub fn node_span(&self, id: NodeId) -> Span {
        self.arena.get(id).span
    }

    pub fn stmt_handler(&self, keyword: &str) -> Option<StmtHandler> {
        self.stmt_lookup.get(keyword).copied()
    }

    pub fn nud_handler(&self, kind: TokenKind) -> Option<NudHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn led_handler(&self, kind: TokenKind) -> Option<LedHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&kind)
            .unwrap_or(&BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LedHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Unlike LED registration this leaves the binding-power table alone:
    /// only infix operators may continue an expression, and a token with a
    /// NUD but no LED must terminate the enclosing expression cleanly
    /// (statements in mq are juxtaposed with no separator).
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NudHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a contextual keyword.
    pub fn stmt(&mut self, keyword: &'static str, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(keyword, stmt_fn);
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// This is the main entry point for parsing. It creates a parser
/// instance, initializes the lookup tables, and parses statements until
/// EOF. On failure the partial arena is discarded along with the parser;
/// no partial tree escapes.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let mut roots = vec![];

    while parser.has_tokens() {
        roots.push(parse_stmt(&mut parser)?);
    }

    Ok(Program {
        arena: parser.arena,
        roots,
        file,
    })
}
