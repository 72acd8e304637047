//! Lexical analysis module for the mq parser.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source text using an ordered regex pattern table
//! - Identifiers, numbers, strings, symbols, and operators
//! - Interpolated strings (`s"..${expr}.."`) via a mode stack
//! - Token position tracking for error reporting
//! - Comments and whitespace as trivia
//!
//! Keywords are not recognized here; they lex as identifiers and the
//! parser disambiguates them by position.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
