//! Syntactic analysis module for the mq parser.
//!
//! A Pratt parser over the token stream: each token kind maps to a NUD
//! (null denotation, prefix position) and/or LED (left denotation, infix
//! position) handler plus a binding power, and statements dispatch on
//! contextual keywords. Nodes are allocated into an index-based arena as
//! they are produced.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod pattern;
pub mod stmt;
