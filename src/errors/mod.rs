//! Error types shared by the lexer and parser.

pub mod errors;

#[cfg(test)]
mod tests;
