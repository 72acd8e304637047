#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::ast::arena::Program;
use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in the source text: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A region of source text covering a token or AST node.
///
/// Invariant: `end.offset >= start.offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn point(position: Position) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    /// Smallest span covering both inputs.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: if self.start.offset <= other.start.offset {
                self.start
            } else {
                other.start
            },
            end: if self.end.offset >= other.end.offset {
                self.end
            } else {
                other.end
            },
        }
    }
}

/// Tokenizes and parses a whole source unit in one call.
///
/// The `file` label is used for diagnostics only; the parser performs no
/// I/O. `import`/`include` paths in the result are raw strings for an
/// external loader to resolve.
pub fn parse_source(source: &str, file: Option<String>) -> Result<Program, Error> {
    let name = Rc::new(file.unwrap_or_else(|| String::from("input")));
    let tokens = lexer::lexer::tokenize(source, Rc::clone(&name))?;
    parser::parser::parse(tokens, name)
}

pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..=end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    None
}

/// Renders an error as a caret-style report against the source text.
///
/// ```text
/// Error: UnexpectedToken (unexpected token: `@`)
/// -> query.mq
///    |
/// 20 | let a = @
///    | --------^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.span().start;
    let mut out = String::new();

    if let ErrorTip::None = error.tip() {
        out.push_str(&format!("Error: {}\n", error.name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.name(), error.tip()));
    }
    out.push_str(&format!("-> {}\n", error.file()));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!(
        "{} | {}\n",
        line_string,
        line_text_removed.trim_end()
    ));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
