use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorKind},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind};

pub type PatternHandler = fn(&mut Lexer<'_>, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: PatternHandler,
}

lazy_static! {
    /// Ordered pattern table, longest match first. All patterns are
    /// anchored so a match is always at the cursor.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^s\"").unwrap(), handler: interpolated_string_handler },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: identifier_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^#.*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^::").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ColonColon, "::") },
        RegexPattern { regex: Regex::new("^:[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^//=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashSlashEquals, "//=") },
        RegexPattern { regex: Regex::new("^\\|=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=") },
        RegexPattern { regex: Regex::new("^\\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=") },
        RegexPattern { regex: Regex::new("^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=") },
        RegexPattern { regex: Regex::new("^\\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=") },
        RegexPattern { regex: Regex::new("^/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=") },
        RegexPattern { regex: Regex::new("^%=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new("^\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new("^\\.\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: open_curly_handler },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: close_curly_handler },
    ];
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    /// One entry per open `${...}` interpolation, holding the current
    /// `{`/`}` nesting depth inside it.
    interpolations: Vec<u32>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Rc<String>) -> Lexer<'a> {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            column: 1,
            file,
            interpolations: vec![],
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.pos as u32,
            line: self.line,
            column: self.column,
        }
    }

    /// Advances the cursor over the next `len` bytes, updating line and
    /// column counters.
    pub fn advance_over(&mut self, len: usize) {
        for ch in self.source[self.pos..self.pos + len].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }

    fn error(&self, kind: ErrorKind, span: Span) -> Error {
        Error::new(kind, span, Rc::clone(&self.file))
    }
}

fn identifier_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.position();

    lexer.advance_over(value.len());
    lexer.push(MK_TOKEN!(
        TokenKind::Identifier,
        value,
        Span::new(start, lexer.position())
    ));
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.position();

    lexer.advance_over(value.len());
    lexer.push(MK_TOKEN!(
        TokenKind::Number,
        value,
        Span::new(start, lexer.position())
    ));
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().end();
    lexer.advance_over(matched);
    Ok(())
}

/// Symbols lex as `:name`; the token value holds `name` without the colon.
fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str();
    let value = matched[1..].to_string();
    let start = lexer.position();

    lexer.advance_over(matched.len());
    lexer.push(MK_TOKEN!(
        TokenKind::Symbol,
        value,
        Span::new(start, lexer.position())
    ));
    Ok(())
}

/// Maps the character after a backslash to the character it denotes.
/// Any character without a dedicated meaning escapes to itself.
fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        _ => ch,
    }
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();
    lexer.advance_over(1); // opening quote

    let mut value = String::new();
    loop {
        let Some(ch) = lexer.at() else {
            return Err(lexer.error(
                ErrorKind::UnterminatedString,
                Span::new(start, lexer.position()),
            ));
        };

        match ch {
            '"' => {
                lexer.advance_over(1);
                lexer.push(MK_TOKEN!(
                    TokenKind::String,
                    value,
                    Span::new(start, lexer.position())
                ));
                return Ok(());
            }
            '\\' => {
                lexer.advance_over(1);
                let Some(escaped) = lexer.at() else {
                    return Err(lexer.error(
                        ErrorKind::UnterminatedString,
                        Span::new(start, lexer.position()),
                    ));
                };
                value.push(unescape(escaped));
                lexer.advance_over(escaped.len_utf8());
            }
            _ => {
                value.push(ch);
                lexer.advance_over(ch.len_utf8());
            }
        }
    }
}

fn interpolated_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();
    lexer.advance_over(2); // s"

    lexer.push(MK_TOKEN!(
        TokenKind::InterpolatedStringStart,
        String::from("s\""),
        Span::new(start, lexer.position())
    ));
    scan_string_content(lexer)
}

fn open_curly_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    if let Some(depth) = lexer.interpolations.last_mut() {
        *depth += 1;
    }

    let start = lexer.position();
    lexer.advance_over(1);
    lexer.push(MK_TOKEN!(
        TokenKind::OpenCurly,
        String::from("{"),
        Span::new(start, lexer.position())
    ));
    Ok(())
}

/// A `}` at depth zero closes the innermost `${...}` and puts the lexer
/// back into string-content scanning; otherwise it is ordinary punctuation.
fn close_curly_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();

    match lexer.interpolations.last_mut() {
        Some(depth) if *depth == 0 => {
            lexer.interpolations.pop();
            lexer.advance_over(1);
            lexer.push(MK_TOKEN!(
                TokenKind::InterpolationEnd,
                String::from("}"),
                Span::new(start, lexer.position())
            ));
            scan_string_content(lexer)
        }
        Some(depth) => {
            *depth -= 1;
            lexer.advance_over(1);
            lexer.push(MK_TOKEN!(
                TokenKind::CloseCurly,
                String::from("}"),
                Span::new(start, lexer.position())
            ));
            Ok(())
        }
        None => {
            lexer.advance_over(1);
            lexer.push(MK_TOKEN!(
                TokenKind::CloseCurly,
                String::from("}"),
                Span::new(start, lexer.position())
            ));
            Ok(())
        }
    }
}

/// Scans interpolated-string content from the cursor until either the
/// closing `"` or a `${`, emitting literal chunks and `$$` escapes along
/// the way. On `${` the lexer returns to ordinary tokenizing with a fresh
/// interpolation frame; [`close_curly_handler`] resumes this scan.
fn scan_string_content(lexer: &mut Lexer) -> Result<(), Error> {
    let mut chunk = String::new();
    let mut chunk_start = lexer.position();

    macro_rules! flush_chunk {
        () => {
            if !chunk.is_empty() {
                let text = std::mem::take(&mut chunk);
                lexer.push(MK_TOKEN!(
                    TokenKind::StringPart,
                    text,
                    Span::new(chunk_start, lexer.position())
                ));
            }
        };
    }

    loop {
        let Some(ch) = lexer.at() else {
            return Err(lexer.error(
                ErrorKind::UnterminatedString,
                Span::new(chunk_start, lexer.position()),
            ));
        };

        match ch {
            '"' => {
                flush_chunk!();
                let start = lexer.position();
                lexer.advance_over(1);
                lexer.push(MK_TOKEN!(
                    TokenKind::InterpolatedStringEnd,
                    String::from("\""),
                    Span::new(start, lexer.position())
                ));
                return Ok(());
            }
            '$' => {
                let next = lexer.remainder().chars().nth(1);
                match next {
                    Some('$') => {
                        flush_chunk!();
                        let start = lexer.position();
                        lexer.advance_over(2);
                        lexer.push(MK_TOKEN!(
                            TokenKind::EscapedDollar,
                            String::from("$$"),
                            Span::new(start, lexer.position())
                        ));
                        chunk_start = lexer.position();
                    }
                    Some('{') => {
                        flush_chunk!();
                        let start = lexer.position();
                        lexer.advance_over(2);
                        lexer.push(MK_TOKEN!(
                            TokenKind::InterpolationStart,
                            String::from("${"),
                            Span::new(start, lexer.position())
                        ));
                        lexer.interpolations.push(0);
                        return Ok(());
                    }
                    _ => {
                        let position = lexer.position();
                        return Err(lexer.error(
                            ErrorKind::UnrecognisedCharacter { character: '$' },
                            Span::point(position),
                        ));
                    }
                }
            }
            '\\' => {
                lexer.advance_over(1);
                let Some(escaped) = lexer.at() else {
                    return Err(lexer.error(
                        ErrorKind::UnterminatedString,
                        Span::new(chunk_start, lexer.position()),
                    ));
                };
                chunk.push(unescape(escaped));
                lexer.advance_over(escaped.len_utf8());
            }
            _ => {
                chunk.push(ch);
                lexer.advance_over(ch.len_utf8());
            }
        }
    }
}

/// Tokenizes a whole source unit.
///
/// Parsing the same text twice yields an identical token sequence; the
/// lexer keeps no state between calls. Comments and whitespace are trivia
/// and never reach the token stream.
pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex)?;
                matched = true;
                break;
            }
        }

        if !matched {
            let position = lex.position();
            let character = lex.at().unwrap_or_default();
            return Err(lex.error(
                ErrorKind::UnrecognisedCharacter { character },
                Span::point(position),
            ));
        }
    }

    if !lex.interpolations.is_empty() {
        let position = lex.position();
        return Err(lex.error(ErrorKind::UnterminatedInterpolation, Span::point(position)));
    }

    let position = lex.position();
    lex.push(MK_TOKEN!(
        TokenKind::EOF,
        String::from("EOF"),
        Span::point(position)
    ));
    Ok(lex.tokens)
}
