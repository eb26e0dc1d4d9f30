//! Component D, lexical layer (spec §4.3.1). Grounded in `regorus::lexer`:
//! a hand-written char-by-char scanner that tracks row/col for diagnostics
//! and treats doc comments as first-class tokens rather than discarding
//! them like ordinary comments. Unlike the teacher, there is no `Source`
//! wrapper shared via `Rc` — schema files are small enough that owning the
//! text once per parse is simpler and the teacher's `Rc<SourceInternal>`
//! sharing exists mainly to support its policy-bundle model, which this
//! crate has no equivalent of.

use crate::error::{Location, SchemaError};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Raw decimal literal text, unparsed; `number.rs` parses it on demand.
    Number(String),
    Str(String),
    Newline,
    FatArrow,
    Eq,
    QuestionEq,
    Question,
    Colon,
    Comma,
    Pipe,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Star,
    Plus,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    /// `...` or the single character `…`.
    Ellipsis,
    Dot,
    At,
    /// A doc comment appearing before the value it documents.
    DocPreceding(String),
    /// A doc comment appearing after the value it documents, same line.
    DocTrailing(String),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

pub struct Lexer<'a> {
    path: &'a str,
    chars: Vec<char>,
    pos: usize,
    row: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(path: &'a str, text: &'a str) -> Self {
        Self {
            path,
            chars: text.chars().collect(),
            pos: 0,
            row: 1,
            col: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SchemaError> {
        let mut out = Vec::new();
        loop {
            match self.next_token()? {
                Some(tok) => {
                    let is_eof = matches!(tok.kind, TokenKind::Eof);
                    out.push(tok);
                    if is_eof {
                        break;
                    }
                }
                None => continue,
            }
        }
        Ok(out)
    }

    fn here(&self) -> Location {
        Location {
            row: self.row,
            col: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn err(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Parse {
            path: self.path.to_string(),
            location: self.here(),
            message: message.into(),
        }
    }

    /// Returns `Ok(None)` when the caller should simply loop again (e.g.
    /// after skipping a plain comment), `Ok(Some(Eof))` exactly once at the
    /// end of input.
    fn next_token(&mut self) -> Result<Option<Token>, SchemaError> {
        match self.peek() {
            None => Ok(Some(Token {
                kind: TokenKind::Eof,
                location: self.here(),
            })),
            Some(' ') | Some('\t') | Some('\r') => {
                self.advance();
                Ok(None)
            }
            Some('\n') => {
                let loc = self.here();
                self.advance();
                Ok(Some(Token {
                    kind: TokenKind::Newline,
                    location: loc,
                }))
            }
            Some('#') => self.lex_comment(),
            Some('"') => self.lex_string().map(Some),
            Some(c) if c.is_ascii_digit() || (c == '-' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) => {
                Ok(Some(self.lex_number()))
            }
            Some(c) if c.is_alphabetic() => Ok(Some(self.lex_ident())),
            Some('…') => {
                let loc = self.here();
                self.advance();
                Ok(Some(Token {
                    kind: TokenKind::Ellipsis,
                    location: loc,
                }))
            }
            Some(_) => self.lex_symbol().map(Some),
        }
    }

    /// `#` starts either a doc comment (`##`) or a regular comment (single
    /// `#`). Preceding doc comments accumulate across consecutive lines
    /// (spec §4.3.1); a trailing one is whatever follows a value on the
    /// same line and is handled by the caller noticing it wants one, so
    /// here we always emit `DocPreceding` and let the parser reclassify
    /// the most recent one as trailing when it directly follows an item
    /// on the same source line.
    fn lex_comment(&mut self) -> Result<Option<Token>, SchemaError> {
        let loc = self.here();
        self.advance(); // first '#'
        if self.peek() == Some('#') {
            self.advance();
            if self.peek() == Some(' ') {
                self.advance();
            }
            let mut text = String::new();
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                text.push(c);
                self.advance();
            }
            Ok(Some(Token {
                kind: TokenKind::DocPreceding(text),
                location: loc,
            }))
        } else {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            Ok(None)
        }
    }

    /// `"…"` with escape support per spec §9's resolved open question:
    /// `\"`, `\\`, `\n`, `\t`; anything else is a hard error.
    fn lex_string(&mut self) -> Result<Token, SchemaError> {
        let loc = self.here();
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.advance() {
                None => return Err(self.err("unterminated string literal")),
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => {
                        return Err(self.err(format!("invalid escape sequence '\\{other}'")))
                    }
                    None => return Err(self.err("unterminated string literal")),
                },
                Some(c) => text.push(c),
            }
        }
        Ok(Token {
            kind: TokenKind::Str(text),
            location: loc,
        })
    }

    fn lex_number(&mut self) -> Token {
        let loc = self.here();
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                lookahead += 1;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
                if matches!(self.peek(), Some('+') | Some('-')) {
                    text.push(self.advance().unwrap());
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }
        Token {
            kind: TokenKind::Number(text),
            location: loc,
        }
    }

    fn lex_ident(&mut self) -> Token {
        let loc = self.here();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token {
            kind: TokenKind::Ident(text),
            location: loc,
        }
    }

    fn lex_symbol(&mut self) -> Result<Token, SchemaError> {
        let loc = self.here();
        let c = self.advance().expect("peek confirmed Some");
        let kind = match c {
            '=' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::FatArrow
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '?' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::QuestionEq
                } else {
                    TokenKind::Question
                }
            }
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '|' => TokenKind::Pipe,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '*' => TokenKind::Star,
            '+' => TokenKind::Plus,
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '@' => TokenKind::At,
            other => return Err(self.err(format!("unexpected character '{other}'"))),
        };
        Ok(Token { kind, location: loc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Lexer::new("t", text)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_named_value_with_trailing_doc() {
        let ks = kinds("name = text ## a label\n");
        assert_eq!(
            ks,
            vec![
                TokenKind::Ident("name".into()),
                TokenKind::Eq,
                TokenKind::Ident("text".into()),
                TokenKind::DocPreceding("a label".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_escaped_string() {
        let ks = kinds("\"a\\\"b\\n\"");
        assert_eq!(ks[0], TokenKind::Str("a\"b\n".to_string()));
    }

    #[test]
    fn rejects_unknown_escape() {
        let err = Lexer::new("t", "\"a\\qb\"").tokenize().unwrap_err();
        assert!(matches!(err, SchemaError::Parse { .. }));
    }

    #[test]
    fn lexes_bound_operators() {
        assert_eq!(
            kinds("0 <= length <= 10"),
            vec![
                TokenKind::Number("0".into()),
                TokenKind::Le,
                TokenKind::Ident("length".into()),
                TokenKind::Le,
                TokenKind::Number("10".into()),
                TokenKind::Eof,
            ]
        );
    }
}
