//! Component D, parser half of the bidirectional grammar (spec §4.3). A
//! hand-written recursive-descent parser over the token stream from
//! `lexer.rs`, the same shape as `regorus::parser` (peek/expect on a
//! `Vec<Token>`, one method per grammar production) rather than a parser
//! combinator or generated-grammar approach — the teacher's parser is also
//! hand-written against its own hand-written lexer.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{Location, SchemaError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::number;
use crate::schema::{
    BinaryConstraints, BinaryEncoding, Bound, BoundOp, BoundedRange, DefinitionMap,
    ListConstraints, NumericConstraints, ObjectLabel, ParsedSchema, Schema, TextConstraints,
    TimeConstraint, TimeFormat, Uniqueness,
};

pub fn parse_schema(text: &str) -> Result<ParsedSchema, SchemaError> {
    parse_schema_at("<string>", text)
}

pub fn parse_schema_at(path: &str, text: &str) -> Result<ParsedSchema, SchemaError> {
    let tokens = Lexer::new(path, text).tokenize()?;
    Parser {
        path,
        tokens,
        pos: 0,
    }
    .parse_document()
}

struct Parser<'a> {
    path: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelOp {
    EqEq,
    Ge,
    Gt,
    Le,
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadOp {
    Lt,
    Le,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn location(&self) -> Location {
        self.tokens[self.pos].location
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn err(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Parse {
            path: self.path.to_string(),
            location: self.location(),
            message: message.into(),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn eat_newline(&mut self) -> Result<(), SchemaError> {
        match self.peek() {
            TokenKind::Newline | TokenKind::Eof => {
                self.skip_newlines();
                Ok(())
            }
            other => Err(self.err(format!("expected end of line, found {other:?}"))),
        }
    }

    fn eat_ident(&mut self, expected: &str) -> bool {
        if matches!(self.peek(), TokenKind::Ident(s) if s == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_ident_exact(&mut self, expected: &str) -> Result<(), SchemaError> {
        if self.eat_ident(expected) {
            Ok(())
        } else {
            Err(self.err(format!("expected '{expected}', found {:?}", self.peek())))
        }
    }

    fn expect_ident(&mut self) -> Result<String, SchemaError> {
        match self.advance() {
            TokenKind::Ident(s) => Ok(s),
            other => Err(self.err(format!("expected identifier, found {other:?}"))),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SchemaError> {
        let found = self.advance();
        if found == kind {
            Ok(())
        } else {
            Err(self.err(format!("expected {kind:?}, found {found:?}")))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    // ---- doc comments -------------------------------------------------

    /// Consumes consecutive `##` lines before a definition or field,
    /// joined by LF (spec §4.3.1).
    fn take_preceding_doc(&mut self) -> Result<Option<String>, SchemaError> {
        let mut lines = Vec::new();
        while let TokenKind::DocPreceding(text) = self.peek().clone() {
            self.advance();
            lines.push(text);
            self.eat_newline()?;
        }
        if lines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(lines.join("\n")))
        }
    }

    /// A single trailing `## text` directly after an item, before the
    /// line's terminating newline.
    fn take_trailing_doc(&mut self) -> Option<String> {
        if let TokenKind::DocPreceding(text) = self.peek().clone() {
            self.advance();
            Some(text)
        } else {
            None
        }
    }

    fn wrap_doc(schema: Schema, doc: Option<String>, deprecated: bool) -> Schema {
        let schema = match doc {
            Some(d) => Schema::documented(d, schema),
            None => schema,
        };
        if deprecated {
            Schema::deprecated(schema)
        } else {
            schema
        }
    }

    // ---- top level ------------------------------------------------------

    fn parse_document(&mut self) -> Result<ParsedSchema, SchemaError> {
        self.skip_newlines();
        let mut definitions = DefinitionMap::new();
        let mut imports = Vec::new();
        let mut root = None;

        loop {
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::Eof) {
                break;
            }

            let doc = self.take_preceding_doc()?;
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::Eof) {
                break;
            }

            if matches!(self.peek(), TokenKind::Eq) {
                // root := precedingDoc "=" item trailingDoc (doc captured above, if any)
                let item = self.parse_root_value()?;
                root = Some(match doc {
                    Some(d) => Schema::documented(d, item),
                    None => item,
                });
                self.skip_newlines();
                if !matches!(self.peek(), TokenKind::Eof) {
                    return Err(self.err("content found after root definition"));
                }
                break;
            }

            let deprecated = self.eat(&TokenKind::At) && {
                self.expect_ident_exact("deprecated")?;
                true
            };
            let label = self.expect_ident()?;

            if deprecated {
                // `@deprecated` is not meaningful on an import statement.
                if matches!(self.peek(), TokenKind::FatArrow) {
                    return Err(self.err("import statements cannot be marked @deprecated"));
                }
            }

            if self.eat(&TokenKind::FatArrow) {
                self.expect_ident_exact("import")?;
                let path = self.expect_string()?;
                imports.push((label, path));
                self.eat_newline()?;
                continue;
            }

            self.expect(TokenKind::Eq)?;
            let item = self.parse_item()?;
            let trailing = self.take_trailing_doc();
            self.eat_newline()?;
            definitions.insert(label, Self::wrap_doc(item, doc.or(trailing), deprecated));
        }

        Ok(ParsedSchema {
            root,
            definitions,
            imports,
        })
    }

    fn parse_root_value(&mut self) -> Result<Schema, SchemaError> {
        self.expect(TokenKind::Eq)?;
        let item = self.parse_item()?;
        self.take_trailing_doc();
        Ok(item)
    }

    fn expect_string(&mut self) -> Result<String, SchemaError> {
        match self.advance() {
            TokenKind::Str(s) => Ok(s),
            other => Err(self.err(format!("expected string literal, found {other:?}"))),
        }
    }

    // ---- item / alternatives / list suffix -----------------------------

    fn parse_item(&mut self) -> Result<Schema, SchemaError> {
        let first = self.parse_suffixable()?;
        if !matches!(self.peek(), TokenKind::Pipe) {
            return Ok(first);
        }
        let mut options = vec![first];
        while self.eat(&TokenKind::Pipe) {
            options.push(self.parse_suffixable()?);
        }
        Ok(crate::schema::normalize(Schema::Alternatives(options)))
    }

    fn parse_suffixable(&mut self) -> Result<Schema, SchemaError> {
        let base = self.parse_primary()?;
        if self.eat(&TokenKind::Star) {
            return Ok(Schema::ListOf {
                element: Box::new(base),
                constraints: ListConstraints::default(),
            });
        }
        if self.eat(&TokenKind::Plus) {
            let mut constraints = ListConstraints {
                size: Some(BoundedRange {
                    min: Some(Bound::new(BoundOp::MinInclusive, 1_i64)),
                    max: None,
                }),
                unique: Vec::new(),
            };
            if self.eat(&TokenKind::LBracket) {
                let explicit = self.parse_list_constraints()?;
                self.expect(TokenKind::RBracket)?;
                constraints.size = match (constraints.size, explicit.size) {
                    (Some(a), Some(b)) => Some(a.merge(&b)),
                    (a, b) => a.or(b),
                };
                constraints.unique = explicit.unique;
            }
            return Ok(Schema::ListOf {
                element: Box::new(base),
                constraints,
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Schema, SchemaError> {
        match self.peek().clone() {
            TokenKind::LParen => self.parse_parenthesized(),
            TokenKind::LBrace => self.parse_object_or_map(),
            TokenKind::Str(s) => {
                self.advance();
                Ok(Schema::GivenText(s))
            }
            TokenKind::Ident(name) => match name.as_str() {
                "any" => {
                    self.advance();
                    Ok(Schema::Any)
                }
                "boolean" => self.parse_boolean(),
                "text" => self.parse_text(),
                "number" => self.parse_numeric(),
                "binary" => self.parse_binary(),
                "time" => self.parse_time(),
                _ => self.parse_ref(),
            },
            other => Err(self.err(format!("unexpected token {other:?} in item position"))),
        }
    }

    /// `( a, b, … )` -> `Tuple` (comma-separated, len >= 2), `( a | b )` ->
    /// grouped `Alternatives` (pipe-separated, len >= 2) — distinguished by
    /// which separator follows the first element (spec §4.3.7).
    fn parse_parenthesized(&mut self) -> Result<Schema, SchemaError> {
        self.expect(TokenKind::LParen)?;
        self.skip_newlines();
        let first = self.parse_item()?;
        self.skip_newlines();
        match self.peek() {
            TokenKind::Comma => {
                let mut items = vec![first];
                while self.eat(&TokenKind::Comma) {
                    self.skip_newlines();
                    if matches!(self.peek(), TokenKind::RParen) {
                        break;
                    }
                    items.push(self.parse_item()?);
                    self.skip_newlines();
                }
                self.expect(TokenKind::RParen)?;
                if items.len() < 2 {
                    return Err(self.err("tuple must have at least two elements"));
                }
                Ok(Schema::Tuple(items))
            }
            TokenKind::RParen => {
                self.advance();
                Ok(first)
            }
            other => Err(self.err(format!("expected ',' or ')', found {other:?}"))),
        }
    }

    fn parse_ref(&mut self) -> Result<Schema, SchemaError> {
        let name = self.expect_ident()?;
        if self.eat(&TokenKind::Dot) {
            let member = self.expect_ident()?;
            Ok(Schema::ScopedRef {
                namespace: name,
                name: member,
            })
        } else {
            Ok(Schema::Ref(name))
        }
    }

    // ---- primitives -----------------------------------------------------

    fn parse_boolean(&mut self) -> Result<Schema, SchemaError> {
        self.advance();
        let default = if self.eat(&TokenKind::QuestionEq) {
            match self.expect_ident()?.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                other => return Err(self.err(format!("expected 'true' or 'false', found '{other}'"))),
            }
        } else {
            None
        };
        Ok(Schema::Boolean { default })
    }

    fn parse_text(&mut self) -> Result<Schema, SchemaError> {
        self.advance();
        let mut constraints = TextConstraints::default();
        if self.eat(&TokenKind::LBracket) {
            loop {
                self.skip_newlines();
                if matches!(self.peek(), TokenKind::RBracket) {
                    break;
                }
                match self.peek().clone() {
                    TokenKind::Ident(k) if k == "length" => {
                        let range = self.parse_bounded_range("length", &mut Self::parse_int_value)?;
                        constraints.size = Some(match constraints.size {
                            Some(existing) => existing.merge(&range),
                            None => range,
                        });
                    }
                    TokenKind::Ident(k) if k == "regex" => {
                        self.advance();
                        self.expect(TokenKind::Eq)?;
                        constraints.regex = Some(self.expect_string()?);
                    }
                    TokenKind::Ident(k) if k == "format" => {
                        self.advance();
                        self.expect(TokenKind::Eq)?;
                        constraints.format = Some(self.expect_string()?);
                    }
                    other => return Err(self.err(format!("unknown text constraint {other:?}"))),
                }
                self.skip_newlines();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.skip_newlines();
            self.expect(TokenKind::RBracket)?;
        }
        let default = if self.eat(&TokenKind::QuestionEq) {
            Some(self.expect_string()?)
        } else {
            None
        };
        Ok(Schema::Text { constraints, default })
    }

    fn parse_numeric(&mut self) -> Result<Schema, SchemaError> {
        self.advance();
        let mut constraints = NumericConstraints::default();
        if self.eat(&TokenKind::LBracket) {
            loop {
                self.skip_newlines();
                if matches!(self.peek(), TokenKind::RBracket) {
                    break;
                }
                match self.peek().clone() {
                    TokenKind::Ident(k) if k == "integer" => {
                        self.advance();
                        constraints.integer = true;
                    }
                    TokenKind::Ident(k) if k == "value" => {
                        let range = self.parse_bounded_range("value", &mut Self::parse_decimal_value)?;
                        constraints.value = Some(match constraints.value {
                            Some(existing) => existing.merge(&range),
                            None => range,
                        });
                    }
                    other => return Err(self.err(format!("unknown numeric constraint {other:?}"))),
                }
                self.skip_newlines();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.skip_newlines();
            self.expect(TokenKind::RBracket)?;
        }
        let default = if self.eat(&TokenKind::QuestionEq) {
            Some(self.parse_decimal_value()?)
        } else {
            None
        };
        Ok(Schema::Numeric { constraints, default })
    }

    fn parse_binary(&mut self) -> Result<Schema, SchemaError> {
        self.advance();
        let mut constraints = BinaryConstraints::default();
        if self.eat(&TokenKind::LBracket) {
            loop {
                self.skip_newlines();
                if matches!(self.peek(), TokenKind::RBracket) {
                    break;
                }
                match self.peek().clone() {
                    TokenKind::Ident(k) if k == "size" => {
                        let range = self.parse_bounded_range("size", &mut Self::parse_binary_size_value)?;
                        constraints.size = Some(match constraints.size {
                            Some(existing) => existing.merge(&range),
                            None => range,
                        });
                    }
                    TokenKind::Ident(k) if k == "encoding" => {
                        self.advance();
                        self.expect(TokenKind::Eq)?;
                        let name = self.expect_ident()?;
                        constraints.encoding = Some(match name.as_str() {
                            "hex" => BinaryEncoding::Hex,
                            "base64" => BinaryEncoding::Base64,
                            "base32" => BinaryEncoding::Base32,
                            "base58" => BinaryEncoding::Base58,
                            "ascii85" => BinaryEncoding::Ascii85,
                            other => return Err(self.err(format!("unknown binary encoding '{other}'"))),
                        });
                    }
                    other => return Err(self.err(format!("unknown binary constraint {other:?}"))),
                }
                self.skip_newlines();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.skip_newlines();
            self.expect(TokenKind::RBracket)?;
        }
        Ok(Schema::Binary { constraints })
    }

    fn parse_time(&mut self) -> Result<Schema, SchemaError> {
        self.advance();
        let mut formats = Vec::new();
        if self.eat(&TokenKind::LBracket) {
            loop {
                self.skip_newlines();
                if matches!(self.peek(), TokenKind::RBracket) {
                    break;
                }
                match self.advance() {
                    TokenKind::Str(pattern) => formats.push(TimeConstraint::Pattern(pattern)),
                    TokenKind::Ident(name) => {
                        let format = match name.as_str() {
                            "iso8601" => TimeFormat::Iso8601,
                            "iso8601-datetime" => TimeFormat::Iso8601DateTime,
                            "iso8601-date" => TimeFormat::Iso8601Date,
                            "iso8601-time" => TimeFormat::Iso8601Time,
                            "rfc3339" => TimeFormat::Rfc3339,
                            other => return Err(self.err(format!("unknown time format '{other}'"))),
                        };
                        formats.push(TimeConstraint::Named(format));
                    }
                    other => return Err(self.err(format!("expected time format, found {other:?}"))),
                }
                self.skip_newlines();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.skip_newlines();
            self.expect(TokenKind::RBracket)?;
        }
        Ok(Schema::Time { constraints: formats })
    }

    // ---- shared bound constraint grammar (spec §4.3.4) -------------------

    fn parse_rel_op(&mut self) -> Result<RelOp, SchemaError> {
        match self.advance() {
            TokenKind::EqEq => Ok(RelOp::EqEq),
            TokenKind::Ge => Ok(RelOp::Ge),
            TokenKind::Gt => Ok(RelOp::Gt),
            TokenKind::Le => Ok(RelOp::Le),
            TokenKind::Lt => Ok(RelOp::Lt),
            other => Err(self.err(format!("expected a comparison operator, found {other:?}"))),
        }
    }

    fn try_lead_op(&mut self) -> Option<LeadOp> {
        match self.peek() {
            TokenKind::Lt => {
                self.advance();
                Some(LeadOp::Lt)
            }
            TokenKind::Le => {
                self.advance();
                Some(LeadOp::Le)
            }
            _ => None,
        }
    }

    fn range_from_keyword_op<V>(op: RelOp, value: V) -> BoundedRange<V> {
        match op {
            RelOp::EqEq => BoundedRange {
                min: Some(Bound::new(BoundOp::Exact, value)),
                max: None,
            },
            RelOp::Ge => BoundedRange {
                min: Some(Bound::new(BoundOp::MinInclusive, value)),
                max: None,
            },
            RelOp::Gt => BoundedRange {
                min: Some(Bound::new(BoundOp::MinExclusive, value)),
                max: None,
            },
            RelOp::Le => BoundedRange {
                min: None,
                max: Some(Bound::new(BoundOp::MaxInclusive, value)),
            },
            RelOp::Lt => BoundedRange {
                min: None,
                max: Some(Bound::new(BoundOp::MaxExclusive, value)),
            },
        }
    }

    /// Implements the shared three-form grammar from spec §4.3.4 for one
    /// `KEYWORD` within a constraint list: `KEYWORD OP V`, `V OP KEYWORD`,
    /// or `V OP KEYWORD OP V`.
    fn parse_bounded_range<V: Clone + PartialOrd>(
        &mut self,
        keyword: &str,
        parse_value: &mut dyn FnMut(&mut Self) -> Result<V, SchemaError>,
    ) -> Result<BoundedRange<V>, SchemaError> {
        if self.eat_ident(keyword) {
            let op = self.parse_rel_op()?;
            let value = parse_value(self)?;
            return Ok(Self::range_from_keyword_op(op, value));
        }

        let v1 = parse_value(self)?;
        let lead1 = self
            .try_lead_op()
            .ok_or_else(|| self.err("expected '<' or '<=' before a bound keyword"))?;
        self.expect_ident_exact(keyword)?;
        let min = Bound::new(
            match lead1 {
                LeadOp::Lt => BoundOp::MinExclusive,
                LeadOp::Le => BoundOp::MinInclusive,
            },
            v1,
        );

        if let Some(lead2) = self.try_lead_op() {
            let v2 = parse_value(self)?;
            let max = Bound::new(
                match lead2 {
                    LeadOp::Lt => BoundOp::MaxExclusive,
                    LeadOp::Le => BoundOp::MaxInclusive,
                },
                v2,
            );
            Ok(BoundedRange {
                min: Some(min),
                max: Some(max),
            })
        } else {
            Ok(BoundedRange {
                min: Some(min),
                max: None,
            })
        }
    }

    fn parse_int_value(&mut self) -> Result<i64, SchemaError> {
        match self.advance() {
            TokenKind::Number(text) => text
                .parse::<i64>()
                .map_err(|e| self.err(format!("invalid integer literal '{text}': {e}"))),
            other => Err(self.err(format!("expected a number, found {other:?}"))),
        }
    }

    fn parse_decimal_value(&mut self) -> Result<Decimal, SchemaError> {
        match self.advance() {
            TokenKind::Number(text) => number::parse_decimal(&text),
            other => Err(self.err(format!("expected a number, found {other:?}"))),
        }
    }

    /// Binary size values carry a mandatory unit suffix (spec §4.3.4):
    /// `bytes`, `KB`, `MB`, `GB`, or the documented `bits` alias for bytes.
    fn parse_binary_size_value(&mut self) -> Result<u64, SchemaError> {
        let magnitude = match self.advance() {
            TokenKind::Number(text) => text
                .parse::<u64>()
                .map_err(|e| self.err(format!("invalid size literal '{text}': {e}")))?,
            other => return Err(self.err(format!("expected a number, found {other:?}"))),
        };
        let unit = self.expect_ident()?;
        let bytes_per_unit: u64 = match unit.as_str() {
            "bytes" | "bits" => 1,
            "KB" => 1_024,
            "MB" => 1_024 * 1_024,
            "GB" => 1_024 * 1_024 * 1_024,
            other => return Err(self.err(format!("unknown binary size unit '{other}'"))),
        };
        Ok(magnitude * bytes_per_unit)
    }

    // ---- list constraints -------------------------------------------------

    fn parse_list_constraints(&mut self) -> Result<ListConstraints, SchemaError> {
        let mut constraints = ListConstraints::default();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::RBracket) {
                break;
            }
            match self.peek().clone() {
                TokenKind::Ident(k) if k == "size" => {
                    let range = self.parse_bounded_range("size", &mut Self::parse_int_value)?;
                    constraints.size = Some(match constraints.size {
                        Some(existing) => existing.merge(&range),
                        None => range,
                    });
                }
                TokenKind::Ident(k) if k == "unique" => {
                    self.advance();
                    if self.eat(&TokenKind::Eq) {
                        if self.eat(&TokenKind::LParen) {
                            let mut fields = Vec::new();
                            loop {
                                fields.push(self.expect_ident()?);
                                if !self.eat(&TokenKind::Comma) {
                                    break;
                                }
                            }
                            self.expect(TokenKind::RParen)?;
                            constraints.unique.push(Uniqueness::ByFields(fields));
                        } else {
                            let field = self.expect_ident()?;
                            constraints.unique.push(Uniqueness::ByFields(vec![field]));
                        }
                    } else {
                        constraints.unique.push(Uniqueness::Simple);
                    }
                }
                other => return Err(self.err(format!("unknown list constraint {other:?}"))),
            }
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(constraints)
    }

    // ---- object / map -----------------------------------------------------

    fn parse_object_or_map(&mut self) -> Result<Schema, SchemaError> {
        self.expect(TokenKind::LBrace)?;
        self.skip_newlines();

        if matches!(self.peek(), TokenKind::Ellipsis) {
            self.advance();
            self.expect(TokenKind::Colon)?;
            let value = self.parse_item()?;
            self.skip_newlines();
            self.expect(TokenKind::RBrace)?;
            return Ok(Schema::Map(Box::new(value)));
        }

        let mut fields = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::RBrace) {
                break;
            }

            let doc = self.take_preceding_doc()?;
            self.skip_newlines();

            let deprecated = self.eat(&TokenKind::At) && {
                self.expect_ident_exact("deprecated")?;
                true
            };
            let name = self.expect_ident()?;
            let optional = self.eat(&TokenKind::Question);
            self.expect(TokenKind::Colon)?;
            let value = self.parse_item()?;
            let trailing = self.take_trailing_doc();
            let value = Self::wrap_doc(value, doc.or(trailing), deprecated);

            if !seen.insert(name.clone()) {
                return Err(self.err(format!("duplicate object field '{name}'")));
            }
            let label = if optional {
                ObjectLabel::Optional(name)
            } else {
                ObjectLabel::Mandatory(name)
            };
            fields.push((label, value));

            self.skip_newlines();
            match self.peek() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace => {}
                other => return Err(self.err(format!("expected ',' or '}}', found {other:?}"))),
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Schema::Object(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_object_definition() {
        let parsed = parse_schema("Person = { name: text, age?: number }\n").unwrap();
        let person = parsed.definitions.get("Person").unwrap();
        match person {
            Schema::Object(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, ObjectLabel::Mandatory("name".into()));
                assert_eq!(fields[1].0, ObjectLabel::Optional("age".into()));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn parses_length_bound_both_forms() {
        let a = parse_schema("X = text[length >= 1]\n").unwrap();
        let b = parse_schema("X = text[1 <= length]\n").unwrap();
        assert_eq!(
            a.definitions.get("X").unwrap(),
            b.definitions.get("X").unwrap()
        );
    }

    #[test]
    fn parses_double_bounded_length() {
        let parsed = parse_schema("X = text[0 <= length <= 10]\n").unwrap();
        match parsed.definitions.get("X").unwrap() {
            Schema::Text { constraints, .. } => {
                let size = constraints.size.clone().unwrap();
                assert_eq!(size.min.unwrap().value, 0);
                assert_eq!(size.max.unwrap().value, 10);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_suffixes() {
        let star = parse_schema("X = number*\n").unwrap();
        let plus = parse_schema("X = number+\n").unwrap();
        match (
            star.definitions.get("X").unwrap(),
            plus.definitions.get("X").unwrap(),
        ) {
            (Schema::ListOf { constraints: c1, .. }, Schema::ListOf { constraints: c2, .. }) => {
                assert!(c1.size.is_none());
                assert_eq!(c2.size.clone().unwrap().min.unwrap().value, 1);
            }
            other => panic!("expected two lists, got {other:?}"),
        }
    }

    #[test]
    fn canonicalizes_all_given_text_alternatives_to_enum() {
        let parsed = parse_schema("Color = \"red\" | \"blue\"\n").unwrap();
        assert_eq!(
            parsed.definitions.get("Color").unwrap(),
            &Schema::Enum(vec!["red".to_string(), "blue".to_string()])
        );
    }

    #[test]
    fn parses_tuple_and_grouped_alternatives() {
        let parsed = parse_schema("X = (number, text)\nY = { a: (any | boolean) }\n").unwrap();
        assert!(matches!(parsed.definitions.get("X").unwrap(), Schema::Tuple(items) if items.len() == 2));
    }

    #[test]
    fn parses_import_and_scoped_ref() {
        let parsed = parse_schema("common => import \"common.schema\"\nX = common.Name\n").unwrap();
        assert_eq!(parsed.imports, vec![("common".to_string(), "common.schema".to_string())]);
        assert_eq!(
            parsed.definitions.get("X").unwrap(),
            &Schema::ScopedRef {
                namespace: "common".to_string(),
                name: "Name".to_string()
            }
        );
    }

    #[test]
    fn parses_map_value() {
        let parsed = parse_schema("X = { ...: number }\n").unwrap();
        assert_eq!(
            parsed.definitions.get("X").unwrap(),
            &Schema::Map(Box::new(Schema::Numeric {
                constraints: NumericConstraints::default(),
                default: None
            }))
        );
    }

    #[test]
    fn trailing_doc_attaches_to_simple_field() {
        let parsed = parse_schema("X = { name: text ## the name\n}\n").unwrap();
        match parsed.definitions.get("X").unwrap() {
            Schema::Object(fields) => match &fields[0].1 {
                Schema::Documented { doc, .. } => assert_eq!(doc, "the name"),
                other => panic!("expected documented field, got {other:?}"),
            },
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn root_value_parses_without_label() {
        let parsed = parse_schema("Name => import \"n.schema\"\n= any\n").unwrap();
        assert_eq!(parsed.root, Some(Schema::Any));
    }
}
