//! Recursive-descent parser for type expressions.
//!
//! Alias targets, constraint clauses and test fixtures arrive as text; this
//! turns that text into [`TypeExpr`]. It covers the type grammar only — full
//! declaration parsing belongs to the external parser collaborator.

use crate::types::{TypeExpr, TypeMarker};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type parse error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for TypeParseError {}

/// Parse a type expression from source text.
pub fn parse_type(text: &str) -> Result<TypeExpr, TypeParseError> {
    let mut parser = Parser::new(text);
    let expr = parser.parse_type()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing characters after type"));
    }
    Ok(expr)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> TypeParseError {
        TypeParseError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), TypeParseError> {
        self.skip_ws();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected `{expected}`, found `{ch}`"))),
            None => Err(self.error(format!("expected `{expected}`, found end of input"))),
        }
    }

    fn try_eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn is_ident_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '`'
    }

    fn ident(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if Self::is_ident_char(ch)) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Consume `word` only when it appears as a whole identifier.
    fn try_eat_word(&mut self, word: &str) -> bool {
        self.skip_ws();
        let end = self.pos + word.len();
        if end > self.chars.len() {
            return false;
        }
        let slice: String = self.chars[self.pos..end].iter().collect();
        if slice != word {
            return false;
        }
        if matches!(self.chars.get(end), Some(&ch) if Self::is_ident_char(ch)) {
            return false;
        }
        self.pos = end;
        true
    }

    fn try_eat_arrow(&mut self) -> bool {
        self.skip_ws();
        if self.peek() == Some('-') && self.chars.get(self.pos + 1) == Some(&'>') {
            self.pos += 2;
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.skip_ws();

        if self.peek() == Some('@') {
            self.bump();
            let attribute = self.ident()?;
            let base = self.parse_type()?;
            return Ok(TypeExpr::Attributed {
                attribute,
                base: Box::new(base),
            });
        }

        for marker in [TypeMarker::Some, TypeMarker::Any] {
            if self.try_eat_word(marker.keyword()) {
                let base = self.parse_type()?;
                return Ok(TypeExpr::Constrained {
                    marker,
                    base: Box::new(base),
                });
            }
        }

        let first = self.parse_postfix()?;

        self.skip_ws();
        if self.peek() != Some('&') {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.try_eat('&') {
            parts.push(self.parse_postfix()?);
        }
        Ok(TypeExpr::Composition(parts))
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr, TypeParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                Some('?') => {
                    self.bump();
                    expr = TypeExpr::Optional(Box::new(expr));
                }
                Some('!') => {
                    self.bump();
                    expr = TypeExpr::ImplicitlyUnwrapped(Box::new(expr));
                }
                Some('.') => {
                    self.bump();
                    let name = self.ident()?;
                    expr = TypeExpr::Member {
                        base: Box::new(expr),
                        name,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.parse_bracketed(),
            Some('(') => self.parse_parenthesized(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_bracketed(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.eat('[')?;
        let first = self.parse_type()?;
        if self.try_eat(':') {
            let value = self.parse_type()?;
            self.eat(']')?;
            return Ok(TypeExpr::Dictionary {
                key: Box::new(first),
                value: Box::new(value),
            });
        }
        self.eat(']')?;
        Ok(TypeExpr::Array(Box::new(first)))
    }

    fn parse_parenthesized(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.eat('(')?;
        let mut elements = Vec::new();
        self.skip_ws();
        if self.peek() != Some(')') {
            loop {
                elements.push(self.parse_type()?);
                if !self.try_eat(',') {
                    break;
                }
            }
        }
        self.eat(')')?;

        let is_async = self.try_eat_word("async");
        let throws = self.try_eat_word("throws");

        if self.try_eat_arrow() {
            let ret = self.parse_type()?;
            return Ok(TypeExpr::Function {
                params: elements,
                is_async,
                throws,
                ret: Box::new(ret),
            });
        }
        if is_async || throws {
            return Err(self.error("expected `->` after effect specifiers"));
        }
        Ok(TypeExpr::Tuple(elements))
    }

    fn parse_identifier(&mut self) -> Result<TypeExpr, TypeParseError> {
        let name = self.ident()?;
        let mut generic_args = Vec::new();
        if self.try_eat('<') {
            loop {
                generic_args.push(self.parse_type()?);
                if !self.try_eat(',') {
                    break;
                }
            }
            self.eat('>')?;
        }
        Ok(TypeExpr::Identifier { name, generic_args })
    }
}
